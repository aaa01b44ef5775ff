//! Lazily computed attack data.
//!
//! Every value here is a pure function of the piece bitboards. Each is
//! computed on first access and cached until the next mutation, which
//! clears the whole cache through [`DerivedCache::clear`].

use std::cell::Cell;

use chess_core::{Color, Piece, Square};

use super::Position;
use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::{Bitboard, InvariantError};

/// Per-color cached bitboards; `None` means "not computed since the last
/// mutation".
#[derive(Debug, Clone, Default)]
pub(super) struct DerivedCache {
    attacks: [Cell<Option<Bitboard>>; 2],
    unsafe_king: [Cell<Option<Bitboard>>; 2],
    checkers: [Cell<Option<Bitboard>>; 2],
}

impl DerivedCache {
    pub(super) fn clear(&mut self) {
        *self = DerivedCache::default();
    }
}

/// Returns the cached value or computes and stores it.
#[inline]
fn cached(slot: &Cell<Option<Bitboard>>, compute: impl FnOnce() -> Bitboard) -> Bitboard {
    match slot.get() {
        Some(bb) => bb,
        None => {
            let bb = compute();
            slot.set(Some(bb));
            bb
        }
    }
}

impl Position {
    /// Every square attacked by `color`, with sliders blocked by `occupied`.
    ///
    /// The single attack routine behind both the attack map and the unsafe
    /// king squares.
    fn attacks_by(&self, color: Color, occupied: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;

        let pawns = self.pieces_of(Piece::Pawn, color);
        attacks |= match color {
            Color::White => {
                Bitboard((pawns.0 << 7) & !FILE_H) | Bitboard((pawns.0 << 9) & !FILE_A)
            }
            Color::Black => {
                Bitboard((pawns.0 >> 9) & !FILE_H) | Bitboard((pawns.0 >> 7) & !FILE_A)
            }
        };

        for sq in self.pieces_of(Piece::Knight, color) {
            attacks |= knight_attacks(sq);
        }
        let queens = self.pieces_of(Piece::Queen, color);
        for sq in self.pieces_of(Piece::Bishop, color) | queens {
            attacks |= bishop_attacks(sq, occupied);
        }
        for sq in self.pieces_of(Piece::Rook, color) | queens {
            attacks |= rook_attacks(sq, occupied);
        }
        for sq in self.pieces_of(Piece::King, color) {
            attacks |= king_attacks(sq);
        }

        attacks
    }

    /// Union of every square `color`'s pieces attack.
    pub fn attack_bitboard(&self, color: Color) -> Bitboard {
        cached(&self.derived.attacks[color.index()], || {
            self.attacks_by(color, self.occupied)
        })
    }

    /// Squares `color`'s king may not step onto.
    ///
    /// The enemy attack map computed with this king lifted off the board,
    /// so a square behind the king on a checking ray stays unsafe.
    pub fn unsafe_king_squares(&self, color: Color) -> Bitboard {
        cached(&self.derived.unsafe_king[color.index()], || {
            let king = self.pieces_of(Piece::King, color);
            self.attacks_by(color.opposite(), self.occupied.without(king))
        })
    }

    /// Enemy pieces currently attacking `color`'s king.
    pub fn checking_pieces(&self, color: Color) -> Bitboard {
        cached(&self.derived.checkers[color.index()], || {
            let king = self.pieces_of(Piece::King, color);
            match king.first_square() {
                Some(sq) => {
                    self.attackers_to(sq, self.occupied) & self.colors[color.opposite().index()]
                }
                None => Bitboard::EMPTY,
            }
        })
    }

    /// Returns true if `color`'s king is attacked.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.checking_pieces(color).is_not_empty()
    }

    /// Pieces of both colors attacking `sq`, with sliders blocked by
    /// `occupied`.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces_of(Piece::Bishop, Color::White)
            | self.pieces_of(Piece::Bishop, Color::Black)
            | self.pieces_of(Piece::Queen, Color::White)
            | self.pieces_of(Piece::Queen, Color::Black);
        let straight = self.pieces_of(Piece::Rook, Color::White)
            | self.pieces_of(Piece::Rook, Color::Black)
            | self.pieces_of(Piece::Queen, Color::White)
            | self.pieces_of(Piece::Queen, Color::Black);
        let knights = self.pieces_of(Piece::Knight, Color::White)
            | self.pieces_of(Piece::Knight, Color::Black);
        let kings =
            self.pieces_of(Piece::King, Color::White) | self.pieces_of(Piece::King, Color::Black);

        // A pawn of one color attacks sq exactly when a pawn of the other
        // color on sq would attack it.
        (pawn_attacks(sq, Color::Black) & self.pieces_of(Piece::Pawn, Color::White))
            | (pawn_attacks(sq, Color::White) & self.pieces_of(Piece::Pawn, Color::Black))
            | (knight_attacks(sq) & knights)
            | (king_attacks(sq) & kings)
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & straight)
    }

    /// Compares every valid cache entry with a recomputation.
    pub(super) fn validate_derived(&self) -> Result<(), InvariantError> {
        for color in Color::ALL {
            let i = color.index();
            if let Some(bb) = self.derived.attacks[i].get() {
                if bb != self.attacks_by(color, self.occupied) {
                    return Err(InvariantError::StaleAttackMap(color));
                }
            }
            if let Some(bb) = self.derived.unsafe_king[i].get() {
                let king = self.pieces_of(Piece::King, color);
                if bb != self.attacks_by(color.opposite(), self.occupied.without(king)) {
                    return Err(InvariantError::StaleUnsafeKing(color));
                }
            }
            if let Some(bb) = self.derived.checkers[i].get() {
                let fresh = self.attackers_to(self.king_square(color), self.occupied)
                    & self.colors[color.opposite().index()];
                if bb != fresh {
                    return Err(InvariantError::StaleCheckers(color));
                }
            }
        }
        Ok(())
    }
}

const FILE_A: u64 = 0x0101_0101_0101_0101;
const FILE_H: u64 = 0x8080_8080_8080_8080;

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_attack_maps() {
        let pos = Position::startpos();
        let white = pos.attack_bitboard(Color::White);
        let third = Bitboard(0xFF << 16);
        assert_eq!(white & third, third);
        assert!(!white.contains(sq("e4")));
        let black = pos.attack_bitboard(Color::Black);
        let sixth = Bitboard(0xFF << 40);
        assert_eq!(black & sixth, sixth);
        assert!(!pos.is_in_check(Color::White));
        assert!(!pos.is_in_check(Color::Black));
    }

    #[test]
    fn pawn_attacks_match_tables() {
        let pos = Position::from_fen("4k3/pp5p/8/8/8/8/P6P/4K3 w - - 0 1").unwrap();
        for color in Color::ALL {
            let expected = pos
                .pieces_of(Piece::Pawn, color)
                .into_iter()
                .fold(Bitboard::EMPTY, |acc, s| acc | pawn_attacks(s, color));
            let kings = king_attacks(pos.king_square(color));
            assert_eq!(pos.attack_bitboard(color), expected | kings);
        }
    }

    #[test]
    fn unsafe_squares_extend_through_the_king() {
        // Rook on a1 checks the king on e1; f1 is shielded by the king in
        // the plain attack map but still unsafe
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(!pos.attack_bitboard(Color::Black).contains(Square::F1));
        assert!(pos.unsafe_king_squares(Color::White).contains(Square::F1));
        assert!(!pos.unsafe_king_squares(Color::White).contains(sq("e2")));
    }

    #[test]
    fn single_and_double_checkers() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert_eq!(pos.checking_pieces(Color::White), Bitboard::from_square(Square::A1));

        // Rook on e8 and knight on d3 both check the king on e1
        let pos = Position::from_fen("k3r3/8/8/8/8/3n4/8/4K3 w - - 0 1").unwrap();
        let checkers = pos.checking_pieces(Color::White);
        assert_eq!(checkers.popcount(), 2);
        assert!(checkers.contains(sq("e8")));
        assert!(checkers.contains(sq("d3")));
    }

    #[test]
    fn pawn_checks() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert_eq!(pos.checking_pieces(Color::White), Bitboard::from_square(sq("d2")));
        let pos = Position::from_fen("4k3/3P4/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(pos.checking_pieces(Color::Black), Bitboard::from_square(sq("d7")));
    }

    #[test]
    fn cache_stays_consistent() {
        let pos = Position::startpos();
        let _ = pos.attack_bitboard(Color::White);
        let _ = pos.unsafe_king_squares(Color::Black);
        let _ = pos.checking_pieces(Color::White);
        assert_eq!(pos.validate_derived(), Ok(()));
    }

    #[test]
    fn stale_cache_entries_are_reported() {
        let pos = Position::startpos();
        pos.derived.attacks[Color::White.index()].set(Some(Bitboard::EMPTY));
        assert_eq!(
            pos.validate_derived(),
            Err(InvariantError::StaleAttackMap(Color::White))
        );

        let pos = Position::startpos();
        pos.derived.checkers[Color::Black.index()].set(Some(Bitboard::FULL));
        assert_eq!(
            pos.validate_derived(),
            Err(InvariantError::StaleCheckers(Color::Black))
        );
    }
}
