//! The construction contract between a position and its text formats.

use chess_core::{Color, FenParser, File, Piece, PieceKind, Rank, Square};

use super::CastlingRights;
use crate::{Bitboard, PositionError};

/// The raw fields a [`Position`](crate::Position) is built from.
///
/// Nothing here is checked until [`PositionSetup::validate`] runs, which
/// [`Position::from_setup`](crate::Position::from_setup) always does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSetup {
    /// One bitboard per piece kind, indexed by [`PieceKind::index`].
    pub pieces: [Bitboard; PieceKind::COUNT],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// File of a pawn that just made a double push.
    pub en_passant: Option<File>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl PositionSetup {
    /// An empty board, White to move, no rights.
    pub fn empty() -> Self {
        PositionSetup {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Adds `kind` on `sq`. `Empty` is ignored.
    pub fn put(&mut self, kind: PieceKind, sq: Square) {
        if let Some(bb) = self.pieces.get_mut(kind.index()) {
            *bb |= Bitboard::from_square(sq);
        }
    }

    /// Returns the first kind found on `sq`, or `Empty`.
    pub fn piece_at(&self, sq: Square) -> PieceKind {
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))
            .unwrap_or(PieceKind::Empty)
    }

    /// Parses FEN text into a setup.
    ///
    /// The en passant target square must sit on the rank the side to move
    /// would capture onto.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenParser::parse(fen)?;

        let mut setup = PositionSetup::empty();
        for &(sq, piece, color) in &parsed.placement {
            setup.put(PieceKind::new(piece, color), sq);
        }
        setup.side_to_move = parsed.side_to_move;
        setup.castling = CastlingRights::from_flags(parsed.castling);
        setup.en_passant = match parsed.en_passant {
            Some(sq) if sq.rank() == en_passant_target_rank(parsed.side_to_move) => {
                Some(sq.file())
            }
            Some(sq) => {
                return Err(PositionError::InvalidEnPassant {
                    file: sq.file().to_char(),
                })
            }
            None => None,
        };
        setup.halfmove_clock = parsed.halfmove_clock;
        setup.fullmove_number = parsed.fullmove_number;

        Ok(setup)
    }

    /// Renders the setup as FEN text.
    pub fn to_fen(&self) -> String {
        let mut placement = Vec::with_capacity(32);
        for sq in Square::all() {
            let kind = self.piece_at(sq);
            if let (Some(piece), Some(color)) = (kind.piece(), kind.color()) {
                placement.push((sq, piece, color));
            }
        }

        FenParser {
            placement,
            side_to_move: self.side_to_move,
            castling: self.castling.to_flags(),
            en_passant: self
                .en_passant
                .map(|file| Square::new(file, en_passant_target_rank(self.side_to_move))),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Checks that the description is a playable position.
    ///
    /// Whether the side that is not to move is in check needs attack
    /// tables, so [`Position::from_setup`](crate::Position::from_setup)
    /// checks that after building.
    pub fn validate(&self) -> Result<(), PositionError> {
        let mut seen = Bitboard::EMPTY;
        for bb in &self.pieces {
            if let Some(sq) = (seen & *bb).first_square() {
                return Err(PositionError::OverlappingPieces(sq));
            }
            seen |= *bb;
        }

        for color in Color::ALL {
            let count = self.pieces[PieceKind::new(Piece::King, color).index()].popcount();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
        }

        let back_ranks = Bitboard(0xFF | (0xFF << 56));
        let pawns =
            self.pieces[PieceKind::WhitePawn.index()] | self.pieces[PieceKind::BlackPawn.index()];
        if let Some(sq) = (pawns & back_ranks).first_square() {
            return Err(PositionError::PawnOnBackRank(sq));
        }

        for (right, ch, color, king_home, rook_home) in CASTLING_HOMES {
            if !self.castling.has(right) {
                continue;
            }
            let king = self.pieces[PieceKind::new(Piece::King, color).index()];
            let rooks = self.pieces[PieceKind::new(Piece::Rook, color).index()];
            if !king.contains(king_home) || !rooks.contains(rook_home) {
                return Err(PositionError::CastlingWithoutPieces { right: ch });
            }
        }

        if let Some(file) = self.en_passant {
            let us = self.side_to_move;
            let them = us.opposite();
            let target = Square::new(file, en_passant_target_rank(us));
            let pushed = Square::new(file, pushed_pawn_rank(us));
            let origin = Square::new(file, pawn_origin_rank(us));
            let enemy_pawns = self.pieces[PieceKind::new(Piece::Pawn, them).index()];
            if !enemy_pawns.contains(pushed) || seen.contains(target) || seen.contains(origin) {
                return Err(PositionError::InvalidEnPassant {
                    file: file.to_char(),
                });
            }
        }

        if self.fullmove_number == 0 {
            return Err(PositionError::ZeroFullmoveNumber);
        }

        Ok(())
    }
}

impl Default for PositionSetup {
    fn default() -> Self {
        Self::empty()
    }
}

/// Rank the side to move captures onto en passant.
fn en_passant_target_rank(us: Color) -> Rank {
    match us {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Rank of an enemy pawn that just double-pushed.
fn pushed_pawn_rank(us: Color) -> Rank {
    match us {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

/// Rank the double-pushed enemy pawn came from.
fn pawn_origin_rank(us: Color) -> Rank {
    match us {
        Color::White => Rank::R7,
        Color::Black => Rank::R2,
    }
}

/// Each castling right with its FEN letter and the king and rook home
/// squares it depends on.
const CASTLING_HOMES: [(CastlingRights, char, Color, Square, Square); 4] = [
    (CastlingRights::WHITE_KINGSIDE, 'K', Color::White, Square::E1, Square::H1),
    (CastlingRights::WHITE_QUEENSIDE, 'Q', Color::White, Square::E1, Square::A1),
    (CastlingRights::BLACK_KINGSIDE, 'k', Color::Black, Square::E8, Square::H8),
    (CastlingRights::BLACK_QUEENSIDE, 'q', Color::Black, Square::E8, Square::A8),
];
