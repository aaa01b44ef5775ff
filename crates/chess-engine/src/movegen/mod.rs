//! Move generation.
//!
//! [`generate_legal`] produces the fully legal moves of a position.
//! [`MoveGenerator`] wraps it with a one-entry result cache keyed on the
//! position's generation counter, for callers that ask about the same
//! position repeatedly.

mod legal;
pub mod perft;

use crate::Position;
use chess_core::{Move, UciMove};

pub use legal::generate_legal;

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Iterates over the moves in generation order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if `m` is in the list.
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Whether the side to move can still play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one legal move exists.
    Ongoing,
    /// No legal move and the king is attacked.
    Checkmate,
    /// No legal move and the king is safe.
    Stalemate,
}

/// The position snapshot a cached list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    generation: u64,
    hash: u64,
    captures_only: bool,
}

impl CacheKey {
    fn of(position: &Position, captures_only: bool) -> Self {
        CacheKey {
            generation: position.generation(),
            hash: position.hash(),
            captures_only,
        }
    }
}

/// Legal move generator with a single cached result.
///
/// The generator holds no reference to any position. It remembers the
/// generation and hash of the position it last generated for and reuses
/// that list until either changes.
#[derive(Debug, Default)]
pub struct MoveGenerator {
    key: Option<CacheKey>,
    moves: MoveList,
}

impl MoveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the legal moves of `position`, or only its captures.
    ///
    /// Takes the position mutably because some candidates are tried on the
    /// board; it is left exactly as it was found.
    pub fn legal_moves(&mut self, position: &mut Position, captures_only: bool) -> &MoveList {
        if self.key != Some(CacheKey::of(position, captures_only)) {
            self.moves = generate_legal(position, captures_only);
            // Trials bump the generation, so read the key afterwards
            self.key = Some(CacheKey::of(position, captures_only));
        }
        &self.moves
    }

    /// Classifies the position as ongoing, checkmate or stalemate.
    pub fn outcome(&mut self, position: &mut Position) -> Outcome {
        if !self.legal_moves(position, false).is_empty() {
            Outcome::Ongoing
        } else if position.is_in_check(position.side_to_move()) {
            Outcome::Checkmate
        } else {
            Outcome::Stalemate
        }
    }

    /// Resolves a (from, to, promotion) tuple to the matching legal move.
    ///
    /// Castling is given as the king's two-square step and en passant as
    /// the capturing pawn's diagonal step; the board tells them apart.
    pub fn find(&mut self, position: &mut Position, uci: UciMove) -> Option<Move> {
        self.legal_moves(position, false).iter().copied().find(|m| {
            m.from() == uci.from && m.to() == uci.to && m.flag().promotion_piece() == uci.promotion
        })
    }

    /// Drops the cached list.
    pub fn clear(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{MoveFlag, PieceKind, Square};

    fn uci(s: &str) -> UciMove {
        UciMove::parse(s).unwrap()
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let m1 = Move::quiet(Square::E1, Square::E8, PieceKind::WhiteRook, MoveFlag::Quiet);
        let m2 = Move::quiet(Square::A1, Square::H8, PieceKind::WhiteBishop, MoveFlag::Quiet);
        list.push(m1);
        list.push(m2);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);
        assert!(list.contains(m2));

        let collected: Vec<_> = (&list).into_iter().copied().collect();
        assert_eq!(collected, vec![m1, m2]);
    }

    #[test]
    fn movelist_default() {
        let list = MoveList::default();
        assert!(list.is_empty());
        assert_eq!(format!("{:?}", list), "[]");
    }

    #[test]
    fn generator_caches_until_the_position_changes() {
        let mut position = Position::startpos();
        let mut generator = MoveGenerator::new();
        assert_eq!(generator.legal_moves(&mut position, false).len(), 20);
        let key = generator.key;
        assert_eq!(generator.legal_moves(&mut position, false).len(), 20);
        assert_eq!(generator.key, key);

        let e4 = generator.find(&mut position, uci("e2e4")).unwrap();
        position.apply_move(e4);
        assert_ne!(generator.key, Some(CacheKey::of(&position, false)));
        assert_eq!(generator.legal_moves(&mut position, false).len(), 20);
        assert!(generator.legal_moves(&mut position, true).is_empty());
    }

    #[test]
    fn find_resolves_special_moves() {
        let mut generator = MoveGenerator::new();

        let mut position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castle = generator.find(&mut position, uci("e1g1")).unwrap();
        assert_eq!(castle.flag(), MoveFlag::KingCastle);

        let mut position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let ep = generator.find(&mut position, uci("e5d6")).unwrap();
        assert_eq!(ep.flag(), MoveFlag::EnPassant);

        let mut position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promo = generator.find(&mut position, uci("a7a8n")).unwrap();
        assert_eq!(promo.flag(), MoveFlag::PromoteKnight);
        assert!(generator.find(&mut position, uci("a7a8")).is_none());
        assert!(generator.find(&mut position, uci("e1e3")).is_none());
    }

    #[test]
    fn checkmate_and_stalemate() {
        let mut generator = MoveGenerator::new();

        // Fool's mate
        let mut position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(generator.outcome(&mut position), Outcome::Checkmate);

        let mut position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(generator.outcome(&mut position), Outcome::Stalemate);

        let mut position = Position::startpos();
        assert_eq!(generator.outcome(&mut position), Outcome::Ongoing);
    }

    #[test]
    fn mate_reached_by_play_is_detected() {
        let mut generator = MoveGenerator::new();
        let mut position = Position::startpos();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let m = generator.find(&mut position, uci(text)).unwrap();
            position.apply_move(m);
        }
        assert_eq!(generator.outcome(&mut position), Outcome::Checkmate);
        assert!(position.is_in_check(position.side_to_move()));

        position.undo_move();
        assert_eq!(generator.outcome(&mut position), Outcome::Ongoing);
    }
}
