//! Zobrist hashing for position identification.
//!
//! Every hashed feature owns a pseudo-random 64-bit key:
//! - each piece kind on each square (12 kinds x 64 squares = 768 keys)
//! - black to move
//! - each of the 4 castling rights
//! - each en passant file (8 keys)
//!
//! A position's hash is the XOR of the keys of its features, so a move
//! updates it by XORing out the features it removes and XORing in the ones
//! it adds.

use crate::position::{CastlingRights, Position};
use chess_core::{Color, File, PieceKind, Square};

/// Zobrist hash keys.
///
/// Generated at compile time from a fixed seed, so hashes are stable
/// across runs.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][square]
    pieces: [[u64; 64]; PieceKind::COUNT],
    /// Key for black to move (XOR when black to move).
    black_to_move: u64,
    /// Keys for castling rights, in [`CastlingRights::ALL_RIGHTS`] order.
    castling: [u64; 4],
    /// Keys for en passant file.
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a xorshift64 PRNG.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64; // Golden ratio seed
        let mut pieces = [[0u64; 64]; PieceKind::COUNT];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < PieceKind::COUNT {
            let mut square = 0;
            while square < 64 {
                state = next_random(state);
                pieces[kind][square] = state;
                square += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece kind on a square (0 for `Empty`).
    #[inline]
    pub fn piece(&self, kind: PieceKind, square: Square) -> u64 {
        match self.pieces.get(kind.index()) {
            Some(row) => row[square.index() as usize],
            None => 0,
        }
    }

    /// Returns the side-to-move key.
    #[inline]
    pub const fn black_to_move(&self) -> u64 {
        self.black_to_move
    }

    /// Returns the XOR of the keys of every right held in `rights`.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for (i, right) in CastlingRights::ALL_RIGHTS.iter().enumerate() {
            if rights.has(*right) {
                key ^= self.castling[i];
            }
        }
        key
    }

    /// Returns the key for an en passant file, or 0 for none.
    #[inline]
    pub fn en_passant(&self, file: Option<File>) -> u64 {
        file.map_or(0, |f| self.en_passant[f.index() as usize])
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Recomputes a position's hash from scratch.
///
/// Positions maintain their hash incrementally; this is used when a
/// position is first built and to check the incremental value.
pub fn hash_of(position: &Position) -> u64 {
    let mut hash = 0u64;
    for kind in PieceKind::ALL {
        for sq in position.pieces(kind) {
            hash ^= ZOBRIST.piece(kind, sq);
        }
    }
    if position.side_to_move() == Color::Black {
        hash ^= ZOBRIST.black_to_move();
    }
    hash ^= ZOBRIST.castling(position.castling());
    hash ^= ZOBRIST.en_passant(position.en_passant_file());
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct_and_nonzero() {
        let mut seen = HashSet::new();
        for kind in PieceKind::ALL {
            for sq in Square::all() {
                assert!(seen.insert(ZOBRIST.piece(kind, sq)));
            }
        }
        assert!(seen.insert(ZOBRIST.black_to_move()));
        for key in ZOBRIST.castling.iter().chain(ZOBRIST.en_passant.iter()) {
            assert!(seen.insert(*key));
        }
        assert!(!seen.contains(&0));
        assert_eq!(seen.len(), 768 + 1 + 4 + 8);
    }

    #[test]
    fn empty_kind_and_no_en_passant_hash_to_zero() {
        assert_eq!(ZOBRIST.piece(PieceKind::Empty, Square::E1), 0);
        assert_eq!(ZOBRIST.en_passant(None), 0);
        assert_eq!(ZOBRIST.castling(CastlingRights::NONE), 0);
    }

    #[test]
    fn castling_key_is_xor_of_rights() {
        let all = ZOBRIST.castling(CastlingRights::ALL);
        let folded = ZOBRIST.castling.iter().fold(0, |acc, k| acc ^ k);
        assert_eq!(all, folded);
    }

    #[test]
    fn startpos_hash_matches_recomputation() {
        let position = Position::startpos();
        assert_eq!(position.hash(), hash_of(&position));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(white.hash() ^ black.hash(), ZOBRIST.black_to_move());
    }
}
