//! Precomputed attack tables.
//!
//! Leaper tables (knight, king, pawn captures), file and rank masks and the
//! 64x64 in-between table are evaluated at compile time into read-only
//! statics. Sliding-piece tables live in [`magics`] and are built once on
//! first use.

mod magics;

use crate::Bitboard;
use chess_core::{Color, Square};

pub use magics::{bishop_attacks, init_sliding_attacks, queen_attacks, rook_attacks};

/// Precomputed knight attack tables.
static KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

/// Precomputed king attack tables.
static KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

/// Precomputed pawn capture tables [color][square].
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = compute_pawn_attacks();

/// Squares strictly between two aligned squares [from][to].
static BETWEEN: [[Bitboard; 64]; 64] = compute_between();

/// File masks, a-file first.
pub const FILES: [Bitboard; 8] = compute_files();

/// Rank masks, first rank first.
pub const RANKS: [Bitboard; 8] = compute_ranks();

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the diagonal capture squares of a pawn of `color` on `sq`.
///
/// Forward pushes are never included.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns the squares strictly between `a` and `b`.
///
/// Empty unless the two squares share a rank, file or diagonal.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index() as usize][b.index() as usize]
}

/// Returns the mask of the file containing `sq`.
#[inline]
pub fn file_mask(sq: Square) -> Bitboard {
    FILES[sq.file().index() as usize]
}

/// Returns the mask of the rank containing `sq`.
#[inline]
pub fn rank_mask(sq: Square) -> Bitboard {
    RANKS[sq.rank().index() as usize]
}

/// Sets the bit at (rank, file) if both are on the board.
const fn on_board_bit(rank: i8, file: i8) -> u64 {
    if rank >= 0 && rank < 8 && file >= 0 && file < 8 {
        1u64 << (rank * 8 + file)
    } else {
        0
    }
}

/// Unions the squares reached by single steps of the given offsets.
const fn leaper_attacks(sq: u8, deltas: &[(i8, i8)]) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut bb = 0u64;
    let mut i = 0;
    while i < deltas.len() {
        bb |= on_board_bit(rank + deltas[i].0, file + deltas[i].1);
        i += 1;
    }
    Bitboard(bb)
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Computes knight attacks for all squares at compile time.
const fn compute_knight_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        attacks[sq as usize] = leaper_attacks(sq, &KNIGHT_DELTAS);
        sq += 1;
    }
    attacks
}

/// Computes king attacks for all squares at compile time.
const fn compute_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        attacks[sq as usize] = leaper_attacks(sq, &KING_DELTAS);
        sq += 1;
    }
    attacks
}

/// Computes pawn capture squares for all squares at compile time.
const fn compute_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;
    while sq < 64 {
        // White captures toward rank 8, Black toward rank 1
        attacks[0][sq as usize] = leaper_attacks(sq, &[(1, 1), (1, -1)]);
        attacks[1][sq as usize] = leaper_attacks(sq, &[(-1, 1), (-1, -1)]);
        sq += 1;
    }
    attacks
}

/// Computes the in-between table by walking each of the eight rays from
/// every square and recording the squares passed before each target.
const fn compute_between() -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut from = 0u8;
    while from < 64 {
        let mut d = 0;
        while d < KING_DELTAS.len() {
            let (dr, df) = KING_DELTAS[d];
            let mut rank = (from / 8) as i8 + dr;
            let mut file = (from % 8) as i8 + df;
            let mut path = 0u64;
            while rank >= 0 && rank < 8 && file >= 0 && file < 8 {
                let to = (rank * 8 + file) as usize;
                table[from as usize][to] = Bitboard(path);
                path |= 1u64 << to;
                rank += dr;
                file += df;
            }
            d += 1;
        }
        from += 1;
    }
    table
}

const fn compute_files() -> [Bitboard; 8] {
    let mut files = [Bitboard::EMPTY; 8];
    let mut f = 0;
    while f < 8 {
        files[f] = Bitboard(0x0101_0101_0101_0101u64 << f);
        f += 1;
    }
    files
}

const fn compute_ranks() -> [Bitboard; 8] {
    let mut ranks = [Bitboard::EMPTY; 8];
    let mut r = 0;
    while r < 8 {
        ranks[r] = Bitboard(0xFFu64 << (r * 8));
        r += 1;
    }
    ranks
}
