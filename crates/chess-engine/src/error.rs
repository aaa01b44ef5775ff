//! Errors raised when building a position from an external description,
//! and by the consistency check over a live position.

use chess_core::{Color, FenError, PieceKind, Square};
use thiserror::Error;

/// An invalid position description.
///
/// Returned by [`Position::from_setup`](crate::Position::from_setup) and
/// [`Position::from_fen`](crate::Position::from_fen); the caller keeps
/// whatever position it had before.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("square {0} is claimed by more than one piece kind")]
    OverlappingPieces(Square),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("castling right {right} held without king and rook on their home squares")]
    CastlingWithoutPieces { right: char },

    #[error("en passant file {file} has no double-pushed pawn behind an empty target square")]
    InvalidEnPassant { file: char },

    #[error("{0} is in check but it is not their turn")]
    OpponentInCheck(Color),

    #[error("fullmove number must be at least 1")]
    ZeroFullmoveNumber,
}

/// A broken internal invariant, found by
/// [`Position::validate_invariants`](crate::Position::validate_invariants).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("{kind:?} overlaps another piece kind on {square}")]
    OverlappingPieces { kind: PieceKind, square: Square },

    #[error("color bitboards differ from the piece unions")]
    ColorUnion,

    #[error("occupancy differs from the piece union")]
    Occupancy,

    #[error("hash {stored:#018x} differs from recomputed {expected:#018x}")]
    Hash { stored: u64, expected: u64 },

    #[error("stale attack map for {0}")]
    StaleAttackMap(Color),

    #[error("stale unsafe king squares for {0}")]
    StaleUnsafeKing(Color),

    #[error("stale checkers for {0}")]
    StaleCheckers(Color),
}
