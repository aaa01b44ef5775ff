//! Bitboard chess rules engine.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with bit-scan primitives
//! - [`attacks`] - precomputed leaper tables, the in-between table and
//!   magic-bitboard sliding attacks
//! - [`Position`] - the mutable board with incremental make/unmake,
//!   Zobrist hashing, repetition history and cached attack maps
//! - [`MoveGenerator`] - fully legal move generation, and perft
//!
//! # Architecture
//!
//! Each of the twelve colored piece kinds has its own 64-bit bitboard.
//! Moves are applied in place and undone from a snapshot stack, so a
//! search walks the game tree through one `Position` without copying it.
//!
//! # Example
//!
//! ```
//! use chess_engine::{MoveGenerator, Position};
//! use chess_core::UciMove;
//!
//! let mut position = Position::startpos();
//! let mut generator = MoveGenerator::new();
//! assert_eq!(generator.legal_moves(&mut position, false).len(), 20);
//!
//! let e4 = UciMove::parse("e2e4").unwrap();
//! let m = generator.find(&mut position, e4).unwrap();
//! position.apply_move(m);
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! position.undo_move();
//! ```

pub mod attacks;
mod bitboard;
mod error;
pub mod movegen;
mod position;
pub mod zobrist;

pub use bitboard::{Bitboard, BitboardIter};
pub use error::{InvariantError, PositionError};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{generate_legal, MoveGenerator, MoveList, Outcome};
pub use position::{CastlingRights, Position, PositionSetup};
