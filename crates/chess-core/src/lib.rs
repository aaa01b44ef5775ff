//! Core value types for the chess rules engine.
//!
//! This crate provides the small, `Copy` types shared by every layer:
//! - [`Color`], [`Piece`] and the colored [`PieceKind`]
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`], a 24-bit packed move, with its [`MoveFlag`]
//! - [`UciMove`], the (from, to, promotion) tuple exchanged with text front-ends
//! - FEN syntax validation ([`FenParser`])

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveFlag, UciMove};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
