//! Chess position representation.
//!
//! A [`Position`] owns twelve piece bitboards (one per [`PieceKind`]), the
//! side to move, castling rights, the en passant file, the move counters,
//! an incrementally maintained Zobrist hash, the repetition history and an
//! undo stack. It is mutated in place with [`Position::apply_move`] and
//! [`Position::undo_move`].

mod castling;
mod derived;
mod make;
mod setup;

pub use castling::CastlingRights;
pub use setup::PositionSetup;

use chess_core::{Color, FenParser, File, Piece, PieceKind, Rank, Square};

use crate::zobrist;
use crate::{Bitboard, InvariantError, PositionError};
use derived::DerivedCache;

/// State that cannot be recovered from a move alone.
#[derive(Debug, Clone, Copy)]
struct Undo {
    mv: chess_core::Move,
    castling: CastlingRights,
    en_passant: Option<File>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

/// Complete chess position state.
///
/// Construct one with [`Position::from_setup`], [`Position::from_fen`] or
/// [`Position::startpos`]. A position is owned by one caller at a time;
/// give each worker its own copy via [`Position::fork`].
#[derive(Debug, Clone)]
pub struct Position {
    /// Bitboards for each piece kind, indexed by [`PieceKind::index`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Bitboards for each color's pieces.
    colors: [Bitboard; 2],
    /// Union of all pieces.
    occupied: Bitboard,
    side_to_move: Color,
    castling: CastlingRights,
    /// File of the pawn that just made a double push, if any.
    en_passant: Option<File>,
    /// Plies since the last pawn move or capture.
    halfmove_clock: u32,
    /// Fullmove number (starts at 1, increments after Black's move).
    fullmove_number: u32,
    hash: u64,
    /// Hashes of the positions before each applied move, oldest first.
    history: Vec<u64>,
    undo_stack: Vec<Undo>,
    /// Bumped on every mutation.
    generation: u64,
    derived: DerivedCache,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::from_setup(&PositionSetup::from_fen(fen)?)
    }

    /// Builds a position from a validated description.
    ///
    /// Also builds the sliding-piece attack tables on first use.
    pub fn from_setup(setup: &PositionSetup) -> Result<Self, PositionError> {
        crate::attacks::init_sliding_attacks();

        if let Err(err) = setup.validate() {
            tracing::debug!(%err, "rejected position description");
            return Err(err);
        }

        let mut colors = [Bitboard::EMPTY; 2];
        for kind in PieceKind::ALL {
            if let Some(color) = kind.color() {
                colors[color.index()] |= setup.pieces[kind.index()];
            }
        }

        let mut position = Position {
            pieces: setup.pieces,
            colors,
            occupied: colors[0] | colors[1],
            side_to_move: setup.side_to_move,
            castling: setup.castling,
            en_passant: setup.en_passant,
            halfmove_clock: setup.halfmove_clock,
            fullmove_number: setup.fullmove_number,
            hash: 0,
            history: Vec::new(),
            undo_stack: Vec::new(),
            generation: 0,
            derived: DerivedCache::default(),
        };
        position.hash = zobrist::hash_of(&position);

        let waiting = position.side_to_move.opposite();
        if position.is_in_check(waiting) {
            let err = PositionError::OpponentInCheck(waiting);
            tracing::debug!(%err, "rejected position description");
            return Err(err);
        }

        Ok(position)
    }

    /// Returns the description this position could be rebuilt from.
    pub fn setup(&self) -> PositionSetup {
        PositionSetup {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.setup().to_fen()
    }

    /// Returns an independent copy for another owner.
    ///
    /// The copy shares nothing with `self`: its undo stack starts empty (it
    /// cannot take back moves made before the fork) while the repetition
    /// history carries over.
    pub fn fork(&self) -> Position {
        Position {
            pieces: self.pieces,
            colors: self.colors,
            occupied: self.occupied,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            history: self.history.clone(),
            undo_stack: Vec::new(),
            generation: 0,
            derived: DerivedCache::default(),
        }
    }

    /// Returns the piece kind on `sq`, or [`PieceKind::Empty`].
    pub fn piece_at(&self, sq: Square) -> PieceKind {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return PieceKind::Empty;
        };

        Piece::ALL
            .into_iter()
            .map(|piece| PieceKind::new(piece, color))
            .find(|kind| self.pieces[kind.index()].contains(sq))
            .unwrap_or(PieceKind::Empty)
    }

    /// Returns the squares holding `kind`; for `Empty`, the empty squares.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        match self.pieces.get(kind.index()) {
            Some(bb) => *bb,
            None => !self.occupied,
        }
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[PieceKind::new(piece, color).index()]
    }

    /// Returns every square occupied by `color`.
    #[inline]
    pub fn color_bitboard(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied
    }

    /// Returns the square of `color`'s king.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king, which construction rules out.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(Piece::King, color)
            .first_square()
            .expect("validated positions have one king per color")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// File of the pawn that just made a double push, if any.
    #[inline]
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant
    }

    /// The square a pawn of the side to move would capture en passant onto.
    pub fn en_passant_square(&self) -> Option<Square> {
        let rank = match self.side_to_move {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        self.en_passant.map(|file| Square::new(file, rank))
    }

    /// Plies since the last pawn move or capture (the 50-move counter).
    #[inline]
    pub fn ply_since_irreversible(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the Zobrist hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Counter bumped by every mutation; equal values mean an unchanged
    /// position.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of moves that can currently be undone.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns true if a position with this hash occurred earlier in the
    /// game (before the current position).
    pub fn has_seen(&self, hash: u64) -> bool {
        self.history.contains(&hash)
    }

    /// How many times the current position has occurred, counting itself,
    /// since the last pawn move or capture.
    pub fn repetition_count(&self) -> usize {
        let window = (self.halfmove_clock as usize).min(self.history.len());
        1 + self
            .history
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .filter(|&&h| h == self.hash)
            .count()
    }

    /// Returns true if the current position already occurred since the last
    /// pawn move or capture.
    pub fn is_repetition(&self) -> bool {
        self.repetition_count() > 1
    }

    /// Checks the structural invariants against a from-scratch rebuild.
    ///
    /// Verifies that the piece bitboards are pairwise disjoint, that the
    /// color and occupancy bitboards are their unions, that the hash
    /// matches a recomputation and that every valid derived cache entry
    /// matches a recomputation.
    pub fn validate_invariants(&self) -> Result<(), InvariantError> {
        let mut seen = Bitboard::EMPTY;
        let mut colors = [Bitboard::EMPTY; 2];
        for kind in PieceKind::ALL {
            let bb = self.pieces[kind.index()];
            if let Some(square) = (seen & bb).first_square() {
                return Err(InvariantError::OverlappingPieces { kind, square });
            }
            seen |= bb;
            if let Some(color) = kind.color() {
                colors[color.index()] |= bb;
            }
        }
        if colors != self.colors {
            return Err(InvariantError::ColorUnion);
        }
        if seen != self.occupied {
            return Err(InvariantError::Occupancy);
        }
        let expected = zobrist::hash_of(self);
        if expected != self.hash {
            return Err(InvariantError::Hash {
                stored: self.hash,
                expected,
            });
        }
        self.validate_derived()
    }

    /// Flips `kind` on `sq` in the piece, color and occupancy bitboards.
    #[inline]
    fn toggle(&mut self, kind: PieceKind, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[kind.index()] ^= bb;
        if let Some(color) = kind.color() {
            self.colors[color.index()] ^= bb;
        }
        self.occupied ^= bb;
    }

    /// Drops every derived value and bumps the generation.
    #[inline]
    fn invalidate(&mut self) {
        self.derived.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
