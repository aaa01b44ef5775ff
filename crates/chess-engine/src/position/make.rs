//! Incremental make/unmake.
//!
//! Piece bitboards are updated with XOR toggles, so undoing a move replays
//! the same toggles. Only state a move cannot reproduce (castling rights,
//! en passant file, clocks, hash) goes into the undo snapshot.

use chess_core::{Color, Move, MoveFlag, Piece, PieceKind, Square};

use super::{Position, Undo};
use crate::zobrist::ZOBRIST;

/// Rook source and destination for a castling move.
fn castling_rook_squares(flag: MoveFlag, color: Color) -> (Square, Square) {
    match (flag, color) {
        (MoveFlag::KingCastle, Color::White) => (Square::H1, Square::F1),
        (MoveFlag::KingCastle, Color::Black) => (Square::H8, Square::F8),
        (_, Color::White) => (Square::A1, Square::D1),
        (_, Color::Black) => (Square::A8, Square::D8),
    }
}

/// The square a capture removes a piece from; behind `to` for en passant.
#[inline]
fn capture_square(m: Move) -> Square {
    match m.flag() {
        MoveFlag::EnPassant => Square::new(m.to().file(), m.from().rank()),
        _ => m.to(),
    }
}

/// The kind standing on the target square after the move.
#[inline]
fn placed_kind(m: Move, color: Color) -> PieceKind {
    match m.flag().promotion_piece() {
        Some(piece) => PieceKind::new(piece, color),
        None => m.piece(),
    }
}

impl Position {
    /// Plays `m` for the side to move.
    ///
    /// `m` must come from this position's legal move list (or be known to
    /// be at least pseudolegal here).
    ///
    /// # Panics
    ///
    /// Panics if the moving piece is not on the source square, or if a
    /// capture's victim is not where the move says.
    pub fn apply_move(&mut self, m: Move) {
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();
        let piece = m.piece();
        let flag = m.flag();

        assert!(
            piece.color() == Some(us) && self.pieces(piece).contains(from),
            "apply_move({m}): {piece:?} is not on {from}"
        );

        let victim = if flag.is_capture() {
            let captured = m.captured();
            let at = capture_square(m);
            assert!(
                captured.color() == Some(us.opposite())
                    && !captured.is(Piece::King)
                    && self.pieces(captured).contains(at),
                "apply_move({m}): {captured:?} is not on {at}"
            );
            Some((captured, at))
        } else {
            assert!(
                !self.occupied.contains(to),
                "apply_move({m}): quiet move onto occupied {to}"
            );
            None
        };

        self.undo_stack.push(Undo {
            mv: m,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        });
        self.history.push(self.hash);

        let mut hash = self.hash
            ^ ZOBRIST.castling(self.castling)
            ^ ZOBRIST.en_passant(self.en_passant)
            ^ ZOBRIST.black_to_move();

        if let Some((captured, at)) = victim {
            self.toggle(captured, at);
            hash ^= ZOBRIST.piece(captured, at);
        }

        self.toggle(piece, from);
        hash ^= ZOBRIST.piece(piece, from);
        let placed = placed_kind(m, us);
        self.toggle(placed, to);
        hash ^= ZOBRIST.piece(placed, to);

        if flag.is_castling() {
            let rook = PieceKind::new(Piece::Rook, us);
            let (rook_from, rook_to) = castling_rook_squares(flag, us);
            self.toggle(rook, rook_from);
            self.toggle(rook, rook_to);
            hash ^= ZOBRIST.piece(rook, rook_from) ^ ZOBRIST.piece(rook, rook_to);
        }

        self.castling.touch(from);
        self.castling.touch(to);
        self.en_passant = match flag {
            MoveFlag::DoublePush => Some(from.file()),
            _ => None,
        };

        if piece.is(Piece::Pawn) || victim.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.opposite();

        hash ^= ZOBRIST.castling(self.castling) ^ ZOBRIST.en_passant(self.en_passant);
        self.hash = hash;
        self.invalidate();
    }

    /// Takes back the most recent [`apply_move`](Self::apply_move) or
    /// [`apply_null_move`](Self::apply_null_move).
    ///
    /// # Panics
    ///
    /// Panics if there is nothing to undo.
    pub fn undo_move(&mut self) {
        let Some(undo) = self.undo_stack.pop() else {
            panic!("undo_move called with an empty undo stack");
        };
        self.history.pop();

        let us = self.side_to_move.opposite();
        self.side_to_move = us;

        let m = undo.mv;
        if !m.is_null() {
            let flag = m.flag();
            if flag.is_castling() {
                let rook = PieceKind::new(Piece::Rook, us);
                let (rook_from, rook_to) = castling_rook_squares(flag, us);
                self.toggle(rook, rook_to);
                self.toggle(rook, rook_from);
            }
            self.toggle(placed_kind(m, us), m.to());
            self.toggle(m.piece(), m.from());
            if flag.is_capture() {
                self.toggle(m.captured(), capture_square(m));
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
        self.invalidate();
    }

    /// Passes the turn without moving a piece.
    ///
    /// Clears the en passant file. Only meaningful when the side to move is
    /// not in check; the generator never produces this.
    pub fn apply_null_move(&mut self) {
        debug_assert!(!self.is_in_check(self.side_to_move), "null move while in check");

        self.undo_stack.push(Undo {
            mv: Move::NULL,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        });
        self.history.push(self.hash);

        self.hash ^= ZOBRIST.en_passant(self.en_passant) ^ ZOBRIST.black_to_move();
        self.en_passant = None;
        self.halfmove_clock += 1;
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opposite();
        self.invalidate();
    }

    /// Takes back a null move.
    ///
    /// # Panics
    ///
    /// Panics if the most recent entry on the undo stack is not a null move.
    pub fn undo_null_move(&mut self) {
        assert!(
            self.undo_stack.last().is_some_and(|undo| undo.mv.is_null()),
            "undo_null_move called without a null move on top of the undo stack"
        );
        self.undo_move();
    }
}
