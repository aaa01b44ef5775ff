//! Legal move generation.
//!
//! Every piece kind runs through the same pipeline: candidate targets from
//! the attack tables, masked by the check constraints, then accepted
//! directly unless the move needs a trial. Only moves by pinned pieces, en
//! passant captures and castling are tried on the board (apply, test for
//! check, undo); everything else is legal by construction.

use chess_core::{Color, File, Move, MoveFlag, Piece, PieceKind, Rank, Square};

use super::MoveList;
use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks,
    rook_attacks,
};
use crate::{Bitboard, CastlingRights, Position};

/// What every candidate move of one generation pass is checked against.
struct Constraints {
    us: Color,
    king: Square,
    own: Bitboard,
    enemy: Bitboard,
    occupied: Bitboard,
    checkers: Bitboard,
    /// Squares a non-king move may land on: the checker plus the squares
    /// between it and the king in single check, every square otherwise.
    check_mask: Bitboard,
    pinned: Bitboard,
    unsafe_king: Bitboard,
    captures_only: bool,
}

impl Constraints {
    fn new(position: &Position, captures_only: bool) -> Self {
        let us = position.side_to_move();
        let them = us.opposite();
        let king = position.king_square(us);
        let own = position.color_bitboard(us);
        let occupied = position.occupied();
        let checkers = position.checking_pieces(us);

        let check_mask = match checkers.first_square() {
            None => Bitboard::FULL,
            Some(_) if checkers.has_many() => Bitboard::EMPTY,
            Some(checker) => checkers | between(king, checker),
        };

        let queens = position.pieces_of(Piece::Queen, them);
        let straight = position.pieces_of(Piece::Rook, them) | queens;
        let diagonal = position.pieces_of(Piece::Bishop, them) | queens;
        let pinned = pinned_along(king, own, occupied, straight, rook_attacks)
            | pinned_along(king, own, occupied, diagonal, bishop_attacks);

        Constraints {
            us,
            king,
            own,
            enemy: position.color_bitboard(them),
            occupied,
            checkers,
            check_mask,
            pinned,
            unsafe_king: position.unsafe_king_squares(us),
            captures_only,
        }
    }

    /// Destinations open to a non-king piece before pin checks.
    fn target_mask(&self) -> Bitboard {
        let mask = self.check_mask.without(self.own);
        if self.captures_only {
            mask & self.enemy
        } else {
            mask
        }
    }
}

/// Own pieces shielding `king` from `sliders` moving like `attacks`.
///
/// Lifts the first own blocker off every ray from the king; any slider
/// seen only after that is pinning the piece between itself and the king.
fn pinned_along(
    king: Square,
    own: Bitboard,
    occupied: Bitboard,
    sliders: Bitboard,
    attacks: fn(Square, Bitboard) -> Bitboard,
) -> Bitboard {
    let direct = attacks(king, occupied);
    let xray = attacks(king, occupied.without(direct & own));
    let mut pinned = Bitboard::EMPTY;
    for pinner in xray.without(direct) & sliders {
        pinned |= between(king, pinner) & own;
    }
    pinned
}

/// Plays `m`, asks whether the mover's king is attacked, and takes it back.
fn leaves_king_safe(position: &mut Position, m: Move) -> bool {
    let us = position.side_to_move();
    position.apply_move(m);
    let safe = !position.is_in_check(us);
    position.undo_move();
    safe
}

/// Adds `m`, trying it first if the moving piece is pinned.
#[inline]
fn push_checked(position: &mut Position, c: &Constraints, m: Move, moves: &mut MoveList) {
    if !c.pinned.contains(m.from()) || leaves_king_safe(position, m) {
        moves.push(m);
    }
}

/// Generates every legal move for the side to move.
///
/// With `captures_only`, keeps just the moves whose flag has the capture
/// bit: captures, en passant and capturing promotions.
pub fn generate_legal(position: &mut Position, captures_only: bool) -> MoveList {
    let c = Constraints::new(position, captures_only);
    let mut moves = MoveList::new();

    // In double check only the king may move
    if !c.checkers.has_many() {
        generate_pawn_moves(position, &c, &mut moves);
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            generate_piece_moves(position, &c, piece, &mut moves);
        }
        if !captures_only && c.checkers.is_empty() {
            generate_castling_moves(position, &c, &mut moves);
        }
    }
    generate_king_moves(position, &c, &mut moves);

    moves
}

fn generate_pawn_moves(position: &mut Position, c: &Constraints, moves: &mut MoveList) {
    let us = c.us;
    let pawn = PieceKind::new(Piece::Pawn, us);
    let push = us.pawn_push_offset();
    let mask = c.target_mask();
    let en_passant = position.en_passant_square();

    for from in position.pieces(pawn) {
        let attacks = pawn_attacks(from, us);

        for to in attacks & c.enemy & mask {
            let captured = position.piece_at(to);
            if is_promotion_square(to, us) {
                push_promotions(position, c, from, to, captured, moves);
            } else {
                let m = Move::new(from, to, pawn, captured, MoveFlag::Capture);
                push_checked(position, c, m, moves);
            }
        }

        // Removing the captured pawn can open a rank onto the king, which
        // neither the pins nor the check mask describe
        if let Some(target) = en_passant.filter(|t| attacks.contains(*t)) {
            let victim = PieceKind::new(Piece::Pawn, us.opposite());
            let m = Move::new(from, target, pawn, victim, MoveFlag::EnPassant);
            if leaves_king_safe(position, m) {
                moves.push(m);
            }
        }

        if c.captures_only {
            continue;
        }
        let Some(to) = from.offset(push).filter(|to| !c.occupied.contains(*to)) else {
            continue;
        };
        if mask.contains(to) {
            if is_promotion_square(to, us) {
                push_promotions(position, c, from, to, PieceKind::Empty, moves);
            } else {
                push_checked(position, c, Move::quiet(from, to, pawn, MoveFlag::Quiet), moves);
            }
        }
        if from.rank().index() == us.pawn_start_rank() {
            if let Some(to) = to
                .offset(push)
                .filter(|to| !c.occupied.contains(*to) && mask.contains(*to))
            {
                let m = Move::quiet(from, to, pawn, MoveFlag::DoublePush);
                push_checked(position, c, m, moves);
            }
        }
    }
}

#[inline]
fn is_promotion_square(to: Square, us: Color) -> bool {
    to.rank().index() == us.promotion_rank()
}

/// One move per promotion piece, queen first.
fn push_promotions(
    position: &mut Position,
    c: &Constraints,
    from: Square,
    to: Square,
    captured: PieceKind,
    moves: &mut MoveList,
) {
    let pawn = PieceKind::new(Piece::Pawn, c.us);
    for piece in Piece::PROMOTIONS {
        if let Some(flag) = MoveFlag::promotion(piece, !captured.is_empty()) {
            push_checked(position, c, Move::new(from, to, pawn, captured, flag), moves);
        }
    }
}

fn piece_attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
        Piece::Pawn => Bitboard::EMPTY,
    }
}

/// Knight, bishop, rook and queen moves.
fn generate_piece_moves(
    position: &mut Position,
    c: &Constraints,
    piece: Piece,
    moves: &mut MoveList,
) {
    let kind = PieceKind::new(piece, c.us);
    let mask = c.target_mask();

    for from in position.pieces(kind) {
        for to in piece_attacks(piece, from, c.occupied) & mask {
            let captured = position.piece_at(to);
            let flag = if captured.is_empty() {
                MoveFlag::Quiet
            } else {
                MoveFlag::Capture
            };
            push_checked(position, c, Move::new(from, to, kind, captured, flag), moves);
        }
    }
}

fn generate_king_moves(position: &mut Position, c: &Constraints, moves: &mut MoveList) {
    let king = PieceKind::new(Piece::King, c.us);
    let mut targets = king_attacks(c.king).without(c.own).without(c.unsafe_king);
    if c.captures_only {
        targets &= c.enemy;
    }

    for to in targets {
        let captured = position.piece_at(to);
        let flag = if captured.is_empty() {
            MoveFlag::Quiet
        } else {
            MoveFlag::Capture
        };
        moves.push(Move::new(c.king, to, king, captured, flag));
    }
}

/// A castling move as seen from the king's home square.
struct CastlingOption {
    right: CastlingRights,
    flag: MoveFlag,
    rook_home: Square,
    king_to: Square,
    /// Squares the king crosses or lands on.
    king_path: Bitboard,
}

fn castling_options(color: Color) -> [CastlingOption; 2] {
    let rank = match color {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    };
    let on_rank = |file| Square::new(file, rank);
    [
        CastlingOption {
            right: CastlingRights::kingside(color),
            flag: MoveFlag::KingCastle,
            rook_home: on_rank(File::H),
            king_to: on_rank(File::G),
            king_path: Bitboard::from_square(on_rank(File::F))
                | Bitboard::from_square(on_rank(File::G)),
        },
        CastlingOption {
            right: CastlingRights::queenside(color),
            flag: MoveFlag::QueenCastle,
            rook_home: on_rank(File::A),
            king_to: on_rank(File::C),
            king_path: Bitboard::from_square(on_rank(File::D))
                | Bitboard::from_square(on_rank(File::C)),
        },
    ]
}

fn generate_castling_moves(position: &mut Position, c: &Constraints, moves: &mut MoveList) {
    let king = PieceKind::new(Piece::King, c.us);
    let rights = position.castling();
    // Trials below clear the derived cache
    let enemy_attacks = position.attack_bitboard(c.us.opposite());

    for option in castling_options(c.us) {
        if !rights.has(option.right) {
            continue;
        }
        if (between(c.king, option.rook_home) & c.occupied).is_not_empty() {
            continue;
        }
        if (option.king_path & enemy_attacks).is_not_empty() {
            continue;
        }
        let m = Move::quiet(c.king, option.king_to, king, option.flag);
        if leaves_king_safe(position, m) {
            moves.push(m);
        }
    }
}
