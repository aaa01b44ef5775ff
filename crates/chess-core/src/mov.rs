//! Move representation.

use crate::{Piece, PieceKind, Square};
use std::fmt;

/// The 4-bit move flag.
///
/// Bit 2 is set exactly for captures and bit 3 exactly for promotions, so
/// both questions are a single mask test on the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Non-capturing move with no special action.
    Quiet = 0,
    /// Pawn double push from its starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    KingCastle = 2,
    /// Queenside castling (O-O-O).
    QueenCastle = 3,
    /// Ordinary capture.
    Capture = 4,
    /// En passant capture.
    EnPassant = 5,
    PromoteKnight = 8,
    PromoteBishop = 9,
    PromoteRook = 10,
    PromoteQueen = 11,
    PromoteKnightCapture = 12,
    PromoteBishopCapture = 13,
    PromoteRookCapture = 14,
    PromoteQueenCapture = 15,
}

impl MoveFlag {
    const CAPTURE_BIT: u8 = 0b0100;
    const PROMOTION_BIT: u8 = 0b1000;

    /// Decodes a raw 4-bit flag. The unused values 6 and 7 decode as `Quiet`.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0xF {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::KingCastle,
            3 => MoveFlag::QueenCastle,
            4 => MoveFlag::Capture,
            5 => MoveFlag::EnPassant,
            8 => MoveFlag::PromoteKnight,
            9 => MoveFlag::PromoteBishop,
            10 => MoveFlag::PromoteRook,
            11 => MoveFlag::PromoteQueen,
            12 => MoveFlag::PromoteKnightCapture,
            13 => MoveFlag::PromoteBishopCapture,
            14 => MoveFlag::PromoteRookCapture,
            15 => MoveFlag::PromoteQueenCapture,
            _ => MoveFlag::Quiet,
        }
    }

    /// Builds the promotion flag for `piece`, with or without a capture.
    ///
    /// Returns `None` for pawns and kings.
    #[inline]
    pub const fn promotion(piece: Piece, capture: bool) -> Option<Self> {
        let base = match piece {
            Piece::Knight => 0,
            Piece::Bishop => 1,
            Piece::Rook => 2,
            Piece::Queen => 3,
            _ => return None,
        };
        let capture_bit = if capture { Self::CAPTURE_BIT } else { 0 };
        Some(Self::from_bits(Self::PROMOTION_BIT | capture_bit | base))
    }

    /// Returns the raw 4-bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns true if this move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self as u8 & Self::CAPTURE_BIT != 0
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self as u8 & Self::PROMOTION_BIT != 0
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if !self.is_promotion() {
            return None;
        }
        match self as u8 & 0b11 {
            0 => Some(Piece::Knight),
            1 => Some(Piece::Bishop),
            2 => Some(Piece::Rook),
            _ => Some(Piece::Queen),
        }
    }
}

/// A chess move.
///
/// Packed into the low 24 bits of a `u32`:
///
/// | bits  | field                         |
/// |-------|-------------------------------|
/// | 0-5   | target square                 |
/// | 6-11  | source square                 |
/// | 12-15 | moving [`PieceKind`]          |
/// | 16-19 | captured [`PieceKind`]        |
/// | 20-23 | [`MoveFlag`]                  |
///
/// The captured kind is `Empty` for non-captures. Moves are plain values;
/// nothing about them changes after construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// The null move: a1 to a1, empty pieces, quiet flag.
    ///
    /// Only search code uses it (null-move pruning); the generator never
    /// produces it.
    pub const NULL: Move = Move::new(
        Square::A1,
        Square::A1,
        PieceKind::Empty,
        PieceKind::Empty,
        MoveFlag::Quiet,
    );

    /// Creates a new move.
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: PieceKind,
        flag: MoveFlag,
    ) -> Self {
        let encoded = (to.index() as u32)
            | ((from.index() as u32) << 6)
            | ((piece as u32) << 12)
            | ((captured as u32) << 16)
            | ((flag as u32) << 20);
        Move(encoded)
    }

    /// Creates a non-capturing move with the given flag.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: PieceKind, flag: MoveFlag) -> Self {
        Self::new(from, to, piece, PieceKind::Empty, flag)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits, always valid square index
        unsafe { Square::from_index_unchecked((self.0 & 0x3F) as u8) }
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits, always valid square index
        unsafe { Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as u8) }
    }

    /// Returns the kind of the moving piece.
    #[inline]
    pub const fn piece(self) -> PieceKind {
        PieceKind::from_index(((self.0 >> 12) & 0xF) as u8)
    }

    /// Returns the kind of the captured piece (`Empty` unless a capture).
    #[inline]
    pub const fn captured(self) -> PieceKind {
        PieceKind::from_index(((self.0 >> 16) & 0xF) as u8)
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(((self.0 >> 20) & 0xF) as u8)
    }

    /// Returns true if this move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag().is_capture()
    }

    /// Returns true if this is a promotion.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flag().is_promotion()
    }

    /// Returns true if this is the null move.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Returns the raw 24-bit encoding.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the (from, to, promotion) tuple exchanged with text front-ends.
    #[inline]
    pub const fn to_uci_move(self) -> UciMove {
        UciMove {
            from: self.from(),
            to: self.to(),
            promotion: self.flag().promotion_piece(),
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        self.to_uci_move().to_string()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({} {:?}x{:?} {:?})",
            self.to_uci(),
            self.piece(),
            self.captured(),
            self.flag()
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// A move as the text protocol sees it: two squares and an optional
/// promotion piece.
///
/// Castling and en passant are not distinguished here; resolving a
/// `UciMove` against a position's legal moves recovers the full [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// Parses 4-5 character long algebraic notation ("e2e4", "e7e8q").
    pub fn parse(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s.as_bytes().get(4).copied() {
            None => None,
            Some(b'n' | b'N') => Some(Piece::Knight),
            Some(b'b' | b'B') => Some(Piece::Bishop),
            Some(b'r' | b'R') => Some(Piece::Rook),
            Some(b'q' | b'Q') => Some(Piece::Queen),
            Some(_) => return None,
        };
        Some(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let promo = match self.promotion {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        write!(f, "{}{}{}", self.from, self.to, promo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_encoding() {
        let m = Move::quiet(sq("e2"), sq("e4"), PieceKind::WhitePawn, MoveFlag::DoublePush);
        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.piece(), PieceKind::WhitePawn);
        assert_eq!(m.captured(), PieceKind::Empty);
        assert_eq!(m.flag(), MoveFlag::DoublePush);
        assert!(m.raw() < 1 << 24);
    }

    #[test]
    fn capture_fields() {
        let m = Move::new(
            sq("d7"),
            sq("c8"),
            PieceKind::WhitePawn,
            PieceKind::BlackRook,
            MoveFlag::PromoteQueenCapture,
        );
        assert_eq!(m.captured(), PieceKind::BlackRook);
        assert!(m.is_capture());
        assert!(m.is_promotion());
        assert_eq!(m.flag().promotion_piece(), Some(Piece::Queen));
        assert_eq!(m.to_uci(), "d7c8q");
    }

    #[test]
    fn flag_bits_mark_captures_and_promotions() {
        for bits in 0u8..16 {
            if bits == 6 || bits == 7 {
                continue;
            }
            let flag = MoveFlag::from_bits(bits);
            assert_eq!(flag.bits(), bits);
            assert_eq!(flag.is_capture(), bits & 0b0100 != 0);
            assert_eq!(flag.is_promotion(), bits & 0b1000 != 0);
        }
        assert!(MoveFlag::EnPassant.is_capture());
        assert!(!MoveFlag::KingCastle.is_capture());
    }

    #[test]
    fn promotion_flags() {
        assert_eq!(
            MoveFlag::promotion(Piece::Knight, false),
            Some(MoveFlag::PromoteKnight)
        );
        assert_eq!(
            MoveFlag::promotion(Piece::Rook, true),
            Some(MoveFlag::PromoteRookCapture)
        );
        assert_eq!(MoveFlag::promotion(Piece::King, false), None);
        for piece in Piece::PROMOTIONS {
            for capture in [false, true] {
                let flag = MoveFlag::promotion(piece, capture).unwrap();
                assert_eq!(flag.promotion_piece(), Some(piece));
                assert_eq!(flag.is_capture(), capture);
            }
        }
        assert_eq!(MoveFlag::Capture.promotion_piece(), None);
    }

    #[test]
    fn move_flag_is_castling() {
        assert!(!MoveFlag::Quiet.is_castling());
        assert!(MoveFlag::KingCastle.is_castling());
        assert!(MoveFlag::QueenCastle.is_castling());
        assert!(!MoveFlag::EnPassant.is_castling());
    }

    #[test]
    fn uci_roundtrip_text() {
        let parsed = UciMove::parse("e7e8q").unwrap();
        assert_eq!(parsed.from, Square::new(File::E, Rank::R7));
        assert_eq!(parsed.to, Square::E8);
        assert_eq!(parsed.promotion, Some(Piece::Queen));
        assert_eq!(parsed.to_string(), "e7e8q");

        let plain = UciMove::parse("g1f3").unwrap();
        assert_eq!(plain.promotion, None);
    }

    #[test]
    fn uci_parse_rejects_malformed() {
        assert!(UciMove::parse("e2").is_none());
        assert!(UciMove::parse("e2e9").is_none());
        assert!(UciMove::parse("e7e8x").is_none());
        assert!(UciMove::parse("e2e4qq").is_none());
        assert!(UciMove::parse("é2e4").is_none());
    }

    #[test]
    fn move_null() {
        let null = Move::NULL;
        assert!(null.is_null());
        assert_eq!(null.from(), Square::A1);
        assert_eq!(null.to(), Square::A1);
        assert_eq!(null.piece(), PieceKind::Empty);
        assert_eq!(null.captured(), PieceKind::Empty);
    }

    #[test]
    fn move_display() {
        let m = Move::quiet(sq("g1"), sq("f3"), PieceKind::WhiteKnight, MoveFlag::Quiet);
        assert_eq!(format!("{}", m), "g1f3");
        assert!(format!("{:?}", m).starts_with("Move(g1f3"));
    }

    proptest::proptest! {
        #[test]
        fn packed_fields_read_back(
            from in 0u8..64,
            to in 0u8..64,
            piece in 0u8..12,
            captured in 0u8..13,
            bits in 0u8..16,
        ) {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let piece = PieceKind::from_index(piece);
            let captured = PieceKind::from_index(captured);
            let flag = MoveFlag::from_bits(bits);

            let m = Move::new(from, to, piece, captured, flag);
            proptest::prop_assert_eq!(m.from(), from);
            proptest::prop_assert_eq!(m.to(), to);
            proptest::prop_assert_eq!(m.piece(), piece);
            proptest::prop_assert_eq!(m.captured(), captured);
            proptest::prop_assert_eq!(m.flag(), flag);
            proptest::prop_assert_eq!(UciMove::parse(&m.to_uci()), Some(m.to_uci_move()));
        }
    }
}
