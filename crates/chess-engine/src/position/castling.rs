//! Castling rights.

use chess_core::{Color, Square};

/// Castling rights flags.
///
/// Four independent rights: White kingside, White queenside, Black
/// kingside, Black queenside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(0b0001);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(0b0010);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(0b0100);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(0b1000);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// The single rights in `K`, `Q`, `k`, `q` order.
    pub const ALL_RIGHTS: [CastlingRights; 4] = [
        Self::WHITE_KINGSIDE,
        Self::WHITE_QUEENSIDE,
        Self::BLACK_KINGSIDE,
        Self::BLACK_QUEENSIDE,
    ];

    /// Creates castling rights from raw flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Builds rights from four booleans in `K`, `Q`, `k`, `q` order.
    pub fn from_flags(flags: [bool; 4]) -> Self {
        let mut rights = Self::NONE;
        for (held, right) in flags.iter().zip(Self::ALL_RIGHTS) {
            if *held {
                rights.insert(right);
            }
        }
        rights
    }

    /// Returns the four booleans in `K`, `Q`, `k`, `q` order.
    pub fn to_flags(self) -> [bool; 4] {
        Self::ALL_RIGHTS.map(|right| self.has(right))
    }

    /// The kingside right of `color`.
    #[inline]
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    /// The queenside right of `color`.
    #[inline]
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if every right in `other` is held.
    #[inline]
    pub const fn has(self, other: CastlingRights) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.has(Self::kingside(color))
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.has(Self::queenside(color))
    }

    /// Returns true if no right is held.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Grants the rights in `other`.
    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    /// Revokes the rights in `other`.
    #[inline]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    /// Revokes every right that depends on a piece standing on `sq`.
    ///
    /// A king leaving its home square loses both of its rights; a rook
    /// leaving (or being captured on) its corner loses that side's right.
    #[inline]
    pub fn touch(&mut self, sq: Square) {
        self.0 &= RIGHTS_KEPT[sq.index() as usize];
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for CastlingRights {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        CastlingRights(self.0 | rhs.0)
    }
}

/// Rights surviving a move from or to each square.
static RIGHTS_KEPT: [u8; 64] = {
    let mut kept = [0b1111u8; 64];
    kept[Square::E1.index() as usize] = 0b1100;
    kept[Square::H1.index() as usize] = 0b1110;
    kept[Square::A1.index() as usize] = 0b1101;
    kept[Square::E8.index() as usize] = 0b0011;
    kept[Square::H8.index() as usize] = 0b1011;
    kept[Square::A8.index() as usize] = 0b0111;
    kept
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_rights() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::Black));

        rights.remove(CastlingRights::WHITE_KINGSIDE);
        assert!(!rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));
    }

    #[test]
    fn castling_rights_none() {
        let rights = CastlingRights::NONE;
        for color in Color::ALL {
            assert!(!rights.can_castle_kingside(color));
            assert!(!rights.can_castle_queenside(color));
        }
        assert!(rights.is_empty());
        assert!(!rights.has(CastlingRights::NONE));
        assert_eq!(rights.raw(), 0);
    }

    #[test]
    fn flags_roundtrip() {
        let flags = [true, false, false, true];
        let rights = CastlingRights::from_flags(flags);
        assert_eq!(rights, CastlingRights::new(0b1001));
        assert_eq!(rights.to_flags(), flags);
    }

    #[test]
    fn king_move_drops_both_rights() {
        let mut rights = CastlingRights::ALL;
        rights.touch(Square::E1);
        assert_eq!(rights, CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE);
        rights.touch(Square::E8);
        assert!(rights.is_empty());
    }

    #[test]
    fn rook_corner_drops_one_right() {
        let mut rights = CastlingRights::ALL;
        rights.touch(Square::H8);
        assert!(!rights.can_castle_kingside(Color::Black));
        assert!(rights.can_castle_queenside(Color::Black));
        rights.touch(Square::A1);
        assert!(!rights.can_castle_queenside(Color::White));
        assert!(rights.can_castle_kingside(Color::White));
    }

    #[test]
    fn other_squares_keep_rights() {
        let mut rights = CastlingRights::ALL;
        rights.touch(Square::D1);
        rights.touch(Square::B8);
        assert_eq!(rights, CastlingRights::ALL);
    }
}
