//! Player color representation.

/// The two sides of a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Square-index delta of a single pawn push (+8 for White, -8 for Black).
    #[inline]
    pub const fn pawn_push_offset(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Returns the back rank index for this color (0 for White, 7 for Black).
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank index a pawn of this color starts on.
    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank index a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    /// Rank index a pawn of this color lands on after a double push.
    #[inline]
    pub const fn double_push_rank(self) -> u8 {
        match self {
            Color::White => 3,
            Color::Black => 4,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}
