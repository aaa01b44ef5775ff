//! Chess piece representation.
//!
//! [`Piece`] is the colorless piece type; [`PieceKind`] is the colored kind
//! that owns one bitboard in a position, plus an [`PieceKind::Empty`]
//! sentinel used where a move carries no captured piece.

use crate::Color;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a piece type from its index (0-5).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            5 => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A colored piece kind, one per piece bitboard, plus the `Empty` sentinel.
///
/// Encoded as `color * 6 + piece`, so White kinds are 0-5, Black kinds
/// 6-11 and `Empty` is 12. The encoding fits the 4-bit piece fields of
/// [`Move`](crate::Move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    WhitePawn = 0,
    WhiteKnight = 1,
    WhiteBishop = 2,
    WhiteRook = 3,
    WhiteQueen = 4,
    WhiteKing = 5,
    BlackPawn = 6,
    BlackKnight = 7,
    BlackBishop = 8,
    BlackRook = 9,
    BlackQueen = 10,
    BlackKing = 11,
    Empty = 12,
}

impl PieceKind {
    /// Number of real (non-empty) kinds.
    pub const COUNT: usize = 12;

    /// The twelve real kinds in index order.
    pub const ALL: [PieceKind; 12] = [
        PieceKind::WhitePawn,
        PieceKind::WhiteKnight,
        PieceKind::WhiteBishop,
        PieceKind::WhiteRook,
        PieceKind::WhiteQueen,
        PieceKind::WhiteKing,
        PieceKind::BlackPawn,
        PieceKind::BlackKnight,
        PieceKind::BlackBishop,
        PieceKind::BlackRook,
        PieceKind::BlackQueen,
        PieceKind::BlackKing,
    ];

    /// Combines a piece type and a color.
    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        Self::ALL[color.index() * 6 + piece.index()]
    }

    /// Decodes a kind from its 4-bit index; anything above 11 is `Empty`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        if index < 12 {
            Self::ALL[index as usize]
        } else {
            PieceKind::Empty
        }
    }

    /// Returns the index (0-11, or 12 for `Empty`).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the `Empty` sentinel.
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, PieceKind::Empty)
    }

    /// Returns the colorless piece type, or `None` for `Empty`.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        match self {
            PieceKind::Empty => None,
            kind => Piece::from_index(kind as u8 % 6),
        }
    }

    /// Returns the color, or `None` for `Empty`.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self as u8 {
            0..=5 => Some(Color::White),
            6..=11 => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns true if this kind is of the given piece type (any color).
    #[inline]
    pub const fn is(self, piece: Piece) -> bool {
        !self.is_empty() && self as u8 % 6 == piece as u8
    }

    /// Returns the FEN character, or `'.'` for `Empty`.
    pub const fn to_fen_char(self) -> char {
        match (self.piece(), self.color()) {
            (Some(piece), Some(color)) => piece.to_fen_char(color),
            _ => '.',
        }
    }
}
