//! FEN (Forsyth-Edwards Notation) syntax.
//!
//! This layer checks only that a FEN string is well formed and splits it
//! into typed fields. Whether the described position is playable (king
//! counts, castling consistency, en passant plausibility) is decided by the
//! engine when it builds a position from these fields.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// The typed fields of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Every occupied square with its piece and color, in FEN order
    /// (rank 8 to rank 1, file a to file h).
    pub placement: Vec<(Square, Piece, Color)>,
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability in `K`, `Q`, `k`, `q` order.
    pub castling: [bool; 4],
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule).
    pub halfmove_clock: u32,
    /// Fullmove number.
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Castling characters, indexed like [`FenParser::castling`].
    const CASTLING_CHARS: [char; 4] = ['K', 'Q', 'k', 'q'];

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Vec<(Square, Piece, Color)>, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = Rank::ALL[7 - i];
            let mut file = 0u32;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    if let Some(f) = File::from_index(file as u8).filter(|_| file < 8) {
                        pieces.push((Square::new(f, rank), piece, color));
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank, file
                )));
            }
        }

        Ok(pieces)
    }

    fn parse_castling(castling: &str) -> Result<[bool; 4], FenError> {
        let mut rights = [false; 4];
        if castling == "-" {
            return Ok(rights);
        }

        for c in castling.chars() {
            let Some(slot) = Self::CASTLING_CHARS.iter().position(|&k| k == c) else {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            };
            if rights[slot] {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate character '{}'",
                    c
                )));
            }
            rights[slot] = true;
        }

        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        match Square::from_algebraic(ep) {
            Some(sq) if matches!(sq.rank(), Rank::R3 | Rank::R6) => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Renders the fields back to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut board = [None; 64];
        for &(sq, piece, color) in &self.placement {
            board[sq.index() as usize] = Some(piece.to_fen_char(color));
        }

        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                match board[rank * 8 + file] {
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.iter().any(|&held| held) {
            for (held, c) in self.castling.iter().zip(Self::CASTLING_CHARS) {
                if *held {
                    fen.push(c);
                }
            }
        } else {
            fen.push('-');
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));
        fen
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, [true; 4]);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.placement.len(), 32);
        assert!(fen
            .placement
            .contains(&(Square::E1, Piece::King, Color::White)));
        assert!(fen
            .placement
            .contains(&(Square::D8, Piece::Queen, Color::Black)));
    }

    #[test]
    fn parse_custom_position() {
        let fen =
            FenParser::parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.halfmove_clock, 2);
        assert_eq!(fen.fullmove_number, 3);
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = FenParser::parse(original).unwrap();
        assert_eq!(parsed.to_fen(), original);
        assert_eq!(FenParser::default().to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn invalid_fen() {
        assert!(matches!(
            FenParser::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));

        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        // Too few ranks
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // Invalid character
        assert!(matches!(
            FenParser::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // Nine squares on a rank
        assert!(matches!(
            FenParser::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // A zero skip is not a valid digit
        assert!(matches!(
            FenParser::parse("08/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn invalid_en_passant() {
        for ep in ["abc", "x3", "e4"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {} 0 1", ep);
            assert!(matches!(
                FenParser::parse(&fen),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
    }

    #[test]
    fn invalid_clocks() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn partial_castling_and_en_passant() {
        let fen = FenParser::parse("8/8/8/8/8/8/8/8 b Kq d6 0 1").unwrap();
        assert_eq!(fen.castling, [true, false, false, true]);
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));
        assert_eq!(fen.to_fen(), "8/8/8/8/8/8/8/8 b Kq d6 0 1");
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidPartCount(3);
        assert!(format!("{}", err).contains("3"));

        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));

        let err = FenError::InvalidFullmoveNumber("xyz".to_string());
        assert!(format!("{}", err).contains("xyz"));
    }
}
