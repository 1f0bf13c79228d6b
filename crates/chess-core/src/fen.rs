//! FEN (Forsyth-Edwards Notation) records.

use crate::{Color, Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
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

/// Castling availability as written in the third FEN field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FenCastling {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl FenCastling {
    pub const ALL: FenCastling = FenCastling {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    fn flags(&self) -> [(bool, char); 4] {
        [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ]
    }
}

/// A syntactically valid FEN record, decoded into typed fields.
///
/// Whether the position makes sense (one king each, no pawns on the back
/// rank, and so on) is for the board representation to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Square contents, indexed a1 = 0 .. h8 = 63.
    pub board: [Option<(Piece, Color)>; 64],
    pub side_to_move: Color,
    pub castling: FenCastling,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN record. The two clock fields may be omitted together,
    /// in which case they read as `0 1`.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 4 {
            return Err(FenError::InvalidPartCount(fields.len()));
        }

        let board = parse_placement(fields[0])?;
        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };
        let castling = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3])?;

        let (halfmove_clock, fullmove_number) = match fields.get(4..6) {
            Some(&[halfmove, fullmove]) => {
                let halfmove_clock = halfmove
                    .parse::<u32>()
                    .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;
                let fullmove_number = fullmove
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove.to_string()))?;
                (halfmove_clock, fullmove_number)
            }
            _ => (0, 1),
        };

        Ok(Fen {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Occupied squares with their contents, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        self.board.iter().enumerate().filter_map(|(index, content)| {
            let (piece, color) = (*content)?;
            Some((Square::from_index_masked(index as u8), piece, color))
        })
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl Default for Fen {
    fn default() -> Self {
        let mut board = [None; 64];
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back.into_iter().enumerate() {
            board[file] = Some((piece, Color::White));
            board[8 + file] = Some((Piece::Pawn, Color::White));
            board[48 + file] = Some((Piece::Pawn, Color::Black));
            board[56 + file] = Some((piece, Color::Black));
        }
        Fen {
            board,
            side_to_move: Color::White,
            castling: FenCastling::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some((piece, color)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_fen_char(color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, " {} ", side)?;

        let rights: String = self
            .castling
            .flags()
            .iter()
            .filter(|(set, _)| *set)
            .map(|&(_, c)| c)
            .collect();
        f.write_str(if rights.is_empty() { "-" } else { rights.as_str() })?;

        match self.en_passant {
            Some(sq) => write!(f, " {}", sq.to_algebraic())?,
            None => f.write_str(" -")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

fn parse_placement(placement: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut board = [None; 64];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += run as usize;
            } else if let Some(content) = Piece::from_fen_char(c) {
                if file < 8 {
                    board[rank * 8 + file] = Some(content);
                }
                file += 1;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<FenCastling, FenError> {
    let mut castling = FenCastling::default();
    if field == "-" {
        return Ok(castling);
    }
    for c in field.chars() {
        let flag = match c {
            'K' => &mut castling.white_kingside,
            'Q' => &mut castling.white_queenside,
            'k' => &mut castling.black_kingside,
            'q' => &mut castling.black_queenside,
            other => {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    other
                )))
            }
        };
        if *flag {
            return Err(FenError::InvalidCastlingRights(format!(
                "duplicate right '{}'",
                c
            )));
        }
        *flag = true;
    }
    Ok(castling)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field)
        .filter(|sq| sq.rank_index() == 2 || sq.rank_index() == 5)
        .map(Some)
        .ok_or_else(|| FenError::InvalidEnPassantSquare(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_matches_default() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen, Fen::default());
        assert_eq!(fen.pieces().count(), 32);
        assert_eq!(
            fen.board[Square::from_algebraic("e1").unwrap().index() as usize],
            Some((Piece::King, Color::White))
        );
    }

    #[test]
    fn typed_fields() {
        let fen: Fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b Kq e3 2 3"
            .parse()
            .unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert!(fen.castling.white_kingside && fen.castling.black_queenside);
        assert!(!fen.castling.white_queenside && !fen.castling.black_kingside);
        assert_eq!(fen.en_passant, Square::from_algebraic("e3"));
        assert_eq!((fen.halfmove_clock, fen.fullmove_number), (2, 3));
        assert_eq!(
            fen.board[Square::from_algebraic("c6").unwrap().index() as usize],
            Some((Piece::Knight, Color::Black))
        );
    }

    #[test]
    fn display_writes_canonical_record() {
        let text = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(Fen::parse(text).unwrap().to_string(), text);
        assert_eq!(Fen::default().to_string(), Fen::STARTPOS);
        let bare = Fen::parse("8/8/8/4k3/8/8/8/4K3 w - -").unwrap();
        assert_eq!(bare.to_string(), "8/8/8/4k3/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn four_field_fen_defaults_clocks() {
        let fen = Fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
            .unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.castling, FenCastling::ALL);
    }

    #[test]
    fn field_count() {
        assert_eq!(Fen::parse("invalid"), Err(FenError::InvalidPartCount(1)));
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::InvalidPartCount(5))
        );
    }

    #[test]
    fn malformed_fields() {
        let cases = [
            "8/8/8/8/8/8/8 w - - 0 1",
            "08/8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "ppppppppp/8/8/8/8/8/8/8 w - - 0 1",
        ];
        for case in cases {
            assert!(
                matches!(Fen::parse(case), Err(FenError::InvalidPiecePlacement(_))),
                "{case}"
            );
        }
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }
}
