//! Piece kinds.

use crate::Color;
use std::fmt;

/// A piece kind without color. Variants are ordered by material value, which
/// move ordering relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Lowercase letters in variant order.
const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Lowercase letter, as in FEN and promotion suffixes.
    #[inline]
    pub const fn to_char(self) -> char {
        LETTERS[self as usize]
    }

    /// FEN letter: uppercase for White.
    pub const fn to_fen_char(self, color: Color) -> char {
        match color {
            Color::White => self.to_char().to_ascii_uppercase(),
            Color::Black => self.to_char(),
        }
    }

    /// Decodes a FEN letter, reading the color from its case.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let lower = c.to_ascii_lowercase();
        let mut i = 0;
        while i < LETTERS.len() {
            if LETTERS[i] == lower {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                return Some((Self::ALL[i], color));
            }
            i += 1;
        }
        None
    }

    /// Weight in the 0-24 game phase counter. Pawns and kings count nothing.
    #[inline]
    pub const fn phase_weight(self) -> i32 {
        match self {
            Piece::Pawn | Piece::King => 0,
            Piece::Knight | Piece::Bishop => 1,
            Piece::Rook => 2,
            Piece::Queen => 4,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::King => "king",
        };
        f.write_str(name)
    }
}
