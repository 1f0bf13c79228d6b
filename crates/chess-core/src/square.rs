//! Board coordinates.
//!
//! Squares use little-endian rank-file mapping: a1 = 0, h1 = 7, a8 = 56,
//! h8 = 63. Files and ranks are thin wrappers over their 0-7 index.

use std::fmt;
use std::str::FromStr;

/// A file (column), a to h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Accepts either case.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        if lower >= 'a' && lower <= 'h' {
            Self::from_index(lower as u8 - b'a')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

/// A rank (row), 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= '1' && c <= '8' {
            Self::from_index(c as u8 - b'1')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One of the 64 board squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

macro_rules! named_squares {
    ($($name:ident = $index:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square($index);)*
        }
    };
}

named_squares! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl Square {
    pub const COUNT: usize = 64;

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() << 3 | file.index())
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Keeps the low six bits, for bit scans and packed move fields.
    #[inline]
    pub const fn from_index_masked(index: u8) -> Self {
        Square(index & 63)
    }

    /// Signed coordinates, so callers can step off the edge and get `None`.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Square((rank as u8) << 3 | file as u8))
        } else {
            None
        }
    }

    /// Parses coordinate notation such as `e4`.
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Some(Square((*r - b'1') << 3 | (*f - b'a'))),
            _ => None,
        }
    }

    /// a1 through h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file_index(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank_index(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[self.file_index() as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self.rank_index() as usize]
    }

    /// Number (0-14) of the a1-h8 oriented diagonal; the long diagonal is 7.
    #[inline]
    pub const fn diagonal(self) -> u8 {
        7 + self.rank_index() - self.file_index()
    }

    /// Number (0-14) of the h1-a8 oriented diagonal.
    #[inline]
    pub const fn anti_diagonal(self) -> u8 {
        self.rank_index() + self.file_index()
    }

    /// Same file, mirrored rank.
    #[inline]
    pub const fn flip(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Steps `ranks` towards the opponent of `color`.
    #[inline]
    pub const fn forward(self, color: crate::Color, ranks: i8) -> Option<Self> {
        let rank = match color {
            crate::Color::White => self.rank_index() as i8 + ranks,
            crate::Color::Black => self.rank_index() as i8 - ranks,
        };
        Square::from_coords(self.file_index() as i8, rank)
    }

    /// King-move distance.
    #[inline]
    pub const fn distance(self, other: Square) -> u8 {
        let files = self.file_index().abs_diff(other.file_index());
        let ranks = self.rank_index().abs_diff(other.rank_index());
        if files > ranks {
            files
        } else {
            ranks
        }
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    #[inline]
    pub const fn bitboard(self) -> u64 {
        1u64 << self.0
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| format!("not a square: '{}'", s))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn coordinates_agree() {
        for sq in Square::all() {
            assert_eq!(Square::new(sq.file(), sq.rank()), sq);
            assert_eq!(
                Square::from_coords(sq.file_index() as i8, sq.rank_index() as i8),
                Some(sq)
            );
            assert_eq!(sq.to_algebraic().parse::<Square>(), Ok(sq));
        }
        assert_eq!(Square::new(File::E, Rank::R4), Square::E4);
        assert_eq!(Square::E4.index(), 28);
    }

    #[test]
    fn parsing_rejects_junk() {
        for bad in ["", "i1", "a9", "a0", "e44", "E4", "4e"] {
            assert_eq!(Square::from_algebraic(bad), None, "{bad}");
        }
        assert!("z9".parse::<Square>().is_err());
        assert_eq!(File::from_char('E'), Some(File::E));
        assert_eq!(Rank::from_char('9'), None);
    }

    #[test]
    fn diagonal_numbering() {
        assert_eq!(Square::A1.diagonal(), Square::H8.diagonal());
        assert_eq!(Square::H1.diagonal(), 0);
        assert_eq!(Square::A8.diagonal(), 14);
        assert_eq!(Square::H1.anti_diagonal(), Square::A8.anti_diagonal());
        assert_eq!(Square::H8.anti_diagonal(), 14);
    }

    #[test]
    fn movement_helpers() {
        assert_eq!(Square::C2.flip(), Square::C7);
        assert_eq!(Square::E2.forward(Color::White, 2), Some(Square::E4));
        assert_eq!(Square::E7.forward(Color::Black, 2), Some(Square::E5));
        assert_eq!(Square::H8.forward(Color::White, 1), None);
        assert_eq!(Square::A1.distance(Square::H8), 7);
        assert_eq!(Square::B1.distance(Square::C3), 2);
        assert_eq!(Square::from_coords(-1, 3), None);
        assert_eq!(Square::from_index_masked(64 + 9), Square::B2);
    }

    #[test]
    fn single_bit_boards() {
        assert_eq!(Square::A1.bitboard(), 1);
        assert_eq!(Square::H8.bitboard(), 1 << 63);
        assert_eq!(Square::all().map(Square::bitboard).fold(0, |a, b| a | b), u64::MAX);
    }
}
