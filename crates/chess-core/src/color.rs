//! Side to move.

use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Multiplier turning a white-positive score into this side's view.
    #[inline]
    pub const fn sign(self) -> i32 {
        1 - 2 * (self as i32)
    }

    /// Rank index of this side's first rank.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        7 * self as u8
    }

    /// Rank index counted from this side's first rank.
    #[inline]
    pub const fn relative_rank(self, rank: u8) -> u8 {
        rank ^ self.back_rank()
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
        assert_eq!(Color::Black.index(), 1);
        assert_eq!(Color::White.sign() + Color::Black.sign(), 0);
        assert_eq!(Color::White.to_string(), "white");
    }

    #[test]
    fn relative_ranks() {
        assert_eq!(Color::White.back_rank(), 0);
        assert_eq!(Color::Black.back_rank(), 7);
        for rank in 0..8 {
            assert_eq!(Color::White.relative_rank(rank), rank);
            assert_eq!(Color::Black.relative_rank(rank), 7 - rank);
        }
    }
}
