//! Sets of squares packed into a `u64`.
//!
//! Bit `n` stands for the square with index `n`, so a1 is the least
//! significant bit and h8 the most significant.

use chess_core::{Color, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(u64::MAX);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_B: Bitboard = Bitboard(Self::FILE_A.0 << 1);
    pub const FILE_G: Bitboard = Bitboard(Self::FILE_A.0 << 6);
    pub const FILE_H: Bitboard = Bitboard(Self::FILE_A.0 << 7);

    pub const RANK_1: Bitboard = Bitboard(0xFF);
    pub const RANK_2: Bitboard = Bitboard(Self::RANK_1.0 << 8);
    pub const RANK_8: Bitboard = Bitboard(Self::RANK_1.0 << 56);

    /// Squares on the board's outer ring.
    pub const EDGES: Bitboard =
        Bitboard(Self::FILE_A.0 | Self::FILE_H.0 | Self::RANK_1.0 | Self::RANK_8.0);

    /// b1, d1, ..., a2: the squares sharing h1's shade.
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

    /// Indexed by file (a = 0).
    pub const FILES: [Bitboard; 8] = line_masks(Line::File);

    /// Indexed by rank (1 = 0).
    pub const RANKS: [Bitboard; 8] = line_masks(Line::Rank);

    /// Indexed by [`Square::diagonal`].
    pub const DIAGONALS: [Bitboard; 15] = line_masks(Line::Diagonal);

    /// Indexed by [`Square::anti_diagonal`].
    pub const ANTI_DIAGONALS: [Bitboard; 15] = line_masks(Line::AntiDiagonal);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bitboard())
    }

    #[inline]
    pub const fn file_of(sq: Square) -> Self {
        Self::FILES[sq.file_index() as usize]
    }

    #[inline]
    pub const fn rank_of(sq: Square) -> Self {
        Self::RANKS[sq.rank_index() as usize]
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        !self.is_empty()
    }

    /// True when at least two squares are set.
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bitboard() != 0
    }

    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= sq.bitboard();
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Self {
        Bitboard(self.0 | sq.bitboard())
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Self {
        Bitboard(self.0 & !sq.bitboard())
    }

    /// Lowest-indexed member.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Some(Square::from_index_masked(bits.trailing_zeros() as u8)),
        }
    }

    /// Removes and returns the lowest-indexed member.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    // One-step shifts. Horizontal components mask off the file a bit would
    // wrap into.

    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard(self.0 << 1 & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard(self.0 >> 1 & !Self::FILE_H.0)
    }

    #[inline]
    pub const fn north_east(self) -> Bitboard {
        self.north().east()
    }

    #[inline]
    pub const fn north_west(self) -> Bitboard {
        self.north().west()
    }

    #[inline]
    pub const fn south_east(self) -> Bitboard {
        self.south().east()
    }

    #[inline]
    pub const fn south_west(self) -> Bitboard {
        self.south().west()
    }

    /// One rank towards the opponent of `color`.
    #[inline]
    pub const fn forward(self, color: Color) -> Bitboard {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// Every square strictly ahead of a member on its file, seen from
    /// `color`.
    #[inline]
    pub const fn front_span(self, color: Color) -> Bitboard {
        let mut bits = self.forward(color).0;
        let mut shift = 8;
        while shift <= 32 {
            bits |= match color {
                Color::White => bits << shift,
                Color::Black => bits >> shift,
            };
            shift *= 2;
        }
        Bitboard(bits)
    }

    /// Every subset of this set, the empty set first, by carry-rippler
    /// enumeration.
    #[inline]
    pub fn subsets(self) -> Subsets {
        Subsets {
            mask: self.0,
            next: Some(0),
        }
    }
}

#[derive(Clone, Copy)]
enum Line {
    File,
    Rank,
    Diagonal,
    AntiDiagonal,
}

/// Groups the 64 squares into the lines of one orientation.
const fn line_masks<const N: usize>(line: Line) -> [Bitboard; N] {
    let mut masks = [Bitboard::EMPTY; N];
    let mut index = 0;
    while index < 64 {
        let sq = Square::from_index_masked(index);
        let number = match line {
            Line::File => sq.file_index(),
            Line::Rank => sq.rank_index(),
            Line::Diagonal => sq.diagonal(),
            Line::AntiDiagonal => sq.anti_diagonal(),
        };
        masks[number as usize].0 |= sq.bitboard();
        index += 1;
    }
    masks
}

pub struct Subsets {
    mask: u64,
    next: Option<u64>,
}

impl Iterator for Subsets {
    type Item = Bitboard;

    fn next(&mut self) -> Option<Bitboard> {
        let current = self.next?;
        let following = current.wrapping_sub(self.mask) & self.mask;
        self.next = (following != 0).then_some(following);
        Some(Bitboard(current))
    }
}

macro_rules! bit_ops {
    ($($op:ident $method:ident $assign:ident $assign_method:ident => $sym:tt;)*) => {
        $(
            impl $op for Bitboard {
                type Output = Bitboard;
                #[inline]
                fn $method(self, rhs: Bitboard) -> Bitboard {
                    Bitboard(self.0 $sym rhs.0)
                }
            }

            impl $assign for Bitboard {
                #[inline]
                fn $assign_method(&mut self, rhs: Bitboard) {
                    *self = *self $sym rhs;
                }
            }
        )*
    };
}

bit_ops! {
    BitAnd bitand BitAndAssign bitand_assign => &;
    BitOr bitor BitOrAssign bitor_assign => |;
    BitXor bitxor BitXorAssign bitxor_assign => ^;
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Prints a diagram with rank 8 on top.
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8u8).rev() {
            let row: String = (0..8u8)
                .map(|file| {
                    if self.contains(Square::from_index_masked(rank * 8 + file)) {
                        " X"
                    } else {
                        " ."
                    }
                })
                .collect();
            writeln!(f, "{}{}", rank + 1, row)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Members in ascending index order.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        let bb = Bitboard::EMPTY.with(Square::A1).with(Square::E4);
        assert!(bb.contains(Square::E4));
        assert!(!bb.contains(Square::B1));
        assert_eq!(bb.without(Square::A1), Bitboard::from_square(Square::E4));
        assert_eq!(bb.count(), 2);
        assert!(bb.more_than_one());
        assert!(!Bitboard::from_square(Square::H8).more_than_one());
    }

    #[test]
    fn iteration_is_ascending() {
        let squares: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares.first(), Some(&Square::A1));
        assert_eq!(squares.last(), Some(&Square::A8));
        assert_eq!(squares.iter().copied().collect::<Bitboard>(), Bitboard::FILE_A);

        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb(), Some(Square::B1));
        assert_eq!(bb.pop_lsb(), Some(Square::D1));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn line_masks_partition_the_board() {
        for lines in [&Bitboard::FILES[..], &Bitboard::RANKS[..], &Bitboard::DIAGONALS[..]] {
            let union = lines.iter().fold(Bitboard::EMPTY, |acc, &l| acc | l);
            let total: u32 = lines.iter().map(|l| l.count()).sum();
            assert_eq!(union, Bitboard::FULL);
            assert_eq!(total, 64);
        }
        assert_eq!(Bitboard::FILES[7], Bitboard::FILE_H);
        assert_eq!(Bitboard::RANKS[1], Bitboard::RANK_2);
        assert_eq!(Bitboard::DIAGONALS[0], Bitboard::from_square(Square::H1));
        assert!(Bitboard::ANTI_DIAGONALS[7].contains(Square::A8));
        assert_eq!(Bitboard::EDGES.count(), 28);
        assert_eq!(Bitboard::LIGHT_SQUARES.count(), 32);
        assert!(!Bitboard::LIGHT_SQUARES.contains(Square::A1));
    }

    #[test]
    fn shifts_stay_on_the_board() {
        let a1 = Bitboard::from_square(Square::A1);
        assert_eq!(a1.north_east(), Bitboard::from_square(Square::B2));
        assert!(a1.west().is_empty());
        assert!(Bitboard::FILE_H.east().is_empty());
        assert!(Bitboard::FILE_A.south_west().is_empty());
        assert!(Bitboard::RANK_8.north().is_empty());
        assert_eq!(a1.forward(Color::White), Bitboard::from_square(Square::A2));
    }

    #[test]
    fn front_spans() {
        let e4 = Bitboard::from_square(Square::E4);
        assert_eq!(e4.front_span(Color::White).count(), 4);
        assert_eq!(e4.front_span(Color::Black).count(), 3);
        assert!(e4.front_span(Color::White).contains(Square::E8));
        assert!(!e4.front_span(Color::White).contains(Square::E4));
    }

    #[test]
    fn subsets_cover_the_power_set() {
        let mask = Bitboard::new(0b1011_0000);
        let subsets: Vec<Bitboard> = mask.subsets().collect();
        assert_eq!(subsets.len(), 8);
        assert_eq!(subsets[0], Bitboard::EMPTY);
        assert!(subsets.contains(&mask));
        assert!(subsets.iter().all(|s| (*s & !mask).is_empty()));
        assert_eq!(Bitboard::EMPTY.subsets().count(), 1);
    }
}
