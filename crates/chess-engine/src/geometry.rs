//! Board geometry: occluded sliding fills, occupancy masks and the
//! `between` / `line` relations between squares.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// The eight ray directions of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Signed index delta of one step.
    const fn delta(self) -> i32 {
        match self {
            Direction::North => 8,
            Direction::South => -8,
            Direction::East => 1,
            Direction::West => -1,
            Direction::NorthEast => 9,
            Direction::NorthWest => 7,
            Direction::SouthEast => -7,
            Direction::SouthWest => -9,
        }
    }

    /// Squares a step in this direction may land on without wrapping.
    const fn landing_mask(self) -> u64 {
        match self {
            Direction::North | Direction::South => !0,
            Direction::East | Direction::NorthEast | Direction::SouthEast => {
                !Bitboard::FILE_A.0
            }
            Direction::West | Direction::NorthWest | Direction::SouthWest => {
                !Bitboard::FILE_H.0
            }
        }
    }

    #[inline]
    const fn shift(self, bits: u64, steps: i32) -> u64 {
        let amount = self.delta() * steps;
        if amount > 0 {
            bits << amount
        } else {
            bits >> -amount
        }
    }
}

/// Kogge-Stone occluded fill: extends every generator square along `dir`
/// through empty squares. The result includes the generators but not the
/// first blocker.
pub const fn occluded_fill(generators: Bitboard, empty: Bitboard, dir: Direction) -> Bitboard {
    let mut gen = generators.0;
    let mut pro = empty.0 & dir.landing_mask();
    gen |= pro & dir.shift(gen, 1);
    pro &= dir.shift(pro, 1);
    gen |= pro & dir.shift(gen, 2);
    pro &= dir.shift(pro, 2);
    gen |= pro & dir.shift(gen, 4);
    Bitboard(gen)
}

/// Squares attacked along `dir` by sliders on `generators`, blockers included.
pub const fn ray_attacks(generators: Bitboard, empty: Bitboard, dir: Direction) -> Bitboard {
    let fill = occluded_fill(generators, empty, dir);
    Bitboard(dir.shift(fill.0, 1) & dir.landing_mask())
}

/// Rook attacks computed by fill; used to build and verify the magic tables.
pub fn rook_fill(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_fill(sq, occupied, &Direction::ORTHOGONAL)
}

/// Bishop attacks computed by fill; used to build and verify the magic tables.
pub fn bishop_fill(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_fill(sq, occupied, &Direction::DIAGONAL)
}

fn slider_fill(sq: Square, occupied: Bitboard, directions: &[Direction]) -> Bitboard {
    let origin = Bitboard::from_square(sq);
    let empty = !occupied;
    directions
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(origin, empty, dir))
}

/// Relevant blocker squares for a rook on `sq`: its rays on the empty board
/// without the edge square that ends each ray.
pub fn rook_mask(sq: Square) -> Bitboard {
    let rays = rook_fill(sq, Bitboard::EMPTY);
    let vertical = rays & Bitboard::file_of(sq) & !(Bitboard::RANK_1 | Bitboard::RANK_8);
    let horizontal = rays & Bitboard::rank_of(sq) & !(Bitboard::FILE_A | Bitboard::FILE_H);
    vertical | horizontal
}

/// Relevant blocker squares for a bishop on `sq`.
pub fn bishop_mask(sq: Square) -> Bitboard {
    bishop_fill(sq, Bitboard::EMPTY) & !Bitboard::EDGES
}

struct LineTables {
    between: Vec<Bitboard>,
    line: Vec<Bitboard>,
}

static LINE_TABLES: OnceLock<LineTables> = OnceLock::new();

fn line_tables() -> &'static LineTables {
    LINE_TABLES.get_or_init(|| {
        let mut between = vec![Bitboard::EMPTY; 64 * 64];
        let mut line = vec![Bitboard::EMPTY; 64 * 64];
        for a in Square::all() {
            for b in Square::all() {
                if a == b {
                    continue;
                }
                let idx = a.index() as usize * 64 + b.index() as usize;
                let (a_bb, b_bb) = (Bitboard::from_square(a), Bitboard::from_square(b));
                if rook_fill(a, Bitboard::EMPTY).contains(b) {
                    between[idx] = rook_fill(a, b_bb) & rook_fill(b, a_bb);
                    line[idx] = if a.rank() == b.rank() {
                        Bitboard::rank_of(a)
                    } else {
                        Bitboard::file_of(a)
                    };
                } else if bishop_fill(a, Bitboard::EMPTY).contains(b) {
                    between[idx] = bishop_fill(a, b_bb) & bishop_fill(b, a_bb);
                    line[idx] = if a.diagonal() == b.diagonal() {
                        Bitboard::DIAGONALS[a.diagonal() as usize]
                    } else {
                        Bitboard::ANTI_DIAGONALS[a.anti_diagonal() as usize]
                    };
                }
            }
        }
        LineTables { between, line }
    })
}

/// Squares strictly between `a` and `b` when they share a rank, file or
/// diagonal; empty otherwise.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    line_tables().between[a.index() as usize * 64 + b.index() as usize]
}

/// The full rank, file or diagonal through `a` and `b`; empty if the squares
/// are not aligned.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    line_tables().line[a.index() as usize * 64 + b.index() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn fill_stops_at_blocker() {
        let origin = Bitboard::from_square(sq("a1"));
        let occupied = Bitboard::from_square(sq("a4"));
        let north = ray_attacks(origin, !occupied, Direction::North);
        assert_eq!(north.count(), 3);
        assert!(north.contains(sq("a4")));
        assert!(!north.contains(sq("a5")));
    }

    #[test]
    fn fill_never_wraps() {
        let origin = Bitboard::from_square(sq("h4"));
        assert!(ray_attacks(origin, Bitboard::FULL, Direction::East).is_empty());
        assert!(ray_attacks(origin, Bitboard::FULL, Direction::NorthEast).is_empty());
        let west = ray_attacks(Bitboard::from_square(sq("a4")), Bitboard::FULL, Direction::West);
        assert!(west.is_empty());
    }

    #[test]
    fn empty_board_fills() {
        let d4 = Square::new(File::D, Rank::R4);
        assert_eq!(rook_fill(d4, Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_fill(d4, Bitboard::EMPTY).count(), 13);
        assert_eq!(bishop_fill(Square::A1, Bitboard::EMPTY).count(), 7);
    }

    #[test]
    fn occupancy_masks_have_expected_sizes() {
        assert_eq!(rook_mask(Square::A1).count(), 12);
        assert_eq!(rook_mask(Square::new(File::D, Rank::R4)).count(), 10);
        assert_eq!(bishop_mask(Square::A1).count(), 6);
        assert_eq!(bishop_mask(Square::new(File::D, Rank::R4)).count(), 9);
        assert!(!rook_mask(Square::A1).contains(Square::H1));
        assert!(!rook_mask(Square::A1).contains(Square::A8));
        assert!(rook_mask(Square::A1).contains(Square::A7));
    }

    #[test]
    fn between_and_line() {
        assert_eq!(between(sq("a1"), sq("a4")).count(), 2);
        assert!(between(sq("a1"), sq("a4")).contains(sq("a3")));
        assert_eq!(between(sq("c1"), sq("h6")).count(), 4);
        assert!(between(sq("a1"), sq("b3")).is_empty());
        assert!(between(sq("e4"), sq("e5")).is_empty());

        assert_eq!(line(sq("a1"), sq("c3")), Bitboard::DIAGONALS[7]);
        assert_eq!(line(sq("b1"), sq("b7")), Bitboard::FILES[1]);
        assert_eq!(line(sq("a8"), sq("h1")), Bitboard::ANTI_DIAGONALS[7]);
        assert!(line(sq("a1"), sq("b3")).is_empty());
    }
}
