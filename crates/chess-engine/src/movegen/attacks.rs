//! Attack sets for every piece type.
//!
//! Leaper and pawn attacks are derived from whole-board shifts and stored in
//! compile-time tables. Slider attacks come from the magic tables.

use crate::Bitboard;
use chess_core::{Color, Piece, Square};

pub use super::magics::{bishop_attacks, queen_attacks, rook_attacks};

/// Tabulates a set-wise attack function for every single square.
macro_rules! per_square {
    ($attacks:expr) => {{
        let mut table = [Bitboard::EMPTY; 64];
        let mut sq = 0;
        while sq < 64 {
            table[sq] = $attacks(Bitboard(1u64 << sq));
            sq += 1;
        }
        table
    }};
}

const KNIGHT_ATTACKS: [Bitboard; 64] = per_square!(knight_attacks_of);

const KING_ATTACKS: [Bitboard; 64] = per_square!(king_attacks_of);

/// Pawn capture targets indexed by [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    per_square!(white_pawn_attacks_of),
    per_square!(black_pawn_attacks_of),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Attacks of `piece` on `sq` given the board occupancy.
#[inline]
pub fn attacks_of(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

/// Knight attacks of every set square at once.
pub const fn knight_attacks_of(knights: Bitboard) -> Bitboard {
    let b = knights.0;
    let l1 = (b >> 1) & !Bitboard::FILE_H.0;
    let l2 = (b >> 2) & !(Bitboard::FILE_G.0 | Bitboard::FILE_H.0);
    let r1 = (b << 1) & !Bitboard::FILE_A.0;
    let r2 = (b << 2) & !(Bitboard::FILE_A.0 | Bitboard::FILE_B.0);
    let h1 = l1 | r1;
    let h2 = l2 | r2;
    Bitboard((h1 << 16) | (h1 >> 16) | (h2 << 8) | (h2 >> 8))
}

/// King attacks of every set square at once.
pub const fn king_attacks_of(kings: Bitboard) -> Bitboard {
    let row = Bitboard(kings.east().0 | kings.west().0 | kings.0);
    Bitboard((row.0 | row.north().0 | row.south().0) & !kings.0)
}

/// Squares attacked by white pawns on every set square.
pub const fn white_pawn_attacks_of(pawns: Bitboard) -> Bitboard {
    Bitboard(pawns.north_east().0 | pawns.north_west().0)
}

/// Squares attacked by black pawns on every set square.
pub const fn black_pawn_attacks_of(pawns: Bitboard) -> Bitboard {
    Bitboard(pawns.south_east().0 | pawns.south_west().0)
}

/// Squares attacked by pawns of `color` on every set square.
#[inline]
pub const fn pawn_attacks_of(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => white_pawn_attacks_of(pawns),
        Color::Black => black_pawn_attacks_of(pawns),
    }
}
