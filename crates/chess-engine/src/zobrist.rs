//! Zobrist keys.
//!
//! The key of a position is the XOR of:
//! - one value per piece on each square (12 pieces x 64 squares)
//! - a side-to-move value when Black is to move
//! - one value per castling-rights mask (16 combinations)
//! - one value per en passant file, only when a capture is possible
//!
//! Every term toggles independently, so [`Position`](crate::Position)
//! updates its key incrementally while making and unmaking moves.

use crate::position::CastlingRights;
use chess_core::{Color, Piece, Square};

/// The random terms hashed into a position key, built at compile time from
/// a fixed seed.
pub struct ZobristKeys {
    /// Indexed `[piece][color][square]`.
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    /// Indexed by castling-rights mask.
    castling: [u64; 16],
    /// Indexed by file.
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Draws every key from one xorshift64 stream.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        // Each single right gets its own key; a mask's key is the XOR of the
        // keys of the rights it holds, with the empty mask hashing to zero.
        let mut single = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            single[i] = state;
            i += 1;
        }
        let mut castling = [0u64; 16];
        let mut mask = 0;
        while mask < 16 {
            let mut bit = 0;
            while bit < 4 {
                if mask & (1 << bit) != 0 {
                    castling[mask] ^= single[bit];
                }
                bit += 1;
            }
            mask += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut file = 0;
        while file < 8 {
            state = next_random(state);
            en_passant[file] = state;
            file += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Present in the key exactly when Black is to move.
    #[inline]
    pub const fn side_key(&self) -> u64 {
        self.black_to_move
    }

    #[inline]
    pub const fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    /// Key for a capturable en passant target on `file` (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
