//! Bitboard board representation and legal move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - board geometry: occluded fills, occupancy masks, `between` / `line`
//! - magic bitboard tables generated at first use from a fixed seed
//! - [`Position`] - full game state with incremental make/unmake, Zobrist
//!   keys and repetition bookkeeping
//! - legal move generation and perft
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//!
//! let mut position = Position::startpos();
//! let moves = position.generate_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let e4 = position.find_move("e2e4").unwrap();
//! position.make_move(e4);
//! assert_eq!(position.generate_moves().len(), 20);
//! position.unmake_move();
//! assert_eq!(position, Position::startpos());
//! ```

mod bitboard;
pub mod geometry;
pub mod movegen;
mod position;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIter, Subsets};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    attacks_of, bishop_attacks, generate, king_attacks, knight_attacks, pawn_attacks,
    queen_attacks, rook_attacks, GenType, MoveList,
};
pub use position::{castling_squares, CastlingRights, Position, PositionError};
pub use zobrist::{ZobristKeys, ZOBRIST};
