//! Core types for chess.
//!
//! This crate provides the fundamental value types used across the engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`], with a compact integer encoding
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenCastling, FenError};
pub use mov::{Move, MoveKind, UciMove};
pub use piece::Piece;
pub use square::{File, Rank, Square};
