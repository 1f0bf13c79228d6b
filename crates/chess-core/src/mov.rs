//! Move representation.

use crate::{Piece, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The kind of a move, covering every special case make-move has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Normal move or capture.
    Normal = 0,
    /// Pawn double push from starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    /// Pawn promotion to knight.
    PromoteKnight = 5,
    /// Pawn promotion to bishop.
    PromoteBishop = 6,
    /// Pawn promotion to rook.
    PromoteRook = 7,
    /// Pawn promotion to queen.
    PromoteQueen = 8,
}

impl MoveKind {
    /// Decodes a kind from its 4-bit tag.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(MoveKind::Normal),
            1 => Some(MoveKind::DoublePush),
            2 => Some(MoveKind::CastleKingside),
            3 => Some(MoveKind::CastleQueenside),
            4 => Some(MoveKind::EnPassant),
            5 => Some(MoveKind::PromoteKnight),
            6 => Some(MoveKind::PromoteBishop),
            7 => Some(MoveKind::PromoteRook),
            8 => Some(MoveKind::PromoteQueen),
            _ => None,
        }
    }

    /// Returns the promotion kind for a target piece.
    #[inline]
    pub const fn promotion(piece: Piece) -> Option<Self> {
        match piece {
            Piece::Knight => Some(MoveKind::PromoteKnight),
            Piece::Bishop => Some(MoveKind::PromoteBishop),
            Piece::Rook => Some(MoveKind::PromoteRook),
            Piece::Queen => Some(MoveKind::PromoteQueen),
            _ => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveKind::PromoteKnight => Some(Piece::Knight),
            MoveKind::PromoteBishop => Some(Piece::Bishop),
            MoveKind::PromoteRook => Some(Piece::Rook),
            MoveKind::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(
            self,
            MoveKind::PromoteKnight
                | MoveKind::PromoteBishop
                | MoveKind::PromoteRook
                | MoveKind::PromoteQueen
        )
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const PIECE_SHIFT: u32 = 16;
const CAPTURED_SHIFT: u32 = 19;
const NO_CAPTURE: u32 = 7;

/// A chess move.
///
/// Packed into 22 bits: 6 bits from, 6 bits to, 4 bits kind, 3 bits moved
/// piece, 3 bits captured piece (7 = none). The packed form is what the
/// transposition table stores. The `score` field is scratch space for move
/// ordering and takes no part in equality or hashing.
#[derive(Clone, Copy)]
pub struct Move {
    bits: u32,
    score: i32,
}

impl Move {
    /// A null move (used as placeholder, not a legal move). Encodes as 0.
    pub const NULL: Move = Move { bits: 0, score: 0 };

    /// Creates a new move.
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        kind: MoveKind,
    ) -> Self {
        let captured = match captured {
            Some(p) => p as u32,
            None => NO_CAPTURE,
        };
        let bits = ((from.index() as u32) << FROM_SHIFT)
            | ((to.index() as u32) << TO_SHIFT)
            | ((kind as u32) << KIND_SHIFT)
            | ((piece as u32) << PIECE_SHIFT)
            | (captured << CAPTURED_SHIFT);
        Move { bits, score: 0 }
    }

    /// Creates a normal move or capture.
    #[inline]
    pub const fn normal(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self::new(from, to, piece, captured, MoveKind::Normal)
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_masked((self.bits >> FROM_SHIFT) as u8)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_masked((self.bits >> TO_SHIFT) as u8)
    }

    /// Returns the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        match MoveKind::from_bits(((self.bits >> KIND_SHIFT) & 0xF) as u8) {
            Some(kind) => kind,
            None => MoveKind::Normal,
        }
    }

    /// Returns the piece being moved.
    #[inline]
    pub const fn piece(self) -> Piece {
        match Piece::from_index(((self.bits >> PIECE_SHIFT) & 0x7) as u8) {
            Some(piece) => piece,
            None => Piece::Pawn,
        }
    }

    /// Returns the captured piece, if any. En passant captures report a pawn.
    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        Piece::from_index(((self.bits >> CAPTURED_SHIFT) & 0x7) as u8)
    }

    /// Returns true if this move captures a piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        (self.bits >> CAPTURED_SHIFT) & 0x7 != NO_CAPTURE
    }

    /// Returns true if this move promotes a pawn.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    /// Returns true for moves that neither capture nor promote.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Returns true for the placeholder null move.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.bits == 0
    }

    /// Returns the transient ordering score.
    #[inline]
    pub const fn score(self) -> i32 {
        self.score
    }

    /// Sets the transient ordering score.
    #[inline]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// Returns a copy with the given ordering score.
    #[inline]
    pub const fn with_score(self, score: i32) -> Self {
        Move {
            bits: self.bits,
            score,
        }
    }

    /// Returns the packed encoding (without the ordering score).
    #[inline]
    pub const fn encode(self) -> u32 {
        self.bits
    }

    /// Decodes a packed move, rejecting bit patterns no generator produces.
    pub const fn decode(bits: u32) -> Option<Self> {
        if bits >> (CAPTURED_SHIFT + 3) != 0 {
            return None;
        }
        if MoveKind::from_bits(((bits >> KIND_SHIFT) & 0xF) as u8).is_none() {
            return None;
        }
        if (bits >> PIECE_SHIFT) & 0x7 > 5 {
            return None;
        }
        let captured = (bits >> CAPTURED_SHIFT) & 0x7;
        if captured != NO_CAPTURE && captured > 4 {
            return None;
        }
        if (bits >> FROM_SHIFT) & 0x3F == (bits >> TO_SHIFT) & 0x3F {
            return None;
        }
        Some(Move { bits, score: 0 })
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        match self.kind().promotion_piece() {
            Some(piece) => format!("{}{}{}", self.from(), self.to(), piece.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// A move token in coordinate notation, before it is matched against the
/// legal moves of a position (which supply piece, capture and kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// Parses a move from coordinate notation ("e2e4", "e7e8q").
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = if s.len() == 5 {
            match s.as_bytes()[4].to_ascii_lowercase() {
                b'n' => Some(Piece::Knight),
                b'b' => Some(Piece::Bishop),
                b'r' => Some(Piece::Rook),
                b'q' => Some(Piece::Queen),
                _ => return None,
            }
        } else {
            None
        };
        Some(UciMove {
            from,
            to,
            promotion,
        })
    }

    /// Returns true if `m` is the move this token denotes.
    pub fn matches(&self, m: Move) -> bool {
        m.from() == self.from && m.to() == self.to && m.kind().promotion_piece() == self.promotion
    }
}
