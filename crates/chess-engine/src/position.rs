//! Chess position representation with incremental make/unmake.

use chess_core::{Color, Fen, FenCastling, FenError, Move, MoveKind, Piece, Square, UciMove};
use thiserror::Error;

use crate::movegen::{
    attacks_of, bishop_attacks, generate, king_attacks, knight_attacks, pawn_attacks,
    rook_attacks, GenType, MoveList,
};
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Errors for FEN strings that parse but do not describe a playable position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} must have exactly one king, found {1}")]
    KingCount(Color, u32),

    #[error("{0} is not to move but is in check")]
    OpponentInCheck(Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(String),
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(0b0001);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(0b0010);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(0b0100);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(0b1000);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates castling rights from raw flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// The kingside right of `color`.
    #[inline]
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    /// The queenside right of `color`.
    #[inline]
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if every right in `other` is held.
    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.contains(Self::kingside(color))
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.contains(Self::queenside(color))
    }

    /// Returns these rights with `other` removed.
    #[inline]
    pub const fn without(self, other: CastlingRights) -> Self {
        CastlingRights(self.0 & !other.0)
    }

    /// Rights remaining after a piece moves from or to the given squares.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> Self {
        CastlingRights(
            self.0 & CASTLING_KEEP[from.index() as usize] & CASTLING_KEEP[to.index() as usize],
        )
    }

    /// Returns the raw flags (0-15).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Rights kept when a move touches each square.
const CASTLING_KEEP: [u8; 64] = {
    let mut keep = [0b1111u8; 64];
    keep[0] = !CastlingRights::WHITE_QUEENSIDE.0 & 0b1111; // a1
    keep[4] = !(CastlingRights::WHITE_KINGSIDE.0 | CastlingRights::WHITE_QUEENSIDE.0) & 0b1111; // e1
    keep[7] = !CastlingRights::WHITE_KINGSIDE.0 & 0b1111; // h1
    keep[56] = !CastlingRights::BLACK_QUEENSIDE.0 & 0b1111; // a8
    keep[60] = !(CastlingRights::BLACK_KINGSIDE.0 | CastlingRights::BLACK_QUEENSIDE.0) & 0b1111; // e8
    keep[63] = !CastlingRights::BLACK_KINGSIDE.0 & 0b1111; // h8
    keep
};

/// King and rook origin and destination squares for a castling move.
#[inline]
pub fn castling_squares(color: Color, kind: MoveKind) -> (Square, Square, Square, Square) {
    let base = color.back_rank() * 8;
    let sq = |file: u8| Square::from_index_masked(base + file);
    match kind {
        MoveKind::CastleQueenside => (sq(4), sq(2), sq(0), sq(3)),
        _ => (sq(4), sq(6), sq(7), sq(5)),
    }
}

/// State needed to take back one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Undo {
    mv: Move,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    key: u64,
}

/// Complete chess position state, including the history needed to unmake
/// moves and detect repetitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece type, indexed by Piece enum.
    pieces: [Bitboard; 6],
    /// Bitboards for each color's pieces.
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    /// En passant target, set only when a capture onto it is possible.
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    key: u64,
    history: Vec<Undo>,
}

impl Position {
    fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            key: 0,
            history: Vec::new(),
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string (4 or 6 fields).
    ///
    /// Castling rights whose king or rook is not on its original square are
    /// dropped, as is an en passant target no pawn can capture onto.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = Fen::parse(fen)?;
        let mut position = Position::empty();
        for (sq, piece, color) in parsed.pieces() {
            position.xor_piece(piece, color, sq);
        }
        position.side_to_move = parsed.side_to_move;

        let mut castling = CastlingRights::NONE;
        for (set, right) in [
            (parsed.castling.white_kingside, CastlingRights::WHITE_KINGSIDE),
            (parsed.castling.white_queenside, CastlingRights::WHITE_QUEENSIDE),
            (parsed.castling.black_kingside, CastlingRights::BLACK_KINGSIDE),
            (parsed.castling.black_queenside, CastlingRights::BLACK_QUEENSIDE),
        ] {
            if set {
                castling = CastlingRights(castling.0 | right.0);
            }
        }
        position.castling = position.sanitize_castling(castling);

        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;
        position.validate()?;

        position.en_passant = parsed
            .en_passant
            .filter(|&ep| position.en_passant_capturable(ep));
        position.key = position.compute_key();
        Ok(position)
    }

    fn sanitize_castling(&self, rights: CastlingRights) -> CastlingRights {
        let mut kept = rights;
        for color in Color::ALL {
            for kind in [MoveKind::CastleKingside, MoveKind::CastleQueenside] {
                let (king, _, rook, _) = castling_squares(color, kind);
                let in_place = self.pieces_of(Piece::King, color).contains(king)
                    && self.pieces_of(Piece::Rook, color).contains(rook);
                if !in_place {
                    let right = match kind {
                        MoveKind::CastleKingside => CastlingRights::kingside(color),
                        _ => CastlingRights::queenside(color),
                    };
                    kept = kept.without(right);
                }
            }
        }
        kept
    }

    fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let kings = self.pieces_of(Piece::King, color).count();
            if kings != 1 {
                return Err(PositionError::KingCount(color, kings));
            }
        }
        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        if let Some(sq) = (self.pieces[Piece::Pawn.index()] & back_ranks).lsb() {
            return Err(PositionError::PawnOnBackRank(sq.to_algebraic()));
        }
        let waiting = self.side_to_move.opposite();
        if self.is_square_attacked(self.king_square(waiting), self.side_to_move) {
            return Err(PositionError::OpponentInCheck(waiting));
        }
        Ok(())
    }

    /// True if a pawn of the side to move could capture onto `ep`, with the
    /// double-pushed pawn in place behind it.
    fn en_passant_capturable(&self, ep: Square) -> bool {
        let us = self.side_to_move;
        let them = us.opposite();
        if ep.rank_index() != us.relative_rank(5) {
            return false;
        }
        let pushed = ep.forward(them, 1);
        let origin = ep.forward(us, 1);
        match (pushed, origin) {
            (Some(pushed), Some(origin)) => {
                self.pieces_of(Piece::Pawn, them).contains(pushed)
                    && !self.occupied().contains(ep)
                    && !self.occupied().contains(origin)
                    && (pawn_attacks(ep, them) & self.pieces_of(Piece::Pawn, us)).is_not_empty()
            }
            _ => false,
        }
    }

    /// Computes the Zobrist key from scratch.
    pub fn compute_key(&self) -> u64 {
        let mut key = 0;
        for color in Color::ALL {
            for piece in Piece::ALL {
                for sq in self.pieces_of(piece, color) {
                    key ^= ZOBRIST.piece_key(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            key ^= ZOBRIST.side_key();
        }
        key ^= ZOBRIST.castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            key ^= ZOBRIST.en_passant_key(ep.file_index());
        }
        key
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    /// The position as a typed FEN record.
    pub fn fen(&self) -> Fen {
        let mut board = [None; 64];
        for sq in Square::all() {
            board[sq.index() as usize] = self.piece_at(sq);
        }
        Fen {
            board,
            side_to_move: self.side_to_move,
            castling: FenCastling {
                white_kingside: self.castling.contains(CastlingRights::WHITE_KINGSIDE),
                white_queenside: self.castling.contains(CastlingRights::WHITE_QUEENSIDE),
                black_kingside: self.castling.contains(CastlingRights::BLACK_KINGSIDE),
                black_queenside: self.castling.contains(CastlingRights::BLACK_QUEENSIDE),
            },
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        self.piece_type_at(sq).map(|piece| (piece, color))
    }

    /// Returns the piece type at the given square, if any.
    #[inline]
    pub fn piece_type_at(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The Zobrist key of the position.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Number of moves (including null moves) that can be unmade.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The most recently made move; `Move::NULL` after a null move.
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|undo| undo.mv)
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns all pieces of one color.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns all pieces of one type, both colors.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns the square of the king of `color`.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(Piece::King, color).lsb().unwrap_or(Square::A1)
    }

    /// True if `color` has any knight, bishop, rook or queen.
    #[inline]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let kings_and_pawns = self.pieces(Piece::King) | self.pieces(Piece::Pawn);
        (self.occupancy(color) & !kings_and_pawns).is_not_empty()
    }

    /// All pieces of both colors attacking `sq`, given the occupancy `occupied`.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(Piece::Bishop) | self.pieces(Piece::Queen);
        let orthogonal = self.pieces(Piece::Rook) | self.pieces(Piece::Queen);
        (pawn_attacks(sq, Color::White) & self.pieces_of(Piece::Pawn, Color::Black))
            | (pawn_attacks(sq, Color::Black) & self.pieces_of(Piece::Pawn, Color::White))
            | (knight_attacks(sq) & self.pieces(Piece::Knight))
            | (king_attacks(sq) & self.pieces(Piece::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & orthogonal)
    }

    /// True if any piece of `by` attacks `sq`.
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        (self.attackers_to(sq, self.occupied()) & self.occupancy(by)).is_not_empty()
    }

    /// Enemy pieces giving check to the side to move.
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_to(self.king_square(us), self.occupied()) & self.occupancy(us.opposite())
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_not_empty()
    }

    /// True if `m`, made from this position, checks the opponent.
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let king = self.king_square(us.opposite());
        let from = Bitboard::from_square(m.from());
        let to = Bitboard::from_square(m.to());
        let mut occupied = (self.occupied() & !from) | to;
        let mut movers = from;

        let (piece, piece_square) = match m.kind() {
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let (_, _, rook_from, rook_to) = castling_squares(us, m.kind());
                occupied = occupied.without(rook_from).with(rook_to);
                movers = movers.with(rook_from);
                (Piece::Rook, rook_to)
            }
            MoveKind::EnPassant => {
                if let Some(captured) = m.to().forward(us, -1) {
                    occupied = occupied.without(captured);
                }
                (Piece::Pawn, m.to())
            }
            kind => (kind.promotion_piece().unwrap_or(m.piece()), m.to()),
        };

        if attacks_of(piece, us, piece_square, occupied).contains(king) {
            return true;
        }

        let ours = self.occupancy(us) & !movers;
        let diagonal = (self.pieces(Piece::Bishop) | self.pieces(Piece::Queen)) & ours;
        let orthogonal = (self.pieces(Piece::Rook) | self.pieces(Piece::Queen)) & ours;
        (bishop_attacks(king, occupied) & diagonal).is_not_empty()
            || (rook_attacks(king, occupied) & orthogonal).is_not_empty()
    }

    /// Toggles a piece on the board bitboards without touching the key.
    #[inline]
    fn xor_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[piece.index()].toggle(sq);
        self.colors[color.index()].toggle(sq);
    }

    /// Toggles a piece and its key term.
    #[inline]
    fn toggle_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.xor_piece(piece, color, sq);
        self.key ^= ZOBRIST.piece_key(piece, color, sq);
    }

    /// Makes a move generated for this position.
    pub fn make_move(&mut self, m: Move) {
        let us = self.side_to_move;
        let them = us.opposite();
        let (from, to, piece) = (m.from(), m.to(), m.piece());

        self.history.push(Undo {
            mv: m,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
        });

        if let Some(ep) = self.en_passant.take() {
            self.key ^= ZOBRIST.en_passant_key(ep.file_index());
        }
        self.halfmove_clock += 1;

        match m.kind() {
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let (_, _, rook_from, rook_to) = castling_squares(us, m.kind());
                self.toggle_piece(Piece::King, us, from);
                self.toggle_piece(Piece::King, us, to);
                self.toggle_piece(Piece::Rook, us, rook_from);
                self.toggle_piece(Piece::Rook, us, rook_to);
            }
            MoveKind::EnPassant => {
                if let Some(captured) = to.forward(us, -1) {
                    self.toggle_piece(Piece::Pawn, them, captured);
                }
                self.toggle_piece(Piece::Pawn, us, from);
                self.toggle_piece(Piece::Pawn, us, to);
            }
            kind => {
                if let Some(captured) = m.captured() {
                    self.toggle_piece(captured, them, to);
                }
                self.toggle_piece(piece, us, from);
                self.toggle_piece(kind.promotion_piece().unwrap_or(piece), us, to);
            }
        }

        if piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        }

        let castling = self.castling.after_move(from, to);
        if castling != self.castling {
            self.key ^= ZOBRIST.castling_key(self.castling) ^ ZOBRIST.castling_key(castling);
            self.castling = castling;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.key ^= ZOBRIST.side_key();

        if m.kind() == MoveKind::DoublePush {
            if let Some(ep) = from.forward(us, 1) {
                if (pawn_attacks(ep, us) & self.pieces_of(Piece::Pawn, them)).is_not_empty() {
                    self.en_passant = Some(ep);
                    self.key ^= ZOBRIST.en_passant_key(ep.file_index());
                }
            }
        }

        debug_assert_eq!(self.key, self.compute_key());
    }

    /// Takes back the last move made with [`make_move`](Self::make_move).
    pub fn unmake_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            return;
        };
        let m = undo.mv;
        let them = self.side_to_move;
        let us = them.opposite();
        let (from, to, piece) = (m.from(), m.to(), m.piece());

        match m.kind() {
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let (_, _, rook_from, rook_to) = castling_squares(us, m.kind());
                self.xor_piece(Piece::King, us, to);
                self.xor_piece(Piece::King, us, from);
                self.xor_piece(Piece::Rook, us, rook_to);
                self.xor_piece(Piece::Rook, us, rook_from);
            }
            MoveKind::EnPassant => {
                self.xor_piece(Piece::Pawn, us, to);
                self.xor_piece(Piece::Pawn, us, from);
                if let Some(captured) = to.forward(us, -1) {
                    self.xor_piece(Piece::Pawn, them, captured);
                }
            }
            kind => {
                self.xor_piece(kind.promotion_piece().unwrap_or(piece), us, to);
                self.xor_piece(piece, us, from);
                if let Some(captured) = m.captured() {
                    self.xor_piece(captured, them, to);
                }
            }
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;
    }

    /// Passes the turn. Only valid when the side to move is not in check.
    pub fn make_null_move(&mut self) {
        debug_assert!(!self.in_check());
        self.history.push(Undo {
            mv: Move::NULL,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
        });
        if let Some(ep) = self.en_passant.take() {
            self.key ^= ZOBRIST.en_passant_key(ep.file_index());
        }
        // Positions before a null move cannot repeat after it.
        self.halfmove_clock = 0;
        self.side_to_move = self.side_to_move.opposite();
        self.key ^= ZOBRIST.side_key();
    }

    /// Takes back a null move.
    pub fn unmake_null_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            return;
        };
        debug_assert!(undo.mv.is_null());
        self.side_to_move = self.side_to_move.opposite();
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;
    }

    /// Keys of earlier positions that could repeat the current one, most
    /// recent first: same side to move, within the reversible-move window.
    fn repeatable_keys(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        let window = (self.halfmove_clock as usize).min(self.history.len());
        (4..=window)
            .step_by(2)
            .map(move |distance| (distance, self.history[self.history.len() - distance].key))
    }

    /// Number of earlier occurrences of the current position.
    pub fn repetitions(&self) -> usize {
        self.repeatable_keys()
            .filter(|&(_, key)| key == self.key)
            .count()
    }

    /// True if the position counts as drawn by repetition inside a search
    /// whose root lies `plies_from_root` moves back: one repeat after the
    /// root, or two repeats overall.
    pub fn is_repetition(&self, plies_from_root: usize) -> bool {
        let mut seen = 0;
        for (distance, key) in self.repeatable_keys() {
            if key == self.key {
                if distance <= plies_from_root {
                    return true;
                }
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
        }
        false
    }

    /// True once 100 half-moves have passed without a capture or pawn move.
    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// True if neither side can possibly deliver mate: bare kings, a single
    /// minor piece, or only bishops all on squares of one color.
    pub fn has_insufficient_material(&self) -> bool {
        let heavy = self.pieces(Piece::Pawn) | self.pieces(Piece::Rook) | self.pieces(Piece::Queen);
        if heavy.is_not_empty() {
            return false;
        }
        let knights = self.pieces(Piece::Knight);
        let bishops = self.pieces(Piece::Bishop);
        let minors = knights | bishops;
        if !minors.more_than_one() {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }

    /// All legal moves.
    pub fn generate_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        generate(self, GenType::All, &mut list);
        list
    }

    /// Legal captures and promotions.
    pub fn generate_captures(&self) -> MoveList {
        let mut list = MoveList::new();
        generate(self, GenType::Captures, &mut list);
        list
    }

    /// Legal non-capturing, non-promoting moves.
    pub fn generate_quiets(&self) -> MoveList {
        let mut list = MoveList::new();
        generate(self, GenType::Quiets, &mut list);
        list
    }

    /// Finds the legal move written in coordinate notation (`e2e4`, `e7e8q`).
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        let wanted = UciMove::parse(uci)?;
        self.generate_moves()
            .iter()
            .copied()
            .find(|&m| wanted.matches(m))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn play(pos: &mut Position, moves: &[&str]) {
        for uci in moves {
            let m = pos.find_move(uci).unwrap_or_else(|| panic!("{uci} is legal"));
            pos.make_move(m);
        }
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), Fen::STARTPOS);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::new(File::E, Rank::R4)), None);
    }

    #[test]
    fn castling_rights_after_move() {
        let rights = CastlingRights::ALL;
        let after_king = rights.after_move(Square::E1, Square::F1);
        assert!(!after_king.can_castle_kingside(Color::White));
        assert!(!after_king.can_castle_queenside(Color::White));
        assert!(after_king.can_castle_kingside(Color::Black));

        let after_capture = rights.after_move(Square::B1, Square::H8);
        assert!(!after_capture.can_castle_kingside(Color::Black));
        assert!(after_capture.can_castle_queenside(Color::Black));
        assert_eq!(rights.after_move(Square::B1, Square::C1), rights);
    }

    #[test]
    fn rights_without_pieces_in_place_are_dropped() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            pos.castling(),
            CastlingRights::new(
                CastlingRights::WHITE_KINGSIDE.bits() | CastlingRights::BLACK_QUEENSIDE.bits()
            )
        );
    }

    #[test]
    fn en_passant_kept_only_when_capturable() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant(), None);

        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant().map(|s| s.to_algebraic()), Some("e3".to_string()));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn invalid_positions_are_rejected() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::KingCount(Color::Black, 0))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4KK2 w - - 0 1"),
            Err(PositionError::KingCount(Color::White, 2))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/P3K3 w - - 0 1"),
            Err(PositionError::PawnOnBackRank(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 0 1"),
            Ok(_)
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(PositionError::OpponentInCheck(Color::Black))
        ));
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(PositionError::Fen(_))
        ));
    }

    #[test]
    fn make_unmake_restores_everything() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
        let mut pos = Position::from_fen(fen).unwrap();
        let original = pos.clone();
        for m in pos.generate_moves().iter().copied() {
            pos.make_move(m);
            assert_eq!(pos.key(), pos.compute_key(), "{}", m.to_uci());
            pos.unmake_move();
            assert_eq!(pos, original, "{}", m.to_uci());
        }
    }

    #[test]
    fn null_move_roundtrip() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
                .unwrap();
        let original = pos.clone();
        pos.make_null_move();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.key(), pos.compute_key());
        assert_eq!(pos.last_move(), Some(Move::NULL));
        pos.unmake_null_move();
        assert_eq!(pos, original);
    }

    #[test]
    fn special_moves_update_board() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut pos, &["e1g1"]);
        assert_eq!(pos.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert!(!pos.castling().can_castle_kingside(Color::White));
        play(&mut pos, &["e8c8"]);
        assert_eq!(pos.piece_at(Square::C8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::D8), Some((Piece::Rook, Color::Black)));

        let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        play(&mut pos, &["e5d6"]);
        assert_eq!(pos.piece_at(Square::new(File::D, Rank::R5)), None);
        assert_eq!(pos.key(), pos.compute_key());

        let mut pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        play(&mut pos, &["b7b8n"]);
        assert_eq!(pos.piece_at(Square::B8), Some((Piece::Knight, Color::White)));
        pos.unmake_move();
        assert_eq!(
            pos.piece_at(Square::new(File::B, Rank::R7)),
            Some((Piece::Pawn, Color::White))
        );
    }

    #[test]
    fn transpositions_share_a_key() {
        let mut a = Position::startpos();
        let mut b = Position::startpos();
        play(&mut a, &["g1f3", "g8f6", "b1c3"]);
        play(&mut b, &["b1c3", "g8f6", "g1f3"]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.to_fen(), b.to_fen());
    }

    #[test]
    fn repetition_detection() {
        let mut pos = Position::startpos();
        play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert_eq!(pos.repetitions(), 1);
        assert!(pos.is_repetition(4));
        assert!(!pos.is_repetition(0));
        play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert_eq!(pos.repetitions(), 2);
        assert!(pos.is_repetition(0));
    }

    #[test]
    fn irreversible_move_resets_window() {
        let mut pos = Position::startpos();
        play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"]);
        assert_eq!(pos.repetitions(), 0);
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn fifty_move_rule() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 99 80").unwrap();
        assert!(!pos.is_fifty_move_draw());
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 80").unwrap();
        assert!(pos.is_fifty_move_draw());
    }

    #[test]
    fn insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1", false),
            ("4kb2/8/8/8/8/8/8/4KB2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/4KNN1 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/4K2R w - - 0 1", false),
            ("2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
        ];
        for (fen, expected) in cases {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.has_insufficient_material(), expected, "{fen}");
        }
    }

    #[test]
    fn checks_and_attackers() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert!(pos.in_check());
        assert_eq!(pos.checkers().count(), 1);
        assert!(pos.is_square_attacked(Square::E1, Color::Black));
        let attackers = pos.attackers_to(Square::new(File::E, Rank::R2), pos.occupied());
        assert!(attackers.contains(Square::E1));
    }

    #[test]
    fn gives_check_detects_direct_and_discovered() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4B3/4R1K1 w - - 0 1").unwrap();
        let discovered = pos.find_move("e2d3").unwrap();
        assert!(pos.gives_check(discovered));
        let double = pos.find_move("e2b5").unwrap();
        assert!(pos.gives_check(double));
        let quiet = pos.find_move("g1h1").unwrap();
        assert!(!pos.gives_check(quiet));

        // The knight screens the e1 rook until it moves.
        let pos = Position::from_fen("4k3/8/8/8/8/8/4N3/4R1K1 w - - 0 1").unwrap();
        assert!(pos.gives_check(pos.find_move("e2c3").unwrap()));
        assert!(pos.gives_check(pos.find_move("e2g3").unwrap()));
        assert!(!pos.gives_check(pos.find_move("e1f1").unwrap()));
        assert!(!pos.gives_check(pos.find_move("g1h2").unwrap()));

        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(pos.gives_check(pos.find_move("d1d8").unwrap()));
        assert!(pos.gives_check(pos.find_move("d1h5").unwrap()));
        assert!(!pos.gives_check(pos.find_move("d1c2").unwrap()));
        assert!(!pos.gives_check(pos.find_move("e1f2").unwrap()));

        let pos = Position::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = pos.find_move("e1g1").unwrap();
        assert!(pos.gives_check(castle));
    }

    #[test]
    fn find_move_parses_promotions() {
        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let m = pos.find_move("b7b8q").unwrap();
        assert_eq!(m.kind(), MoveKind::PromoteQueen);
        assert!(pos.find_move("b7b8").is_none());
        assert!(pos.find_move("e1e3").is_none());
    }
}
