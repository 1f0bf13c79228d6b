//! Move generation.
//!
//! Moves are generated pseudo-legally per piece and filtered on the fly by
//! check and pin masks, so every emitted move is legal. En passant and king
//! moves are verified against the occupancy they leave behind.

mod attacks;
mod magics;
pub mod perft;

use crate::geometry::{between, line};
use crate::position::castling_squares;
use crate::{Bitboard, Position};
use chess_core::{Move, MoveKind, Piece, Square};

pub use attacks::{
    attacks_of, bishop_attacks, king_attacks, knight_attacks, knight_attacks_of, pawn_attacks,
    pawn_attacks_of, queen_attacks, rook_attacks,
};
pub use magics::{
    find_magic, get_attack_tables, AttackTables, FoundMagic, Magic, MagicError, Slider, MAGIC_SEED,
};

/// Moves of one position, stored inline.
///
/// No legal position has more than 218 moves, so generation never touches
/// the heap.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES, "move list overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Mutable view, used to attach ordering scores in place.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Membership by move identity; ordering scores do not matter.
    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.iter().any(|&other| other == m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Keeps the moves `keep` accepts, preserving their order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Move) -> bool) {
        let mut kept = 0;
        for i in 0..self.len {
            let m = self.moves[i];
            if keep(&m) {
                self.moves[kept] = m;
                kept += 1;
            }
        }
        self.len = kept;
    }

    /// Moves the best-scored entry of `start..` to `start` and returns it.
    /// One selection-sort step per call, so a cutoff leaves the tail
    /// unsorted.
    pub fn pick(&mut self, start: usize) -> Option<Move> {
        let tail = self.moves.get(start..self.len)?;
        let (offset, _) = tail
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, m)| m.score())?;
        self.moves.swap(start, start + offset);
        Some(self.moves[start])
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|m| m.to_uci()))
            .finish()
    }
}

/// Which subset of the legal moves to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenType {
    /// Every legal move.
    All,
    /// Captures, en passant and all promotions.
    Captures,
    /// Everything else: quiet moves, double pushes and castling.
    Quiets,
}

/// Check and pin information for the side to move.
struct Legality {
    king: Square,
    checkers: Bitboard,
    pinned: Bitboard,
    /// Destinations that resolve a single check (everything when not in check).
    evasions: Bitboard,
}

impl Legality {
    fn new(position: &Position) -> Self {
        let us = position.side_to_move();
        let them = us.opposite();
        let king = position.king_square(us);
        let occupied = position.occupied();
        let checkers = position.checkers();

        let diagonal = position.pieces_of(Piece::Bishop, them) | position.pieces_of(Piece::Queen, them);
        let orthogonal = position.pieces_of(Piece::Rook, them) | position.pieces_of(Piece::Queen, them);
        let snipers = (bishop_attacks(king, Bitboard::EMPTY) & diagonal)
            | (rook_attacks(king, Bitboard::EMPTY) & orthogonal);

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = between(king, sniper) & occupied;
            if blockers.is_not_empty() && !blockers.more_than_one() {
                pinned |= blockers & position.occupancy(us);
            }
        }

        let evasions = match checkers.lsb() {
            None => Bitboard::FULL,
            Some(checker) if !checkers.more_than_one() => {
                between(king, checker) | Bitboard::from_square(checker)
            }
            Some(_) => Bitboard::EMPTY,
        };

        Legality {
            king,
            checkers,
            pinned,
            evasions,
        }
    }

    /// Squares a piece on `from` may move to without exposing its king.
    #[inline]
    fn allowed(&self, from: Square) -> Bitboard {
        if self.pinned.contains(from) {
            self.evasions & line(self.king, from)
        } else {
            self.evasions
        }
    }
}

/// Appends the legal moves of `gen_type` for the side to move to `list`.
pub fn generate(position: &Position, gen_type: GenType, list: &mut MoveList) {
    let us = position.side_to_move();
    let them = us.opposite();
    let occupied = position.occupied();
    let theirs = position.occupancy(them);
    let legality = Legality::new(position);

    let targets = match gen_type {
        GenType::All => !position.occupancy(us),
        GenType::Captures => theirs,
        GenType::Quiets => !occupied,
    };

    let king = legality.king;
    let without_king = occupied.without(king);
    for to in king_attacks(king) & targets {
        if (position.attackers_to(to, without_king) & theirs).is_empty() {
            list.push(Move::normal(king, to, Piece::King, position.piece_type_at(to)));
        }
    }

    // Only the king can answer a double check.
    if legality.checkers.more_than_one() {
        return;
    }

    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for from in position.pieces_of(piece, us) {
            let moves = attacks_of(piece, us, from, occupied) & targets & legality.allowed(from);
            for to in moves {
                list.push(Move::normal(from, to, piece, position.piece_type_at(to)));
            }
        }
    }

    generate_pawn_moves(position, &legality, gen_type, list);

    if gen_type != GenType::Captures && legality.checkers.is_empty() {
        generate_castling_moves(position, list);
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, captured: Option<Piece>) {
    for kind in [
        MoveKind::PromoteQueen,
        MoveKind::PromoteKnight,
        MoveKind::PromoteRook,
        MoveKind::PromoteBishop,
    ] {
        list.push(Move::new(from, to, Piece::Pawn, captured, kind));
    }
}

fn generate_pawn_moves(
    position: &Position,
    legality: &Legality,
    gen_type: GenType,
    list: &mut MoveList,
) {
    let us = position.side_to_move();
    let them = us.opposite();
    let empty = position.empty_squares();
    let theirs = position.occupancy(them);
    let last_rank = us.relative_rank(7);
    let start_rank = us.relative_rank(1);
    let quiets = gen_type != GenType::Captures;
    let captures = gen_type != GenType::Quiets;

    for from in position.pieces_of(Piece::Pawn, us) {
        let allowed = legality.allowed(from);

        if let Some(one) = from.forward(us, 1).filter(|&sq| empty.contains(sq)) {
            if one.rank_index() == last_rank {
                if captures && allowed.contains(one) {
                    push_promotions(list, from, one, None);
                }
            } else if quiets {
                if allowed.contains(one) {
                    list.push(Move::normal(from, one, Piece::Pawn, None));
                }
                if from.rank_index() == start_rank {
                    if let Some(two) = one.forward(us, 1) {
                        if empty.contains(two) && allowed.contains(two) {
                            list.push(Move::new(from, two, Piece::Pawn, None, MoveKind::DoublePush));
                        }
                    }
                }
            }
        }

        if !captures {
            continue;
        }

        for to in pawn_attacks(from, us) & theirs & allowed {
            let captured = position.piece_type_at(to);
            if to.rank_index() == last_rank {
                push_promotions(list, from, to, captured);
            } else {
                list.push(Move::normal(from, to, Piece::Pawn, captured));
            }
        }

        if let Some(ep) = position.en_passant() {
            if pawn_attacks(from, us).contains(ep) && en_passant_is_legal(position, legality, from, ep) {
                list.push(Move::new(from, ep, Piece::Pawn, Some(Piece::Pawn), MoveKind::EnPassant));
            }
        }
    }
}

/// En passant removes two pieces from one line, which pin masks miss, so
/// the resulting occupancy is checked directly.
fn en_passant_is_legal(position: &Position, legality: &Legality, from: Square, ep: Square) -> bool {
    let us = position.side_to_move();
    let Some(captured) = ep.forward(us, -1) else {
        return false;
    };
    let occupied = (position.occupied() & !Bitboard::from_square(from) & !Bitboard::from_square(captured))
        | Bitboard::from_square(ep);
    let attackers = position.attackers_to(legality.king, occupied)
        & position.occupancy(us.opposite())
        & !Bitboard::from_square(captured);
    attackers.is_empty()
}

fn generate_castling_moves(position: &Position, list: &mut MoveList) {
    let us = position.side_to_move();
    let them = us.opposite();
    let occupied = position.occupied();
    let rights = position.castling();

    for (kind, allowed) in [
        (MoveKind::CastleKingside, rights.can_castle_kingside(us)),
        (MoveKind::CastleQueenside, rights.can_castle_queenside(us)),
    ] {
        if !allowed {
            continue;
        }
        let (king_from, king_to, rook_from, _) = castling_squares(us, kind);
        let path_empty = (between(king_from, rook_from) & occupied).is_empty();
        let king_path = between(king_from, king_to).with(king_to);
        if path_empty && king_path.into_iter().all(|sq| !position.is_square_attacked(sq, them)) {
            list.push(Move::new(king_from, king_to, Piece::King, None, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn count_kind(position: &Position, kind: MoveKind) -> usize {
        position.generate_moves().iter().filter(|m| m.kind() == kind).count()
    }

    #[test]
    fn move_list_basics() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let push = Move::new(Square::E2, Square::E4, Piece::Pawn, None, MoveKind::DoublePush);
        let step = Move::normal(Square::E2, Square::E3, Piece::Pawn, None);
        let knight = Move::normal(Square::G1, Square::F3, Piece::Knight, None);
        for m in [push, step, knight] {
            list.push(m);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list[2], knight);
        assert!(list.contains(step.with_score(99)));

        list.retain(|m| m.piece() == Piece::Pawn);
        assert_eq!(list.as_slice(), &[push, step]);
        list.clear();
        assert!(list.is_empty());
        assert!(MoveList::default().is_empty());
    }

    #[test]
    fn pick_returns_moves_best_first() {
        let mut list = MoveList::new();
        for (i, score) in [5, 40, -3, 12].into_iter().enumerate() {
            let from = Square::from_index(i as u8).unwrap();
            let to = Square::from_index(i as u8 + 16).unwrap();
            list.push(Move::normal(from, to, Piece::Rook, None).with_score(score));
        }
        let order: Vec<i32> = (0..list.len()).filter_map(|i| list.pick(i)).map(|m| m.score()).collect();
        assert_eq!(order, vec![40, 12, 5, -3]);
        assert_eq!(list.pick(4), None);
    }

    #[test]
    fn pick_keeps_generation_order_on_ties() {
        let mut list = MoveList::new();
        let first = Move::normal(Square::A1, Square::A2, Piece::Rook, None);
        let second = Move::normal(Square::A1, Square::A3, Piece::Rook, None);
        list.push(first);
        list.push(second);
        assert_eq!(list.pick(0), Some(first));
    }

    #[test]
    fn startpos_moves() {
        let position = Position::startpos();
        assert_eq!(position.generate_moves().len(), 20);
        assert_eq!(count_kind(&position, MoveKind::DoublePush), 8);
        assert!(position.is_square_attacked(Square::E3, Color::White));
        assert!(!position.is_square_attacked(Square::E4, Color::White));
        assert!(position.is_square_attacked(Square::F6, Color::Black));
    }

    #[test]
    fn captures_and_quiets_partition_all_moves() {
        let position =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
                .unwrap();
        let all = position.generate_moves();
        let captures = position.generate_captures();
        let quiets = position.generate_quiets();
        assert_eq!(captures.len() + quiets.len(), all.len());
        assert!(captures.iter().all(|m| m.is_capture() || m.is_promotion()));
        assert!(quiets.iter().all(|m| !m.is_capture() && !m.is_promotion()));
        assert!(all.iter().all(|m| captures.contains(*m) || quiets.contains(*m)));
    }

    #[test]
    fn castling_both_sides() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(count_kind(&position, MoveKind::CastleKingside), 1);
        assert_eq!(count_kind(&position, MoveKind::CastleQueenside), 1);
    }

    #[test]
    fn no_castling_out_of_or_through_check() {
        let in_check =
            Position::from_fen("r3k2r/pppp1ppp/8/4r3/8/8/PPPP1PPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(count_kind(&in_check, MoveKind::CastleKingside), 0);
        assert_eq!(count_kind(&in_check, MoveKind::CastleQueenside), 0);

        let through = Position::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(count_kind(&through, MoveKind::CastleKingside), 0);

        // b1 may be attacked: only the king's path matters.
        let b1_attacked = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert_eq!(count_kind(&b1_attacked, MoveKind::CastleQueenside), 1);
    }

    #[test]
    fn en_passant_available() {
        let position =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1")
                .unwrap();
        assert_eq!(count_kind(&position, MoveKind::EnPassant), 1);
    }

    #[test]
    fn en_passant_exposing_king_on_rank_is_illegal() {
        let position = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        assert_eq!(count_kind(&position, MoveKind::EnPassant), 0);
    }

    #[test]
    fn en_passant_resolves_pawn_check() {
        let position = Position::from_fen("8/8/8/3pP3/4K3/8/8/7k w - d6 0 1").unwrap();
        assert!(position.in_check());
        assert_eq!(count_kind(&position, MoveKind::EnPassant), 1);
    }

    #[test]
    fn promotions_generate_four_kinds() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let promos = position.generate_moves().iter().filter(|m| m.is_promotion()).count();
        assert_eq!(promos, 4);
    }

    #[test]
    fn pinned_piece_moves_along_pin_only() {
        let position = Position::from_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let rook_moves: Vec<Move> = position
            .generate_moves()
            .iter()
            .copied()
            .filter(|m| m.piece() == Piece::Rook)
            .collect();
        assert_eq!(rook_moves.len(), 5);
        assert!(rook_moves.iter().all(|m| m.to().file_index() == 4));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let position = Position::from_fen("4k3/8/8/8/8/3n4/8/r3K3 w - - 0 1").unwrap();
        assert_eq!(position.checkers().count(), 2);
        assert!(position.generate_moves().iter().all(|m| m.piece() == Piece::King));
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mate = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(mate.generate_moves().is_empty());
        assert!(mate.in_check());
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.generate_moves().is_empty());
        assert!(!stalemate.in_check());
    }
}
