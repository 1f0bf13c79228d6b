//! Move ordering: killer moves, relative history and move scoring.

use crate::score::MAX_PLY;
use crate::see::see;
use chess_core::{Color, Move};
use chess_engine::{MoveList, Position};

const HASH_MOVE: i32 = 1_000_000;
const GOOD_CAPTURE: i32 = 800_000;
const KILLER: i32 = 700_000;
const BAD_CAPTURE: i32 = 600_000;

/// Upper bound of a quiet move's history score.
pub const HISTORY_SCALE: u32 = 10_000;

/// Two quiet moves per ply that recently caused a beta cutoff.
#[derive(Debug, Clone)]
pub struct KillerTable {
    killers: Vec<[Move; 2]>,
}

impl KillerTable {
    pub fn new() -> Self {
        KillerTable {
            killers: vec![[Move::NULL; 2]; MAX_PLY + 1],
        }
    }

    /// Records a cutoff move, pushing the older killer out.
    pub fn store(&mut self, ply: usize, m: Move) {
        if let Some(slot) = self.killers.get_mut(ply) {
            if slot[0] != m {
                slot[1] = slot[0];
                slot[0] = m;
            }
        }
    }

    pub fn get(&self, ply: usize) -> [Move; 2] {
        self.killers.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub fn is_killer(&self, ply: usize, m: Move) -> bool {
        !m.is_null() && self.get(ply).contains(&m)
    }

    pub fn clear(&mut self) {
        self.killers.fill([Move::NULL; 2]);
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Relative history: how often a quiet move caused a cutoff compared with
/// how often it was tried, per (colour, piece, target square).
#[derive(Debug, Clone)]
pub struct HistoryTable {
    success: Vec<u32>,
    tried: Vec<u32>,
    limit: u32,
}

impl HistoryTable {
    const LEN: usize = 2 * 6 * 64;

    pub fn new(limit: u32) -> Self {
        HistoryTable {
            success: vec![0; Self::LEN],
            tried: vec![0; Self::LEN],
            limit: limit.max(2),
        }
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(2);
    }

    #[inline]
    fn index(color: Color, m: Move) -> usize {
        (color.index() * 6 + m.piece().index()) * 64 + m.to().index() as usize
    }

    /// Credits a quiet move that caused a cutoff at `depth` plies.
    pub fn credit(&mut self, color: Color, m: Move, depth: u32) {
        let i = Self::index(color, m);
        let bonus = depth * depth;
        self.success[i] = self.success[i].saturating_add(bonus);
        self.tried[i] = self.tried[i].saturating_add(bonus);
        if self.tried[i] > self.limit {
            self.decay();
        }
    }

    /// Debits a quiet move that was searched without a cutoff.
    pub fn debit(&mut self, color: Color, m: Move, depth: u32) {
        let i = Self::index(color, m);
        self.tried[i] = self.tried[i].saturating_add(depth * depth);
        if self.tried[i] > self.limit {
            self.decay();
        }
    }

    /// Cutoff ratio of `m` scaled to `0..=HISTORY_SCALE`.
    pub fn score(&self, color: Color, m: Move) -> i32 {
        let i = Self::index(color, m);
        match self.tried[i] {
            0 => 0,
            tried => (self.success[i] as u64 * HISTORY_SCALE as u64 / tried as u64) as i32,
        }
    }

    /// Halves every counter.
    pub fn decay(&mut self) {
        for value in self.success.iter_mut().chain(self.tried.iter_mut()) {
            *value /= 2;
        }
    }

    pub fn clear(&mut self) {
        self.success.fill(0);
        self.tried.fill(0);
    }
}

/// Assigns ordering scores: hash move, captures winning or trading
/// material by SEE, killers, losing captures, then quiets by history.
pub fn score_moves(
    moves: &mut MoveList,
    position: &Position,
    hash_move: Option<Move>,
    killers: [Move; 2],
    history: &HistoryTable,
    see_values: &[i32; 6],
) {
    let us = position.side_to_move();
    for m in moves.as_mut_slice() {
        let score = if Some(*m) == hash_move {
            HASH_MOVE
        } else if !m.is_quiet() {
            let exchange = see(position, *m, see_values);
            if exchange >= 0 {
                GOOD_CAPTURE + exchange
            } else {
                BAD_CAPTURE + exchange
            }
        } else if *m == killers[0] {
            KILLER + 1
        } else if *m == killers[1] {
            KILLER
        } else {
            history.score(us, *m)
        };
        m.set_score(score);
    }
}

/// Scores for quiescence: most valuable victim, least valuable attacker.
pub fn score_captures(moves: &mut MoveList, see_values: &[i32; 6]) {
    for m in moves.as_mut_slice() {
        let victim = m.captured().map_or(0, |piece| see_values[piece.index()]);
        let promotion = m
            .kind()
            .promotion_piece()
            .map_or(0, |piece| see_values[piece.index()]);
        let attacker = see_values[m.piece().index()].min(2_000);
        m.set_score((victim + promotion) * 16 - attacker / 16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::see::see_values;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn killers_shift() {
        let pos = Position::startpos();
        let a = pos.find_move("g1f3").unwrap();
        let b = pos.find_move("b1c3").unwrap();
        let mut killers = KillerTable::new();
        killers.store(3, a);
        killers.store(3, a);
        assert_eq!(killers.get(3), [a, Move::NULL]);
        killers.store(3, b);
        assert_eq!(killers.get(3), [b, a]);
        assert!(killers.is_killer(3, a));
        assert!(!killers.is_killer(4, a));
        assert!(!killers.is_killer(3, Move::NULL));
        killers.store(MAX_PLY + 50, a);
        killers.clear();
        assert_eq!(killers.get(3), [Move::NULL; 2]);
    }

    #[test]
    fn history_is_relative() {
        let pos = Position::startpos();
        let a = pos.find_move("g1f3").unwrap();
        let b = pos.find_move("b1c3").unwrap();
        let mut history = HistoryTable::new(1 << 20);
        history.credit(Color::White, a, 4);
        history.debit(Color::White, a, 4);
        history.credit(Color::White, b, 2);
        assert_eq!(history.score(Color::White, a), HISTORY_SCALE as i32 / 2);
        assert_eq!(history.score(Color::White, b), HISTORY_SCALE as i32);
        assert_eq!(history.score(Color::Black, a), 0);
    }

    #[test]
    fn history_halves_past_limit() {
        let pos = Position::startpos();
        let a = pos.find_move("e2e4").unwrap();
        let mut history = HistoryTable::new(100);
        history.credit(Color::White, a, 8);
        history.debit(Color::White, a, 8);
        // 64 + 64 = 128 tried > 100 triggers one halving; ratio survives.
        assert_eq!(history.score(Color::White, a), HISTORY_SCALE as i32 / 2);
        assert_eq!(history.tried[HistoryTable::index(Color::White, a)], 64);
    }

    #[test]
    fn ordering_classes() {
        // Rxd5 wins the queen, Rxh2 loses the rook for a knight.
        let pos = position("4k3/8/8/3q4/8/6p1/3R3n/4K3 w - - 0 1");
        let values = see_values(&Parameters::default().eval);
        let mut moves = pos.generate_moves();
        let hash = pos.find_move("e1e2").unwrap();
        let killer = pos.find_move("d2a2").unwrap();
        let quiet = pos.find_move("d2c2").unwrap();
        let mut history = HistoryTable::new(1 << 20);
        history.credit(Color::White, quiet, 3);
        score_moves(
            &mut moves,
            &pos,
            Some(hash),
            [killer, Move::NULL],
            &history,
            &values,
        );

        let order: Vec<String> = (0..moves.len())
            .map(|i| moves.pick(i).unwrap().to_uci())
            .collect();
        assert_eq!(&order[..5], ["e1e2", "d2d5", "d2a2", "d2h2", "d2c2"]);
    }

    #[test]
    fn mvv_lva() {
        let pos = position("4k3/8/8/3q1r2/4P1P1/8/8/4K3 w - - 0 1");
        let values = see_values(&Parameters::default().eval);
        let mut moves = pos.generate_captures();
        score_captures(&mut moves, &values);
        assert_eq!(moves.pick(0).unwrap().to_uci(), "e4d5");
    }
}
