//! Progress reports and results.

use crate::score::Score;
use chess_core::Move;
use std::time::Duration;

/// A progress report published to subscribers during a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInfo {
    /// Nominal depth in plies of the iteration being reported.
    pub depth: u32,
    /// Deepest ply reached, quiescence included.
    pub seldepth: u32,
    pub score: Score,
    pub nodes: u64,
    pub elapsed: Duration,
    /// Root move being searched and its 1-based number, when the report is
    /// about search progress rather than a finished iteration.
    pub current_move: Option<(Move, u32)>,
    pub pv: Vec<Move>,
    /// Transposition table fill in permille.
    pub hashfull: u32,
}

impl SearchInfo {
    pub fn nps(&self) -> u64 {
        let millis = self.elapsed.as_millis() as u64;
        if millis == 0 {
            0
        } else {
            self.nodes * 1000 / millis
        }
    }
}

impl std::fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {}",
            self.depth,
            self.seldepth,
            self.score,
            self.nodes,
            self.nps(),
            self.hashfull,
            self.elapsed.as_millis()
        )?;
        if let Some((m, number)) = self.current_move {
            write!(f, " currmove {} currmovenumber {}", m.to_uci(), number)?;
        }
        if !self.pv.is_empty() {
            write!(f, " pv")?;
            for m in &self.pv {
                write!(f, " {}", m.to_uci())?;
            }
        }
        Ok(())
    }
}

/// The result of a finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// `None` only when the root has no legal move.
    pub best_move: Option<Move>,
    pub ponder_move: Option<Move>,
    pub score: Score,
    /// Depth of the last completed iteration.
    pub depth: u32,
    pub nodes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreKind;
    use chess_engine::Position;

    #[test]
    fn display_line() {
        let position = Position::startpos();
        let e4 = position.find_move("e2e4").unwrap();
        let info = SearchInfo {
            depth: 3,
            seldepth: 5,
            score: Score {
                kind: ScoreKind::Exact,
                value: 25,
            },
            nodes: 2000,
            elapsed: Duration::from_millis(100),
            current_move: None,
            pv: vec![e4],
            hashfull: 3,
        };
        assert_eq!(info.nps(), 20_000);
        assert_eq!(
            info.to_string(),
            "depth 3 seldepth 5 score cp 25 nodes 2000 nps 20000 hashfull 3 time 100 pv e2e4"
        );
    }
}
