//! Search score conventions.
//!
//! Scores are centipawns from the side to move's point of view. Mate scores
//! sit just below [`MATE`] and encode the distance to mate in plies from the
//! root; [`to_tt`] and [`from_tt`] re-base them so a stored entry is valid
//! wherever the position recurs in the tree.

/// Deepest ply the search ever reaches.
pub const MAX_PLY: usize = 128;

/// Larger than any reachable score.
pub const INFINITE: i32 = 32_000;

/// Score of delivering mate on the board right now.
pub const MATE: i32 = 31_000;

/// Any score at least this large in magnitude is a mate score.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

pub const DRAW: i32 = 0;

/// Score for the side to move when it is mated `ply` plies from the root.
#[inline]
pub const fn mated_in(ply: usize) -> i32 {
    -MATE + ply as i32
}

/// Score for the side to move when it mates `ply` plies from the root.
#[inline]
pub const fn mate_in(ply: usize) -> i32 {
    MATE - ply as i32
}

#[inline]
pub const fn is_mate(score: i32) -> bool {
    score >= MATE_BOUND || score <= -MATE_BOUND
}

/// Converts a root-relative mate score into a node-relative one for storage.
#[inline]
pub const fn to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`to_tt`] for an entry read back at `ply`.
#[inline]
pub const fn from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

/// How a reported score should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Exact centipawn value.
    Exact,
    /// Mate in the given number of moves; negative when being mated.
    Mate,
    /// The true value is at least this (the search failed high).
    LowerBound,
    /// The true value is at most this (the search failed low).
    UpperBound,
}

/// A score as reported to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub kind: ScoreKind,
    /// Centipawns, or full moves to mate for [`ScoreKind::Mate`].
    pub value: i32,
}

impl Score {
    /// Converts an internal score. Mate scores always report as mates;
    /// otherwise `kind` says whether the value is exact or a bound.
    pub fn from_internal(score: i32, kind: ScoreKind) -> Self {
        if score >= MATE_BOUND {
            Score {
                kind: ScoreKind::Mate,
                value: (MATE - score + 1) / 2,
            }
        } else if score <= -MATE_BOUND {
            Score {
                kind: ScoreKind::Mate,
                value: -((MATE + score) / 2),
            }
        } else {
            Score { kind, value: score }
        }
    }

    pub const fn centipawns(value: i32) -> Self {
        Score {
            kind: ScoreKind::Exact,
            value,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ScoreKind::Exact => write!(f, "cp {}", self.value),
            ScoreKind::Mate => write!(f, "mate {}", self.value),
            ScoreKind::LowerBound => write!(f, "cp {} lowerbound", self.value),
            ScoreKind::UpperBound => write!(f, "cp {} upperbound", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_scores_in_moves() {
        assert_eq!(Score::from_internal(mate_in(1), ScoreKind::Exact).value, 1);
        assert_eq!(Score::from_internal(mate_in(3), ScoreKind::Exact).value, 2);
        assert_eq!(Score::from_internal(mated_in(2), ScoreKind::Exact).value, -1);
        let now = Score::from_internal(mated_in(0), ScoreKind::Exact);
        assert_eq!(now.kind, ScoreKind::Mate);
        assert_eq!(now.value, 0);
    }

    #[test]
    fn bounds_pass_through() {
        let s = Score::from_internal(35, ScoreKind::LowerBound);
        assert_eq!(s, Score { kind: ScoreKind::LowerBound, value: 35 });
        assert_eq!(s.to_string(), "cp 35 lowerbound");
    }

    #[test]
    fn tt_rebasing() {
        // Mate found 5 plies below a node at ply 3 is stored as mate in 5.
        let root_relative = mate_in(8);
        let stored = to_tt(root_relative, 3);
        assert_eq!(stored, mate_in(5));
        // Read back at ply 10 it becomes mate in 15 from the root.
        assert_eq!(from_tt(stored, 10), mate_in(15));
        assert_eq!(from_tt(to_tt(-250, 7), 2), -250);
        assert_eq!(from_tt(to_tt(mated_in(9), 4), 4), mated_in(9));
    }

    #[test]
    fn mate_detection() {
        assert!(is_mate(mate_in(40)));
        assert!(is_mate(mated_in(40)));
        assert!(!is_mate(2_000));
    }
}
