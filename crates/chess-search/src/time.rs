//! Time management.

use crate::eval::MAX_PHASE;
use crate::limits::SearchLimits;
use crate::params::ManagementParams;
use chess_core::Color;
use std::time::{Duration, Instant};

/// What a finished iteration tells the time manager about the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterationSignals {
    pub depth: u32,
    /// The best move differs from the previous iteration's.
    pub best_move_changed: bool,
    /// An aspiration window failed, so the score was not exact at first.
    pub bound_failed: bool,
    /// Absolute score change since the previous iteration.
    pub score_swing: i32,
    /// Best-move changes over the whole search.
    pub best_move_changes: u32,
    /// Depth of the last iteration that changed the best move.
    pub last_change_depth: u32,
}

/// Decides how long one search may run.
///
/// The budget comes from the mover's clock, increment and moves to go; when
/// moves to go is unknown it is estimated from the game phase. The budget
/// can be extended once per search, never past the time left on the clock.
#[derive(Debug, Clone)]
pub struct TimeManager {
    start: Instant,
    budget: Option<Duration>,
    maximum: Option<Duration>,
    extension: Duration,
    extended: bool,
    paused: bool,
    iteration_start_percent: u32,
    score_swing_margin: i32,
    churn_percent: u32,
    stale_iterations: u32,
}

impl TimeManager {
    pub fn new(
        limits: &SearchLimits,
        side: Color,
        phase: i32,
        params: &ManagementParams,
    ) -> Self {
        let overhead = Duration::from_millis(params.move_overhead_ms);
        let floor = Duration::from_millis(1);
        let (remaining, increment) = match side {
            Color::White => (limits.white_time, limits.white_increment),
            Color::Black => (limits.black_time, limits.black_increment),
        };

        let (budget, maximum, extension) = if limits.infinite {
            (None, None, Duration::ZERO)
        } else if let Some(move_time) = limits.move_time {
            let budget = move_time.saturating_sub(overhead).max(floor);
            (Some(budget), Some(budget), Duration::ZERO)
        } else if let Some(remaining) = remaining {
            let maximum = remaining.saturating_sub(overhead).max(floor);
            let moves_to_go = limits
                .moves_to_go
                .unwrap_or_else(|| estimate_moves_to_go(phase, params))
                .max(1);
            let increment = increment.unwrap_or_default() * params.increment_percent / 100;
            let base = remaining / moves_to_go + increment;
            let cap = if moves_to_go <= 2 {
                maximum
            } else {
                remaining * params.max_budget_percent / 100
            };
            let budget = base.min(cap).min(maximum).max(floor);
            let extension = budget * params.extension_percent / 100;
            (Some(budget), Some(maximum), extension)
        } else {
            (None, None, Duration::ZERO)
        };

        TimeManager {
            start: Instant::now(),
            budget,
            maximum,
            extension,
            extended: false,
            paused: limits.ponder,
            iteration_start_percent: params.iteration_start_percent,
            score_swing_margin: params.score_swing_margin,
            churn_percent: params.churn_percent,
            stale_iterations: params.stale_iterations,
        }
    }

    /// The current allocation, or `None` when only a stop ends the search.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Starts measuring the budget from now. Used when pondering turns into
    /// a real search.
    pub fn start_clock(&mut self) {
        self.start = Instant::now();
        self.paused = false;
    }

    /// True once the allocation is used up.
    pub fn time_up(&self) -> bool {
        !self.paused && self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }

    /// True if another iteration is likely to finish within the allocation.
    pub fn can_start_iteration(&self) -> bool {
        match self.budget {
            Some(budget) if !self.paused => {
                self.elapsed() < budget * self.iteration_start_percent / 100
            }
            _ => true,
        }
    }

    /// True if an iteration that ran past the start threshold leaves the
    /// search unsettled enough to ask for the extension.
    pub fn is_unstable(&self, signals: &IterationSignals) -> bool {
        let churn = signals.depth >= 4
            && signals.best_move_changes * 100 > self.churn_percent * signals.depth;
        let unchanged_for = signals.depth.saturating_sub(signals.last_change_depth);
        let stale = unchanged_for >= self.stale_iterations;
        signals.best_move_changed
            || signals.bound_failed
            || signals.score_swing > self.score_swing_margin
            || churn
            || stale
    }

    /// Grants the one-time extension. Returns false if it was already used
    /// or there is no room left on the clock.
    pub fn try_extend(&mut self) -> bool {
        if self.extended || self.paused || self.extension.is_zero() {
            return false;
        }
        let (Some(budget), Some(maximum)) = (self.budget, self.maximum) else {
            return false;
        };
        let extended = (budget + self.extension).min(maximum);
        if extended <= budget {
            return false;
        }
        self.budget = Some(extended);
        self.extended = true;
        true
    }

    pub fn was_extended(&self) -> bool {
        self.extended
    }
}

/// Fewer pieces on the board means fewer moves left to plan for.
fn estimate_moves_to_go(phase: i32, params: &ManagementParams) -> u32 {
    let phase = phase.clamp(0, MAX_PHASE) as u32;
    let opening = params.moves_to_go_opening;
    let endgame = params.moves_to_go_endgame;
    if opening >= endgame {
        endgame + (opening - endgame) * phase / MAX_PHASE as u32
    } else {
        endgame - (endgame - opening) * phase / MAX_PHASE as u32
    }
}
