//! Iterative-deepening principal variation search.
//!
//! Depths are counted in [`ONE_PLY`] units so fractional extensions can
//! accumulate along a line. Scores follow the conventions in
//! [`crate::score`].

use crate::eval::{phase, Evaluator};
use crate::eval_cache::EvalCache;
use crate::info::{SearchInfo, SearchOutcome};
use crate::limits::SearchLimits;
use crate::ordering::{score_captures, score_moves, HistoryTable, KillerTable};
use crate::params::{ManagementParams, Parameters};
use crate::score::{
    is_mate, mate_in, mated_in, Score, ScoreKind, DRAW, INFINITE, MATE, MATE_BOUND, MAX_PLY,
};
use crate::see::{see, see_values};
use crate::time::{IterationSignals, TimeManager};
use crate::tt::{Bound, TranspositionTable};
use chess_core::Move;
use chess_engine::{MoveList, Position};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Depth units per ply.
pub const ONE_PLY: i32 = 8;

/// Deepest iteration started when no depth limit is given.
pub const MAX_DEPTH: u32 = 100;

/// Nodes between clock checks.
const CLOCK_INTERVAL: u64 = 1024;

/// Root move reports start after this much search time.
const CURRMOVE_DELAY: Duration = Duration::from_secs(1);

/// Cross-thread control of a running search.
///
/// Cheap to clone; all clones share the same flags.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    stop: Arc<AtomicBool>,
    pondering: Arc<AtomicBool>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the search to finish as soon as possible.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Turns a ponder search into a normal timed search.
    pub fn ponder_hit(&self) {
        self.pondering.store(false, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn is_pondering(&self) -> bool {
        self.pondering.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self, pondering: bool) {
        self.stop.store(false, Ordering::SeqCst);
        self.pondering.store(pondering, Ordering::SeqCst);
    }
}

/// Tables that persist between searches.
#[derive(Debug)]
pub struct SearchTables {
    pub tt: TranspositionTable,
    pub eval_cache: EvalCache,
    pub history: HistoryTable,
}

impl SearchTables {
    pub fn new(params: &ManagementParams) -> Self {
        SearchTables {
            tt: TranspositionTable::new(
                params.hash_mb,
                params.generation_wrap,
                params.replacement_margin,
            ),
            eval_cache: EvalCache::new(params.eval_cache_mb),
            history: HistoryTable::new(params.history_limit),
        }
    }

    /// Applies changed sizes and policies. Resized tables start empty.
    pub fn configure(&mut self, params: &ManagementParams) {
        self.tt
            .configure(params.hash_mb, params.generation_wrap, params.replacement_margin);
        self.eval_cache.resize(params.eval_cache_mb);
        self.history.set_limit(params.history_limit);
    }

    pub fn clear(&mut self) {
        self.tt.clear();
        self.eval_cache.clear();
        self.history.clear();
    }
}

/// One search over a private copy of the root position.
pub struct Searcher<'a> {
    position: Position,
    params: &'a Parameters,
    evaluator: Evaluator,
    see_values: [i32; 6],
    tables: &'a mut SearchTables,
    killers: KillerTable,
    controller: SearchController,
    time: TimeManager,
    limits: &'a SearchLimits,
    root_moves: Vec<Move>,
    reporter: &'a mut dyn FnMut(SearchInfo),
    nodes: u64,
    seldepth: usize,
    root_depth: u32,
    completed_depth: u32,
    stopped: bool,
    iteration_best: Option<(Move, i32)>,
}

impl<'a> Searcher<'a> {
    /// Prepares a search of `position`. An empty `root_moves` searches every
    /// legal move.
    pub fn new(
        position: &Position,
        params: &'a Parameters,
        tables: &'a mut SearchTables,
        controller: SearchController,
        limits: &'a SearchLimits,
        root_moves: &[Move],
        reporter: &'a mut dyn FnMut(SearchInfo),
    ) -> Self {
        let legal = position.generate_moves();
        let root_moves: Vec<Move> = legal
            .iter()
            .copied()
            .filter(|m| root_moves.is_empty() || root_moves.contains(m))
            .collect();
        let time = TimeManager::new(
            limits,
            position.side_to_move(),
            phase(position),
            &params.management,
        );
        Searcher {
            position: position.clone(),
            params,
            evaluator: Evaluator::new(&params.eval),
            see_values: see_values(&params.eval),
            tables,
            killers: KillerTable::new(),
            controller,
            time,
            limits,
            root_moves,
            reporter,
            nodes: 0,
            seldepth: 0,
            root_depth: 0,
            completed_depth: 0,
            stopped: false,
            iteration_best: None,
        }
    }

    /// Runs iterative deepening until a limit, a stop request or the
    /// maximum depth ends it.
    pub fn run(&mut self) -> SearchOutcome {
        self.tables.tt.new_generation();
        self.tables.tt.age_out(self.params.management.max_entry_age);
        self.tables.eval_cache.new_generation();
        self.tables.history.decay();

        if self.root_moves.is_empty() {
            let score = if self.position.in_check() {
                mated_in(0)
            } else {
                DRAW
            };
            self.report(0, score, ScoreKind::Exact, Vec::new(), None);
            self.wait_for_release();
            return SearchOutcome {
                best_move: None,
                ponder_move: None,
                score: Score::from_internal(score, ScoreKind::Exact),
                depth: 0,
                nodes: self.nodes,
            };
        }

        self.order_root_moves();
        let mut best_move = self.root_moves[0];
        let mut best_score = -INFINITE;
        let mut pv = vec![best_move];
        let mut best_move_changes = 0u32;
        let mut last_change_depth = 1u32;
        let max_depth = self.limits.depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);

        for depth in 1..=max_depth {
            self.root_depth = depth;
            self.seldepth = 0;
            self.iteration_best = None;
            let (score, had_failure) = self.aspiration(depth, best_score);

            if self.stopped {
                match self.iteration_best {
                    Some((m, s)) if m != best_move || self.completed_depth == 0 => {
                        best_move = m;
                        best_score = s;
                        pv = vec![m];
                    }
                    None if self.completed_depth == 0 => {
                        best_score = self.static_score(best_move);
                    }
                    _ => {}
                }
                break;
            }

            let previous_best = best_move;
            let previous_score = best_score;
            if let Some((m, _)) = self.iteration_best {
                best_move = m;
            }
            best_score = score;
            self.completed_depth = depth;
            pv = self.extract_pv(best_move);
            self.report(depth, score, ScoreKind::Exact, pv.clone(), None);
            debug!(
                "Depth {} score {} best {} nodes {}",
                depth,
                score,
                best_move.to_uci(),
                self.nodes
            );

            if self
                .limits
                .mate
                .is_some_and(|moves| score >= MATE_BOUND && (MATE - score + 1) / 2 <= moves as i32)
            {
                break;
            }

            let changed = depth > 1 && best_move != previous_best;
            if changed {
                best_move_changes += 1;
                last_change_depth = depth;
            }
            if !self.time.can_start_iteration() {
                let signals = IterationSignals {
                    depth,
                    best_move_changed: changed,
                    bound_failed: had_failure,
                    score_swing: if depth > 1 { (score - previous_score).abs() } else { 0 },
                    best_move_changes,
                    last_change_depth,
                };
                let unstable = self.time.is_unstable(&signals);
                if !(unstable && self.time.try_extend() && self.time.can_start_iteration()) {
                    break;
                }
                debug!("Extending search time at depth {}", depth);
            }
        }

        self.wait_for_release();

        SearchOutcome {
            best_move: Some(best_move),
            ponder_move: pv.get(1).copied(),
            score: Score::from_internal(best_score, ScoreKind::Exact),
            depth: self.completed_depth,
            nodes: self.nodes,
        }
    }

    /// Searches one depth, re-searching with wider windows until the score
    /// falls inside. Returns the score and whether any re-search happened.
    fn aspiration(&mut self, depth: u32, previous: i32) -> (i32, bool) {
        let params = self.params;
        let sp = &params.search;
        let mut delta = sp.aspiration_delta;
        let max_delta = sp.aspiration_max_delta;
        let (mut alpha, mut beta) = if depth >= sp.aspiration_min_depth && !is_mate(previous) {
            ((previous - delta).max(-INFINITE), (previous + delta).min(INFINITE))
        } else {
            (-INFINITE, INFINITE)
        };
        let mut had_failure = false;

        loop {
            let score = self.search_root(depth as i32 * ONE_PLY, alpha, beta);
            if self.stopped {
                return (score, had_failure);
            }
            if score <= alpha && alpha > -INFINITE {
                had_failure = true;
                self.report(depth, score, ScoreKind::UpperBound, Vec::new(), None);
                debug!("Depth {} failed low at {}", depth, score);
                alpha = (score - delta).max(-INFINITE);
            } else if score >= beta && beta < INFINITE {
                had_failure = true;
                self.report(depth, score, ScoreKind::LowerBound, Vec::new(), None);
                debug!("Depth {} failed high at {}", depth, score);
                beta = (score + delta).min(INFINITE);
            } else {
                return (score, had_failure);
            }
            delta *= 2;
            if delta > max_delta {
                alpha = -INFINITE;
                beta = INFINITE;
            }
        }
    }

    fn search_root(&mut self, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        let original_alpha = alpha;
        let key = self.position.key();
        let single_reply = self.root_moves.len() == 1;
        let mut best_score = -INFINITE;
        let mut best_move = None;

        for index in 0..self.root_moves.len() {
            let m = self.root_moves[index];
            if self.time.elapsed() >= CURRMOVE_DELAY {
                self.report(
                    self.root_depth,
                    best_score.max(alpha),
                    ScoreKind::LowerBound,
                    Vec::new(),
                    Some((m, index as u32 + 1)),
                );
            }

            let gives_check = self.position.gives_check(m);
            let extension = self.extension(m, 0, gives_check, single_reply, false);
            let new_depth = depth - ONE_PLY + extension;
            self.position.make_move(m);
            let score = if index == 0 {
                -self.pvs(new_depth, 1, -beta, -alpha, true)
            } else {
                let mut score = -self.pvs(new_depth, 1, -alpha - 1, -alpha, true);
                if score > alpha && score < beta && !self.stopped {
                    score = -self.pvs(new_depth, 1, -beta, -alpha, true);
                }
                score
            };
            self.position.unmake_move();
            if self.stopped {
                return best_score.max(alpha);
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = Some(m);
                    self.iteration_best = Some((m, score));
                    if score >= beta {
                        break;
                    }
                    alpha = score;
                }
            }
        }

        if let Some(m) = best_move {
            if let Some(pos) = self.root_moves.iter().position(|&r| r == m) {
                let chosen = self.root_moves.remove(pos);
                self.root_moves.insert(0, chosen);
            }
        }
        let bound = bound_for(best_score, original_alpha, beta);
        self.tables.tt.put(key, depth, bound, best_score, best_move, 0);
        best_score
    }

    fn pvs(
        &mut self,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        null_allowed: bool,
    ) -> i32 {
        let pv_node = beta - alpha > 1;
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);
        if self.should_stop() {
            return 0;
        }

        if self.position.is_repetition(ply)
            || self.position.is_fifty_move_draw()
            || self.position.has_insufficient_material()
        {
            return DRAW;
        }

        alpha = alpha.max(mated_in(ply));
        beta = beta.min(mate_in(ply + 1));
        if alpha >= beta {
            return alpha;
        }
        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let key = self.position.key();
        let entry = self.tables.tt.get(key);
        let mut hash_move = entry.and_then(|e| e.best_move());
        if !pv_node {
            if let Some(score) = entry.and_then(|e| e.usable_score(depth, alpha, beta, ply)) {
                return score;
            }
        }

        if depth < ONE_PLY {
            return self.quiescence(ply, alpha, beta, 0);
        }

        let params = self.params;
        let sp = &params.search;
        let in_check = self.position.in_check();
        let original_alpha = alpha;

        if pv_node && hash_move.is_none() && depth >= sp.iid_min_depth as i32 * ONE_PLY {
            let reduced = depth - sp.iid_reduction as i32 * ONE_PLY;
            self.pvs(reduced, ply, alpha, beta, false);
            if self.stopped {
                return 0;
            }
            hash_move = self.tables.tt.get(key).and_then(|e| e.best_move());
        }

        let static_eval = if in_check { -INFINITE } else { self.evaluate() };
        let us = self.position.side_to_move();
        let mut mate_threat = false;

        if null_allowed
            && !pv_node
            && !in_check
            && depth >= sp.null_move_min_depth as i32 * ONE_PLY
            && static_eval >= beta
            && !is_mate(beta)
            && self.position.has_non_pawn_material(us)
        {
            let mut reduction = sp.null_move_reduction as i32 * ONE_PLY;
            if depth >= sp.null_move_deep_depth as i32 * ONE_PLY {
                reduction += ONE_PLY;
            }
            let verify = depth >= sp.null_verification_depth as i32 * ONE_PLY;

            self.position.make_null_move();
            let score = -self.pvs(depth - ONE_PLY - reduction, ply + 1, -beta, -beta + 1, false);
            self.position.unmake_null_move();
            if self.stopped {
                return 0;
            }

            if score >= beta {
                let score = if score >= MATE_BOUND { beta } else { score };
                let proven = !verify || {
                    let verified = self.pvs(depth - reduction, ply, beta - 1, beta, false);
                    if self.stopped {
                        return 0;
                    }
                    verified >= beta
                };
                if proven {
                    self.tables.tt.put(key, depth, Bound::Lower, score, None, ply);
                    return score;
                }
            } else if score <= -MATE_BOUND {
                mate_threat = true;
            }
        }

        let prunable = !pv_node && !in_check && !mate_threat && !is_mate(alpha) && !is_mate(beta);
        if prunable
            && depth > 2 * ONE_PLY
            && depth <= 3 * ONE_PLY
            && static_eval + sp.razor_margin < alpha
        {
            depth -= ONE_PLY;
        }
        let futility_margin = if depth <= ONE_PLY {
            sp.futility_margin_d1
        } else {
            sp.futility_margin_d2
        };
        let futile = prunable && depth <= 2 * ONE_PLY && static_eval + futility_margin <= alpha;

        let mut moves = self.position.generate_moves();
        if moves.is_empty() {
            return if in_check { mated_in(ply) } else { DRAW };
        }
        score_moves(
            &mut moves,
            &self.position,
            hash_move,
            self.killers.get(ply),
            &self.tables.history,
            &self.see_values,
        );

        let single_reply = moves.len() == 1;
        let history_depth = (depth / ONE_PLY).max(1) as u32;
        let mut best_score = -INFINITE;
        let mut best_move = None;
        let mut searched = 0u32;

        let mut index = 0;
        while let Some(m) = moves.pick(index) {
            index += 1;
            let gives_check = self.position.gives_check(m);
            let quiet = m.is_quiet();

            if futile && searched > 0 && quiet && !gives_check {
                best_score = best_score.max(static_eval + futility_margin);
                continue;
            }

            let extension = self.extension(m, ply, gives_check, single_reply, mate_threat);
            let new_depth = depth - ONE_PLY + extension;

            self.position.make_move(m);
            let score = if searched == 0 {
                -self.pvs(new_depth, ply + 1, -beta, -alpha, true)
            } else {
                let reduction = self.reduction(
                    depth,
                    new_depth,
                    searched,
                    pv_node,
                    quiet && !gives_check && !in_check && !self.killers.is_killer(ply, m),
                );
                let mut score =
                    -self.pvs(new_depth - reduction, ply + 1, -alpha - 1, -alpha, true);
                if reduction > 0 && score > alpha && !self.stopped {
                    score = -self.pvs(new_depth, ply + 1, -alpha - 1, -alpha, true);
                }
                if score > alpha && score < beta && !self.stopped {
                    score = -self.pvs(new_depth, ply + 1, -beta, -alpha, true);
                }
                score
            };
            self.position.unmake_move();
            if self.stopped {
                return 0;
            }
            searched += 1;

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = Some(m);
                    if score >= beta {
                        if quiet {
                            self.killers.store(ply, m);
                            self.tables.history.credit(us, m, history_depth);
                        }
                        break;
                    }
                    alpha = score;
                }
            }
            if quiet {
                self.tables.history.debit(us, m, history_depth);
            }
        }

        let bound = bound_for(best_score, original_alpha, beta);
        self.tables.tt.put(key, depth, bound, best_score, best_move, ply);
        best_score
    }

    fn quiescence(&mut self, ply: usize, mut alpha: i32, beta: i32, qply: u32) -> i32 {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);
        if self.should_stop() {
            return 0;
        }
        if self.position.is_repetition(ply)
            || self.position.is_fifty_move_draw()
            || self.position.has_insufficient_material()
        {
            return DRAW;
        }
        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let key = self.position.key();
        let entry = self.tables.tt.get(key);
        if let Some(score) = entry.and_then(|e| e.usable_score(0, alpha, beta, ply)) {
            return score;
        }

        let in_check = self.position.in_check();
        let original_alpha = alpha;
        let mut best_score;
        let stand_pat;
        let mut moves;

        if in_check {
            moves = self.position.generate_moves();
            if moves.is_empty() {
                return mated_in(ply);
            }
            stand_pat = -INFINITE;
            best_score = mated_in(ply);
            score_moves(
                &mut moves,
                &self.position,
                entry.and_then(|e| e.best_move()),
                [Move::NULL; 2],
                &self.tables.history,
                &self.see_values,
            );
        } else {
            stand_pat = self.evaluate();
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            best_score = stand_pat;
            moves = self.position.generate_captures();
            score_captures(&mut moves, &self.see_values);
            if qply < self.params.search.qsearch_check_plies {
                for m in self.position.generate_quiets().iter() {
                    if self.position.gives_check(*m) {
                        moves.push(m.with_score(-1));
                    }
                }
            }
        }

        let delta_margin = self.params.search.delta_margin;
        let mut best_move = None;
        let mut index = 0;
        while let Some(m) = moves.pick(index) {
            index += 1;
            if !in_check && !m.is_quiet() {
                let exchange = see(&self.position, m, &self.see_values);
                if exchange < 0 {
                    continue;
                }
                if !m.is_promotion() && stand_pat + exchange + delta_margin < alpha {
                    continue;
                }
            }

            self.position.make_move(m);
            let score = -self.quiescence(ply + 1, -beta, -alpha, qply + 1);
            self.position.unmake_move();
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = Some(m);
                    if score >= beta {
                        break;
                    }
                    alpha = score;
                }
            }
        }

        let bound = bound_for(best_score, original_alpha, beta);
        self.tables.tt.put(key, 0, bound, best_score, best_move, ply);
        best_score
    }

    /// Extension for `m` in depth units, at most one ply.
    fn extension(
        &self,
        m: Move,
        ply: usize,
        gives_check: bool,
        single_reply: bool,
        mate_threat: bool,
    ) -> i32 {
        if ply as u32 >= 2 * self.root_depth {
            return 0;
        }
        let sp = &self.params.search;
        let mut extension = 0;
        if gives_check {
            extension += sp.check_extension;
        }
        if single_reply {
            extension += sp.single_reply_extension;
        }
        if mate_threat {
            extension += sp.mate_threat_extension;
        }
        let recapture = m.is_capture()
            && self
                .position
                .last_move()
                .is_some_and(|last| last.is_capture() && last.to() == m.to());
        if recapture {
            extension += sp.recapture_extension;
        }
        extension.clamp(0, ONE_PLY)
    }

    /// Late move reduction in depth units.
    fn reduction(
        &self,
        depth: i32,
        new_depth: i32,
        searched: u32,
        pv_node: bool,
        reducible: bool,
    ) -> i32 {
        let sp = &self.params.search;
        if !reducible
            || depth < sp.lmr_min_depth as i32 * ONE_PLY
            || searched < sp.lmr_full_moves
        {
            return 0;
        }
        let mut plies = sp.lmr_reduction as i32;
        if searched >= sp.lmr_deep_moves {
            plies += 1;
        }
        if pv_node {
            plies -= 1;
        }
        (plies * ONE_PLY).min(new_depth - ONE_PLY).max(0)
    }

    /// Static score of playing `m`, for a search stopped before any root
    /// move was resolved.
    fn static_score(&mut self, m: Move) -> i32 {
        self.position.make_move(m);
        let score = -self.evaluate();
        self.position.unmake_move();
        score
    }

    fn evaluate(&mut self) -> i32 {
        let key = self.position.key();
        if let Some(score) = self.tables.eval_cache.get(key) {
            return score;
        }
        let score = self
            .evaluator
            .evaluate(&self.position)
            .clamp(-MATE_BOUND + 1, MATE_BOUND - 1);
        self.tables.eval_cache.put(key, score);
        score
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.controller.is_stop_requested() {
            self.stopped = true;
            return true;
        }
        if self.completed_depth == 0 {
            return false;
        }
        if self.limits.nodes.is_some_and(|limit| self.nodes >= limit) {
            self.stopped = true;
            return true;
        }
        if self.nodes % CLOCK_INTERVAL == 0 {
            if self.time.is_paused() && !self.controller.is_pondering() {
                self.time.start_clock();
            }
            if self.time.time_up() {
                // Out of time before any root move finished this iteration.
                if self.iteration_best.is_none() && self.time.try_extend() {
                    debug!("Extending search time: best move unresolved");
                } else {
                    self.stopped = true;
                }
            }
        }
        self.stopped
    }

    /// Holds an infinite or ponder search until it is released by `stop`,
    /// or by `ponder_hit` for a finite ponder search.
    fn wait_for_release(&self) {
        loop {
            if self.controller.is_stop_requested() {
                return;
            }
            let held = self.limits.infinite || (self.limits.ponder && self.controller.is_pondering());
            if !held {
                return;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Orders the root by a shallow look at each move.
    fn order_root_moves(&mut self) {
        let hash_move = self.tables.tt.get(self.position.key()).and_then(|e| e.best_move());
        let mut list = MoveList::new();
        for &m in &self.root_moves {
            list.push(m);
        }
        score_moves(
            &mut list,
            &self.position,
            hash_move,
            [Move::NULL; 2],
            &self.tables.history,
            &self.see_values,
        );
        self.root_moves.clear();
        let mut index = 0;
        while let Some(m) = list.pick(index) {
            self.root_moves.push(m);
            index += 1;
        }
    }

    /// Follows best moves through the transposition table.
    fn extract_pv(&mut self, first: Move) -> Vec<Move> {
        let max_len = self.params.search.pv_max_length.max(1);
        let mut pv = vec![first];
        self.position.make_move(first);
        while pv.len() < max_len && self.position.repetitions() == 0 {
            let Some(next) = self
                .tables
                .tt
                .get(self.position.key())
                .and_then(|e| e.best_move())
            else {
                break;
            };
            let legal = self.position.generate_moves();
            let Some(&m) = legal.iter().find(|&&m| m == next) else {
                break;
            };
            self.position.make_move(m);
            pv.push(m);
        }
        for _ in 0..pv.len() {
            self.position.unmake_move();
        }
        pv
    }

    fn report(
        &mut self,
        depth: u32,
        score: i32,
        kind: ScoreKind,
        pv: Vec<Move>,
        current_move: Option<(Move, u32)>,
    ) {
        let info = SearchInfo {
            depth,
            seldepth: self.seldepth as u32,
            score: Score::from_internal(score, kind),
            nodes: self.nodes,
            elapsed: self.time.elapsed(),
            current_move,
            pv,
            hashfull: self.tables.tt.hashfull(),
        };
        (self.reporter)(info);
    }
}

fn bound_for(score: i32, alpha: i32, beta: i32) -> Bound {
    if score >= beta {
        Bound::Lower
    } else if score > alpha {
        Bound::Exact
    } else {
        Bound::Upper
    }
}
