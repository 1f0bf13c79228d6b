//! The engine control surface.

use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::info::{SearchInfo, SearchOutcome};
use crate::limits::SearchLimits;
use crate::params::{ParamKind, Parameters};
use crate::search::{SearchController, SearchTables, Searcher};
use chess_core::Move;
use chess_engine::{perft, perft_divide, Position};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

type Subscribers = Arc<Mutex<Vec<Sender<SearchInfo>>>>;

/// A chess engine: a current game, persistent search tables, and at most
/// one running search.
///
/// Searches run on a worker thread that owns the tables until it finishes.
/// Operations that change the game, the tables or the parameters fail with
/// [`EngineError::SearchInProgress`] until the search has been waited for.
pub struct Engine {
    params: Parameters,
    position: Option<Position>,
    tables: Option<SearchTables>,
    worker: Option<JoinHandle<(SearchTables, SearchOutcome)>>,
    controller: SearchController,
    subscribers: Subscribers,
}

impl Engine {
    pub fn new(params: Parameters) -> Self {
        let tables = SearchTables::new(&params.management);
        Engine {
            params,
            position: None,
            tables: Some(tables),
            worker: None,
            controller: SearchController::new(),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Parameters::default())
    }

    /// Starts a new game from the initial position and forgets everything
    /// learned in earlier games.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.position = Some(Position::startpos());
        if let Some(tables) = self.tables.as_mut() {
            tables.clear();
        }
        debug!("New game");
        Ok(())
    }

    /// Replaces the current position. On error the old position is kept.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let position = Position::from_fen(fen).map_err(|e| {
            warn!("Rejected position {:?}: {}", fen, e);
            EngineError::from(e)
        })?;
        self.position = Some(position);
        Ok(())
    }

    /// Plays a move given in coordinate notation.
    pub fn play(&mut self, uci: &str) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let position = self.position.as_mut().ok_or(EngineError::NoPosition)?;
        let Some(m) = position.find_move(uci) else {
            warn!("Rejected move {:?}", uci);
            return Err(EngineError::IllegalMove(uci.to_string()));
        };
        position.make_move(m);
        Ok(())
    }

    pub fn undo_last_move(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let position = self.position.as_mut().ok_or(EngineError::NoPosition)?;
        if position.history_len() == 0 {
            return Err(EngineError::NothingToUndo);
        }
        position.unmake_move();
        Ok(())
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Static evaluation of the current position for the side to move.
    pub fn evaluate(&self) -> Result<i32, EngineError> {
        let position = self.position.as_ref().ok_or(EngineError::NoPosition)?;
        Ok(Evaluator::new(&self.params.eval).evaluate(position))
    }

    /// Starts a search in the background. Progress goes to subscribers;
    /// the result comes from [`Engine::wait`].
    pub fn go(&mut self, limits: SearchLimits) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let position = self.position.clone().ok_or(EngineError::NoPosition)?;
        let mut root_moves = Vec::with_capacity(limits.search_moves.len());
        for uci in &limits.search_moves {
            let m = position.find_move(uci).ok_or_else(|| {
                warn!("Rejected search move {:?}", uci);
                EngineError::IllegalMove(uci.clone())
            })?;
            root_moves.push(m);
        }
        let Some(mut tables) = self.tables.take() else {
            return Err(EngineError::SearchInProgress);
        };

        let params = self.params.clone();
        tables.configure(&params.management);
        self.controller.reset(limits.ponder);
        let controller = self.controller.clone();
        let subscribers = Arc::clone(&self.subscribers);
        info!("Starting search: {}", describe(&limits));

        let handle = thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                let mut publish = |info: SearchInfo| {
                    if let Ok(mut subscribers) = subscribers.lock() {
                        subscribers.retain(|tx| tx.send(info.clone()).is_ok());
                    }
                };
                let outcome = Searcher::new(
                    &position,
                    &params,
                    &mut tables,
                    controller,
                    &limits,
                    &root_moves,
                    &mut publish,
                )
                .run();
                (tables, outcome)
            });

        match handle {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to start search thread: {}", e);
                self.tables = Some(SearchTables::new(&self.params.management));
                Err(EngineError::SearchFailed)
            }
        }
    }

    /// Blocks until the running search finishes and returns its result.
    /// Returns `None` if no search was started or the worker failed.
    pub fn wait(&mut self) -> Option<SearchOutcome> {
        let handle = self.worker.take()?;
        match handle.join() {
            Ok((tables, outcome)) => {
                self.tables = Some(tables);
                info!(
                    "Search finished: best {} score {} depth {} nodes {}",
                    outcome.best_move.map_or_else(|| "(none)".to_string(), |m| m.to_uci()),
                    outcome.score,
                    outcome.depth,
                    outcome.nodes
                );
                Some(outcome)
            }
            Err(_) => {
                warn!("Search thread panicked; tables reset");
                self.tables = Some(SearchTables::new(&self.params.management));
                None
            }
        }
    }

    /// Runs a search to completion on the calling thread's behalf.
    pub fn search(&mut self, limits: SearchLimits) -> Result<SearchOutcome, EngineError> {
        self.go(limits)?;
        self.wait().ok_or(EngineError::SearchFailed)
    }

    pub fn is_searching(&self) -> bool {
        self.worker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn stop(&self) {
        self.controller.stop();
    }

    pub fn ponder_hit(&self) {
        self.controller.ponder_hit();
    }

    /// A handle for stopping the search from another thread.
    pub fn controller(&self) -> SearchController {
        self.controller.clone()
    }

    /// Receives every [`SearchInfo`] published from now on.
    pub fn subscribe(&self) -> Receiver<SearchInfo> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Replaces every parameter at once. Takes effect at the next search.
    pub fn set_parameters(&mut self, params: Parameters) -> Result<(), EngineError> {
        self.ensure_idle()?;
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<Value, EngineError> {
        Ok(self.params.get(name)?)
    }

    pub fn set_parameter(&mut self, name: &str, value: Value) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.params.set(name, value).map_err(|e| {
            warn!("Rejected parameter {}: {}", name, e);
            EngineError::from(e)
        })
    }

    pub fn parameter_names(&self, kind: ParamKind) -> Vec<String> {
        self.params.names(kind)
    }

    pub fn perft(&self, depth: u32) -> Result<u64, EngineError> {
        let mut position = self.position.clone().ok_or(EngineError::NoPosition)?;
        Ok(perft(&mut position, depth))
    }

    /// Leaf counts per root move, in generation order.
    pub fn divide(&self, depth: u32) -> Result<Vec<(String, u64)>, EngineError> {
        let mut position = self.position.clone().ok_or(EngineError::NoPosition)?;
        Ok(perft_divide(&mut position, depth))
    }

    /// Finds `uci` among the legal moves of the current position.
    pub fn find_move(&self, uci: &str) -> Result<Move, EngineError> {
        let position = self.position.as_ref().ok_or(EngineError::NoPosition)?;
        position
            .find_move(uci)
            .ok_or_else(|| EngineError::IllegalMove(uci.to_string()))
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.worker.is_some() {
            Err(EngineError::SearchInProgress)
        } else {
            Ok(())
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.controller.stop();
            let _ = handle.join();
        }
    }
}

fn describe(limits: &SearchLimits) -> String {
    let mut parts = Vec::new();
    if limits.infinite {
        parts.push("infinite".to_string());
    }
    if limits.ponder {
        parts.push("ponder".to_string());
    }
    if let Some(depth) = limits.depth {
        parts.push(format!("depth {}", depth));
    }
    if let Some(nodes) = limits.nodes {
        parts.push(format!("nodes {}", nodes));
    }
    if let Some(mate) = limits.mate {
        parts.push(format!("mate {}", mate));
    }
    if let Some(time) = limits.move_time {
        parts.push(format!("movetime {}ms", time.as_millis()));
    }
    if let Some(time) = limits.white_time {
        parts.push(format!("wtime {}ms", time.as_millis()));
    }
    if let Some(time) = limits.black_time {
        parts.push(format!("btime {}ms", time.as_millis()));
    }
    if parts.is_empty() {
        "unbounded".to_string()
    } else {
        parts.join(" ")
    }
}
