//! Evaluation and search on top of `chess-engine`.
//!
//! This crate provides:
//! - [`Parameters`] - every tunable in three sections, loadable from TOML
//! - [`Evaluator`] - tapered static evaluation
//! - [`see`] - static exchange evaluation
//! - [`TranspositionTable`] and [`EvalCache`] - hash tables shared across searches
//! - [`Searcher`] - iterative-deepening principal variation search
//! - [`Engine`] - game state, a background search thread and progress reports
//!
//! # Example
//!
//! ```
//! use chess_search::{Engine, SearchLimits};
//!
//! let mut engine = Engine::with_defaults();
//! engine.set_position("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
//! let outcome = engine.search(SearchLimits::depth(3)).unwrap();
//! assert_eq!(outcome.best_move.unwrap().to_uci(), "a1a8");
//! assert_eq!(outcome.score.to_string(), "mate 1");
//! ```

mod engine;
mod error;
pub mod eval;
pub mod eval_cache;
mod info;
mod limits;
pub mod ordering;
pub mod params;
pub mod score;
pub mod search;
pub mod see;
pub mod time;
pub mod tt;

pub use engine::Engine;
pub use error::{EngineError, ParamError};
pub use eval::Evaluator;
pub use eval_cache::EvalCache;
pub use info::{SearchInfo, SearchOutcome};
pub use limits::SearchLimits;
pub use params::{ParamKind, Parameters};
pub use score::{Score, ScoreKind};
pub use search::{SearchController, SearchTables, Searcher};
pub use see::see;
pub use time::{IterationSignals, TimeManager};
pub use tt::{Bound, TranspositionTable, TtEntry};
