//! Error types for the engine control surface and parameter handling.

use chess_engine::PositionError;
use thiserror::Error;

/// Errors from loading, reading or writing engine parameters.
#[derive(Error, Debug)]
pub enum ParamError {
    /// Failed to read a parameter file from disk.
    #[error("Failed to read parameter file: {0}")]
    Read(#[from] std::io::Error),
    /// The parameter file is not valid TOML for [`crate::Parameters`].
    #[error("Failed to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),
    /// The parameters could not be written back out as TOML.
    #[error("Failed to serialize parameters: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// No parameter with this dotted name exists.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    /// The new value does not have the type of the parameter it replaces.
    #[error("Parameter {name} expects {expected}")]
    TypeMismatch { name: String, expected: String },
    /// The parameter tree could not be converted to or from JSON values.
    #[error("Invalid parameter tree: {0}")]
    Invalid(#[from] serde_json::Error),
    /// The value has the right type but is outside the accepted range.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Errors returned by [`crate::Engine`] operations.
///
/// Malformed input never changes engine state.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The operation needs a position and none has been set yet.
    #[error("No position has been set")]
    NoPosition,
    /// The operation cannot run while a search is active.
    #[error("A search is already running")]
    SearchInProgress,
    /// The move is malformed or not legal in the current position.
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    /// There is no move to take back.
    #[error("No move to undo")]
    NothingToUndo,
    /// The position string was rejected.
    #[error("Invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
    /// A parameter operation failed.
    #[error(transparent)]
    Parameter(#[from] ParamError),
    /// The search worker terminated without producing a result.
    #[error("Search worker failed")]
    SearchFailed,
}
