//! Error types for the todo store and command loop.

use thiserror::Error;

/// Errors surfaced to the user at the command boundary.
///
/// Only `Decode` is fatal, and only while loading the store at startup;
/// everything else is reported and the loop re-prompts.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("failed to decode task file: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Persist(#[from] std::io::Error),

    #[error("invalid id \"{0}\", enter a positive number")]
    InvalidId(String),

    #[error("no task with id {0}")]
    NotFound(u32),

    #[error("{0}")]
    InvalidUsage(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, TodoError>;
