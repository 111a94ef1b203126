//! Error types for the engine module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the engine from producing an exit code.
///
/// A non-zero exit is not an error at this level; it is reported through
/// [`EngineExit`](super::EngineExit) so the caller can keep the log.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine binary not found.
    #[error("Engine not found at path: {path}")]
    EngineNotFound { path: PathBuf },

    /// Engine exists but `-version` failed.
    #[error("Engine at {path} is not usable: {reason}")]
    Unusable { path: PathBuf, reason: String },

    /// I/O error while running the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
