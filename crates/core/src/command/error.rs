//! Error types for the command module.

use thiserror::Error;

/// Errors raised while synthesizing a command line.
///
/// File conversions never fail to synthesize; only the streaming entry
/// point has a required argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// A streaming command needs somewhere to send its output.
    #[error("Streaming requires a destination URL")]
    MissingDestination,
}
