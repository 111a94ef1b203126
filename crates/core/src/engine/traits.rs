//! Trait definitions for the engine module.

use async_trait::async_trait;
use std::path::PathBuf;

use super::error::EngineError;

/// Everything needed to run the engine once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    /// Source file (or stream label) this run belongs to.
    pub input: PathBuf,
    /// Synthesized arguments, without the program name.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub work_dir: PathBuf,
    /// Append-only log receiving the engine's combined output.
    pub log_path: PathBuf,
}

/// How an engine run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Output lines written to the log.
    pub output_lines: usize,
}

impl EngineExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// An external transcoding engine.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Renders the full command line for logs and dry runs.
    fn command_line(&self, args: &[String]) -> String;

    /// Runs the engine to completion.
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError>;

    /// Validates that the engine is installed and runnable.
    async fn validate(&self) -> Result<(), EngineError>;
}
