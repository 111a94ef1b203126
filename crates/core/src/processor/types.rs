//! Types for the processor module.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::profile::Profile;

/// One file to convert with one profile.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub profile: Arc<Profile>,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, profile: Arc<Profile>) -> Self {
        Self {
            input: input.into(),
            profile,
        }
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    /// Source file (or stream destination) of the job.
    pub input: PathBuf,
    /// Engine exit code; `None` if the engine never produced one.
    pub exit_code: Option<i32>,
    /// Conversion log, `None` once deleted after a successful run.
    pub log_path: Option<PathBuf>,
    /// Why the engine could not be run at all.
    pub error: Option<String>,
    /// Wall-clock duration of the job.
    pub duration_ms: u64,
    /// Stream destination, reported in full instead of a file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

impl JobOutcome {
    /// An outcome for a job whose worker never reported back.
    pub fn aborted(input: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            exit_code: None,
            log_path: None,
            error: Some(error.into()),
            duration_ms: 0,
            destination: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }

    fn label(&self) -> String {
        if let Some(destination) = &self.destination {
            return destination.clone();
        }
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded() {
            return write!(f, "ok      {}", self.label());
        }

        write!(f, "FAILED  {}", self.label())?;
        match (&self.error, self.exit_code) {
            (Some(error), _) => write!(f, " ({error})")?,
            (None, Some(code)) => write!(f, " (exit code {code})")?,
            (None, None) => write!(f, " (terminated by signal)")?,
        }
        if let Some(log) = &self.log_path {
            write!(f, ", see {}", log.display())?;
        }
        Ok(())
    }
}

/// Outcomes of one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<JobOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Appends another batch's outcomes.
    pub fn merge(&mut self, other: BatchReport) {
        self.outcomes.extend(other.outcomes);
    }
}

/// Snapshot of a pool's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub max_concurrent: usize,
    pub active_jobs: usize,
    pub peak_active: usize,
    pub total_succeeded: u64,
    pub total_failed: u64,
}
