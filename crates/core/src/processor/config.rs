//! Configuration for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{default_accelerator_codecs, Config, WorkersConfig};
use crate::engine::is_accelerated;
use crate::profile::{keys, Profile};

/// Configuration for a worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Maximum parallel engine runs.
    #[serde(default = "default_max_parallel")]
    pub max_parallel_jobs: usize,

    /// Directory receiving per-input conversion logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_max_parallel() -> usize {
    2
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("ffactory-logs")
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_parallel_jobs: default_max_parallel(),
            log_dir: default_log_dir(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the log directory.
    pub fn with_log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = log_dir;
        self
    }

    /// Sets the maximum parallel jobs (at least 1).
    pub fn with_max_parallel(mut self, max: usize) -> Self {
        self.max_parallel_jobs = max.max(1);
        self
    }
}

/// Decides how many workers a profile's batch gets.
///
/// Accelerated encodes share the (usually small) GPU budget, everything
/// else the CPU budget. A profile may override either budget with
/// `CPUCONCURRENCY`/`GPUCONCURRENCY`; an explicit caller override beats
/// both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerLimits {
    pub cpu: usize,
    pub gpu: usize,
    pub accelerator_codecs: Vec<String>,
    pub override_workers: Option<usize>,
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self::from_workers_config(&WorkersConfig::default())
    }
}

impl WorkerLimits {
    pub fn from_workers_config(workers: &WorkersConfig) -> Self {
        let accelerator_codecs = if workers.accelerator_codecs.is_empty() {
            default_accelerator_codecs()
        } else {
            workers.accelerator_codecs.clone()
        };
        Self {
            cpu: workers.cpu,
            gpu: workers.gpu,
            accelerator_codecs,
            override_workers: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::from_workers_config(&config.workers)
    }

    /// Caller override that takes precedence over every other limit.
    pub fn with_override(mut self, workers: Option<usize>) -> Self {
        self.override_workers = workers;
        self
    }

    /// Whether `profile` encodes video on a hardware accelerator.
    pub fn is_accelerated(&self, profile: &Profile) -> bool {
        is_accelerated(profile.get(keys::VIDEO_CODECS), &self.accelerator_codecs)
    }

    /// Worker count for a batch converted with `profile`, never below 1.
    pub fn workers_for(&self, profile: &Profile) -> usize {
        if let Some(n) = self.override_workers {
            return n.max(1);
        }

        let limit = if self.is_accelerated(profile) {
            profile.count(keys::GPU_CONCURRENCY).unwrap_or(self.gpu)
        } else {
            profile.count(keys::CPU_CONCURRENCY).unwrap_or(self.cpu)
        };
        limit.max(1)
    }
}
