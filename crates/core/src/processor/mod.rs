//! Job dispatch for the conversion engine.
//!
//! A `WorkerPool` runs jobs through an [`Engine`](crate::engine::Engine)
//! with at most N engine processes alive at once. Each job gets its own
//! conversion log; outcomes are collected into a `BatchReport` in
//! submission order. `WorkerLimits` picks N for a batch from the global
//! worker budget and the profile's codec.
//!
//! # Example
//!
//! ```ignore
//! use ffactory_core::processor::{Job, ProcessorConfig, WorkerLimits, WorkerPool};
//!
//! let workers = WorkerLimits::from_config(&config).workers_for(&profile);
//! let pool = WorkerPool::new(
//!     ProcessorConfig::default()
//!         .with_log_dir(config.log_dir())
//!         .with_max_parallel(workers),
//!     Arc::new(FfmpegEngine::new(&config.engine.path)),
//! );
//!
//! let report = pool.submit_batch(jobs).await;
//! for failure in report.failures() {
//!     eprintln!("{failure}");
//! }
//! ```

mod config;
mod pool;
mod types;

pub use config::{ProcessorConfig, WorkerLimits};
pub use pool::WorkerPool;
pub use types::{BatchReport, Job, JobOutcome, PoolStatus};
