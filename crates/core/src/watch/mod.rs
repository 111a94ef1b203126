//! Directory watching.
//!
//! A `WatchLoop` repeatedly scans one profile's notify directory, keeps the
//! files whose [`FileSignature`] changed since they were last dispatched and
//! that have settled, and converts them as one batch. The loop owns its
//! [`WatchState`]; workers never touch it.
//!
//! # Example
//!
//! ```ignore
//! use ffactory_core::watch::{WatchLoop, WatchMode, WatchOptions};
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let mut watcher = WatchLoop::new(profile, engine, WatchOptions::from_config(&config))?;
//! let report = watcher
//!     .run(WatchMode::Interval(Duration::from_secs(30)), shutdown_rx)
//!     .await?;
//! ```

mod error;
mod settle;
mod signature;
mod watcher;

pub use error::WatchError;
pub use settle::is_settled;
pub use signature::{FileSignature, WatchState};
pub use watcher::{run_single, select_candidates, WatchLoop, WatchMode, WatchOptions};
