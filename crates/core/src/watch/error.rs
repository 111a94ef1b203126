//! Error types for the watch module.

use std::path::PathBuf;
use thiserror::Error;

use crate::profile::ProfileError;

#[derive(Debug, Error)]
pub enum WatchError {
    /// The file disappeared between discovery and inspection.
    #[error("File vanished: {path}")]
    FileVanished { path: PathBuf },

    /// The notify directory could not be listed.
    #[error("Failed to scan {dir}: {source}")]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile cannot drive a watch.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    pub fn vanished(path: impl Into<PathBuf>) -> Self {
        Self::FileVanished { path: path.into() }
    }
}
