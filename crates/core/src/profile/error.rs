//! Error types for the profile module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving profiles.
///
/// All variants are configuration-class: the invocation that hits one
/// aborts before any job runs.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile with this name in the factory directory.
    #[error("Profile '{name}' not found in {dir}")]
    NotFound { name: String, dir: PathBuf },

    /// Factory directory missing or unreadable.
    #[error("Factory directory not readable: {dir}")]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More than one profile watches the source's directory.
    #[error("Ambiguous profile match for {path}: {}", candidates.join(", "))]
    AmbiguousMatch {
        path: PathBuf,
        candidates: Vec<String>,
    },

    /// No profile watches the source's directory.
    #[error("No profile watches the directory of {path}")]
    NoMatch { path: PathBuf },

    /// Watch modes require `ENABLEFACTORY` to be truthy.
    #[error("Profile '{name}' is disabled (ENABLEFACTORY is not set)")]
    Disabled { name: String },

    /// The profile has no `NOTIFYDIRECTORY` to watch.
    #[error("Profile '{name}' has no NOTIFYDIRECTORY")]
    MissingNotifyDirectory { name: String },

    /// I/O error reading a profile file.
    #[error("I/O error reading profile: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    pub fn not_found(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            name: name.into(),
            dir: dir.into(),
        }
    }
}
