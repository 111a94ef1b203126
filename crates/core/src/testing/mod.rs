//! Testing utilities and mock implementations.
//!
//! `MockEngine` stands in for the external transcoding engine so pools and
//! watch loops can be exercised without ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ffactory_core::testing::{fixtures, MockEngine};
//!
//! let engine = MockEngine::new();
//! let dir = tempfile::TempDir::new()?;
//! fixtures::write_profile(dir.path(), "x264", &[("VIDEOCODECS", "libx264")])?;
//! ```

mod mock_engine;

pub use mock_engine::MockEngine;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Write a profile file named `name` into `dir` from key/value pairs.
    pub fn write_profile(dir: &Path, name: &str, pairs: &[(&str, &str)]) -> std::io::Result<PathBuf> {
        let text: String = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect();
        let path = dir.join(name);
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Write a media file of `size` bytes.
    pub fn write_media(dir: &Path, name: &str, size: usize) -> std::io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; size])?;
        Ok(path)
    }
}
