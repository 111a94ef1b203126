//! Content identity of discovered files.

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use super::error::WatchError;

/// Identity of a file's content as seen by the filesystem.
///
/// Two signatures are equal only if device, inode, modification time and
/// size all match; any difference means the file must be processed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileSignature {
    pub dev: u64,
    pub ino: u64,
    pub mtime_ns: i128,
    pub size: u64,
}

impl FileSignature {
    /// Reads the signature of `path`.
    pub async fn read(path: &Path) -> Result<Self, WatchError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(Self::from_metadata(&meta)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(WatchError::vanished(path))
            }
            Err(e) => Err(WatchError::Io(e)),
        }
    }

    #[cfg(unix)]
    pub fn from_metadata(meta: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            dev: meta.dev(),
            ino: meta.ino(),
            mtime_ns: meta.mtime() as i128 * 1_000_000_000 + meta.mtime_nsec() as i128,
            size: meta.size(),
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(meta: &Metadata) -> Self {
        let mtime_ns = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos() as i128)
            .unwrap_or_default();

        Self {
            dev: 0,
            ino: 0,
            mtime_ns,
            size: meta.len(),
        }
    }
}

/// Last signature seen for every path the loop has dispatched.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    seen: HashMap<PathBuf, FileSignature>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileSignature> {
        self.seen.get(path)
    }

    /// Whether `path` was already dispatched with exactly this signature.
    pub fn is_unchanged(&self, path: &Path, signature: &FileSignature) -> bool {
        self.seen.get(path) == Some(signature)
    }

    pub fn record(&mut self, path: PathBuf, signature: FileSignature) {
        self.seen.insert(path, signature);
    }

    /// Drops entries whose path no longer exists. Returns how many went.
    pub async fn prune(&mut self) -> usize {
        let mut gone = Vec::new();
        for path in self.seen.keys() {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                gone.push(path.clone());
            }
        }
        for path in &gone {
            self.seen.remove(path);
        }
        gone.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_signature_stable_for_unchanged_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.mov");
        std::fs::write(&path, b"12345").unwrap();

        let first = FileSignature::read(&path).await.unwrap();
        let second = FileSignature::read(&path).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.size, 5);
    }

    #[tokio::test]
    async fn test_signature_changes_with_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.mov");
        std::fs::write(&path, b"12345").unwrap();
        let before = FileSignature::read(&path).await.unwrap();

        std::fs::write(&path, b"1234567890").unwrap();
        let after = FileSignature::read(&path).await.unwrap();
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_missing_file_vanished() {
        let temp = TempDir::new().unwrap();
        let err = FileSignature::read(&temp.path().join("gone.mov"))
            .await
            .unwrap_err();
        assert!(matches!(err, WatchError::FileVanished { .. }));
    }

    #[test]
    fn test_any_field_differs() {
        let base = FileSignature {
            dev: 1,
            ino: 2,
            mtime_ns: 3,
            size: 4,
        };
        assert_ne!(base, FileSignature { dev: 9, ..base });
        assert_ne!(base, FileSignature { ino: 9, ..base });
        assert_ne!(base, FileSignature { mtime_ns: 9, ..base });
        assert_ne!(base, FileSignature { size: 9, ..base });
    }

    #[tokio::test]
    async fn test_state_record_and_prune() {
        let temp = TempDir::new().unwrap();
        let kept = temp.path().join("kept.mov");
        let removed = temp.path().join("removed.mov");
        std::fs::write(&kept, b"a").unwrap();
        std::fs::write(&removed, b"b").unwrap();

        let mut state = WatchState::new();
        for path in [&kept, &removed] {
            let sig = FileSignature::read(path).await.unwrap();
            state.record(path.clone(), sig);
        }
        assert_eq!(state.len(), 2);

        let sig = FileSignature::read(&kept).await.unwrap();
        assert!(state.is_unchanged(&kept, &sig));

        std::fs::remove_file(&removed).unwrap();
        assert_eq!(state.prune().await, 1);
        assert!(state.get(&removed).is_none());
        assert!(state.get(&kept).is_some());
    }
}
