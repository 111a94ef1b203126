//! Settlement check for files that may still be written.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Whether `path` has not been modified for at least `min_age`.
///
/// A missing file, or one whose modification time lies in the future, is
/// never settled.
pub async fn is_settled(path: &Path, min_age: Duration) -> bool {
    let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    settled_at(modified, SystemTime::now(), min_age)
}

fn settled_at(modified: SystemTime, now: SystemTime, min_age: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age >= min_age,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_settled_at() {
        let now = SystemTime::now();
        assert!(settled_at(now - HOUR, now, Duration::from_secs(10)));
        assert!(!settled_at(now - Duration::from_secs(5), now, Duration::from_secs(10)));
        assert!(settled_at(now, now, Duration::ZERO));
        assert!(!settled_at(now + HOUR, now, Duration::ZERO));
    }

    #[tokio::test]
    async fn test_fresh_file_not_settled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.mov");
        std::fs::write(&path, b"x").unwrap();
        assert!(!is_settled(&path, HOUR).await);
    }

    #[tokio::test]
    async fn test_old_file_settled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.mov");
        let file = std::fs::File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - 2 * HOUR).unwrap();
        assert!(is_settled(&path, HOUR).await);
    }

    #[tokio::test]
    async fn test_missing_file_not_settled() {
        let temp = TempDir::new().unwrap();
        assert!(!is_settled(&temp.path().join("gone"), Duration::ZERO).await);
    }
}
