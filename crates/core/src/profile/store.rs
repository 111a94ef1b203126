//! Directory-backed profile store.

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::error::ProfileError;
use super::types::{Profile, ProfileDescriptor};

/// Reads factory profiles from a directory, one file per profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the profile called `name`.
    pub fn load(&self, name: &str) -> Result<Profile, ProfileError> {
        if !is_plain_name(name) {
            return Err(ProfileError::not_found(name, &self.dir));
        }

        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(ProfileError::not_found(name, &self.dir));
        }

        Self::load_path(name, &path)
    }

    fn load_path(name: &str, path: &Path) -> Result<Profile, ProfileError> {
        let text = fs::read_to_string(path)?;
        let profile = Profile::parse(name, &text);
        tracing::debug!("Loaded profile '{}' ({} keys)", name, profile.len());
        Ok(profile)
    }

    /// Lists every regular file in the factory directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<ProfileDescriptor>, ProfileError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| {
            ProfileError::DirectoryUnreadable {
                dir: self.dir.clone(),
                source,
            }
        })?;

        let mut descriptors = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            descriptors.push(ProfileDescriptor { name, path });
        }

        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(descriptors)
    }

    /// Finds the single profile whose `NOTIFYDIRECTORY` is the directory
    /// containing `source`.
    ///
    /// Both sides are canonicalized before comparison. Profiles whose
    /// notify directory is unset or does not resolve are skipped. Two or
    /// more matches is an error: the caller has to name the profile.
    pub fn auto_match(&self, source: &Path) -> Result<Profile, ProfileError> {
        let parent = match source.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let source_dir = fs::canonicalize(&parent).map_err(|_| ProfileError::NoMatch {
            path: source.to_path_buf(),
        })?;

        let mut matches = Vec::new();
        for descriptor in self.discover()? {
            let profile = match Self::load_path(&descriptor.name, &descriptor.path) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Skipping unreadable profile {:?}: {}", descriptor.path, e);
                    continue;
                }
            };

            let Some(notify_dir) = profile.notify_dir() else {
                continue;
            };
            let Ok(resolved) = fs::canonicalize(&notify_dir) else {
                tracing::debug!(
                    "Profile '{}' notify directory {:?} does not resolve",
                    profile.name(),
                    notify_dir
                );
                continue;
            };

            if resolved == source_dir {
                matches.push(profile);
            }
        }

        match matches.len() {
            0 => Err(ProfileError::NoMatch {
                path: source.to_path_buf(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(ProfileError::AmbiguousMatch {
                path: source.to_path_buf(),
                candidates: matches.iter().map(|p| p.name().to_string()).collect(),
            }),
        }
    }
}

/// A profile name must be a single path component.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
