//! The scan, filter and dispatch loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::command::output_path;
use crate::config::Config;
use crate::engine::Engine;
use crate::processor::{BatchReport, Job, JobOutcome, ProcessorConfig, WorkerLimits, WorkerPool};
use crate::profile::{Profile, ProfileError};

use super::error::WatchError;
use super::settle::is_settled;
use super::signature::{FileSignature, WatchState};

/// How long a watch keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// One cycle, then return.
    Once,
    /// Cycle forever, sleeping this long between cycles.
    Interval(Duration),
}

/// Knobs for scanning and dispatching.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Minimum age of a file's mtime before it is picked up.
    pub settle: Duration,
    /// Skip `.`-prefixed files.
    pub skip_hidden: bool,
    /// Case-insensitive extension allow-list; empty accepts everything.
    pub extensions: Vec<String>,
    pub limits: WorkerLimits,
    pub log_dir: PathBuf,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl WatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settle: Duration::from_secs(config.watch.settle_secs),
            skip_hidden: config.watch.skip_hidden,
            extensions: config.watch.extensions.clone(),
            limits: WorkerLimits::from_config(config),
            log_dir: config.log_dir(),
        }
    }

    /// Whether a file name passes the hidden and extension filters.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').to_lowercase() == ext)
    }
}

/// Keeps the files that have changed since their last dispatch and have
/// settled, paired with the signature to record.
pub async fn select_candidates(
    state: &WatchState,
    paths: Vec<PathBuf>,
    settle: Duration,
) -> Vec<(PathBuf, FileSignature)> {
    let mut selected = Vec::new();
    for path in paths {
        let signature = match FileSignature::read(&path).await {
            Ok(sig) => sig,
            Err(WatchError::FileVanished { .. }) => {
                tracing::debug!("Skipping {:?}: vanished", path);
                continue;
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        if state.is_unchanged(&path, &signature) {
            tracing::debug!("Skipping {:?}: already processed", path);
            continue;
        }
        if !is_settled(&path, settle).await {
            tracing::debug!("Skipping {:?}: still settling", path);
            continue;
        }
        selected.push((path, signature));
    }
    selected
}

/// Watches one profile's notify directory and converts what appears there.
pub struct WatchLoop<E: Engine + ?Sized> {
    profile: Arc<Profile>,
    notify_dir: PathBuf,
    options: WatchOptions,
    pool: WorkerPool<E>,
    state: WatchState,
    /// Outputs this loop wrote, as they were right after the run. An output
    /// is fed back in as an input only once something else changes it.
    produced: WatchState,
}

impl<E: Engine + ?Sized + 'static> WatchLoop<E> {
    /// Creates a loop for `profile`, which must be enabled and name a
    /// notify directory.
    pub fn new(profile: Arc<Profile>, engine: Arc<E>, options: WatchOptions) -> Result<Self, WatchError> {
        if !profile.is_enabled() {
            return Err(ProfileError::Disabled {
                name: profile.name().to_string(),
            }
            .into());
        }
        let notify_dir = profile
            .notify_dir()
            .ok_or_else(|| ProfileError::MissingNotifyDirectory {
                name: profile.name().to_string(),
            })?;

        let workers = options.limits.workers_for(&profile);
        let pool = WorkerPool::new(
            ProcessorConfig::default()
                .with_log_dir(options.log_dir.clone())
                .with_max_parallel(workers),
            engine,
        );

        Ok(Self {
            profile,
            notify_dir,
            options,
            pool,
            state: WatchState::new(),
            produced: WatchState::new(),
        })
    }

    pub fn notify_dir(&self) -> &Path {
        &self.notify_dir
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    pub fn pool(&self) -> &WorkerPool<E> {
        &self.pool
    }

    /// Lists the regular files in the notify directory that pass the scan
    /// filters, sorted by path.
    pub async fn scan(&self) -> Result<Vec<PathBuf>, WatchError> {
        let scan_failed = |source| WatchError::ScanFailed {
            dir: self.notify_dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.notify_dir)
            .await
            .map_err(scan_failed)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(scan_failed)? {
            let path = entry.path();
            if !self.options.accepts(&path) {
                continue;
            }
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => files.push(path),
                _ => {}
            }
        }
        files.sort();
        Ok(files)
    }

    /// Runs one full cycle and waits for its batch.
    pub async fn run_cycle(&mut self) -> Result<BatchReport, WatchError> {
        let pruned = self.state.prune().await + self.produced.prune().await;
        if pruned > 0 {
            tracing::debug!("Forgot {} vanished file(s)", pruned);
        }

        let mut found = Vec::new();
        for path in self.scan().await? {
            if self.is_own_output(&path).await {
                tracing::debug!("Skipping {:?}: written by this factory", path);
            } else {
                found.push(path);
            }
        }
        let candidates = select_candidates(&self.state, found, self.options.settle).await;
        if candidates.is_empty() {
            tracing::debug!("Nothing to convert in {:?}", self.notify_dir);
            return Ok(BatchReport::default());
        }

        let mut jobs = Vec::with_capacity(candidates.len());
        let mut outputs = Vec::with_capacity(candidates.len());
        for (path, signature) in candidates {
            let output = self.produced_output(&path);
            let before = FileSignature::read(&output).await.ok();
            outputs.push((output, before));
            self.state.record(path.clone(), signature);
            jobs.push(Job::new(path, Arc::clone(&self.profile)));
        }

        tracing::info!(
            "Factory '{}': {} new file(s) in {:?}",
            self.profile.name(),
            jobs.len(),
            self.notify_dir
        );
        let report = self.pool.submit_batch(jobs).await;

        for (output, before) in outputs {
            let Ok(after) = FileSignature::read(&output).await else {
                continue;
            };
            if before.as_ref() != Some(&after) {
                self.produced.record(output, after);
            }
        }
        Ok(report)
    }

    async fn is_own_output(&self, path: &Path) -> bool {
        if self.produced.get(path).is_none() {
            return false;
        }
        match FileSignature::read(path).await {
            Ok(signature) => self.produced.is_unchanged(path, &signature),
            Err(_) => false,
        }
    }

    /// Runs cycles until `mode` or `shutdown` ends the loop.
    ///
    /// A shutdown request never interrupts a running batch; it is honoured
    /// between cycles and while sleeping. Only a failure of the first cycle
    /// is returned; later scan failures are logged and retried.
    pub async fn run(
        &mut self,
        mode: WatchMode,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<BatchReport, WatchError> {
        let mut report = BatchReport::default();
        let mut cycles = 0u64;

        tracing::info!(
            "Watching {:?} with factory '{}' ({} worker(s))",
            self.notify_dir,
            self.profile.name(),
            self.pool.max_parallel_jobs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.run_cycle().await {
                Ok(batch) => {
                    for failure in batch.failures() {
                        tracing::warn!("{}", failure);
                    }
                    report.merge(batch);
                }
                Err(e) if cycles == 0 => return Err(e),
                Err(e) => tracing::warn!("Watch cycle failed: {}", e),
            }
            cycles += 1;

            let interval = match mode {
                WatchMode::Once => break,
                WatchMode::Interval(interval) => interval,
            };

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        tracing::info!(
            "Watch stopped after {} cycle(s): {} succeeded, {} failed",
            cycles,
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn produced_output(&self, input: &Path) -> PathBuf {
        let output = output_path(&self.profile, input, false);
        if output.is_absolute() {
            output
        } else {
            input
                .parent()
                .map(|dir| dir.join(&output))
                .unwrap_or(output)
        }
    }
}

/// Resolves once shutdown is requested. A dropped sender never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Converts exactly one externally named file, without scanning.
pub async fn run_single<E: Engine + ?Sized + 'static>(
    profile: Arc<Profile>,
    input: &Path,
    engine: Arc<E>,
    options: &WatchOptions,
) -> JobOutcome {
    let workers = options.limits.workers_for(&profile);
    let pool = WorkerPool::new(
        ProcessorConfig::default()
            .with_log_dir(options.log_dir.clone())
            .with_max_parallel(workers),
        engine,
    );

    let mut report = pool.submit_batch(vec![Job::new(input, profile)]).await;
    report
        .outcomes
        .pop()
        .unwrap_or_else(|| JobOutcome::aborted(input, "job produced no outcome"))
}
