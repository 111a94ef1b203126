//! Bounded worker pool running the engine once per job.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;

use crate::command::{synthesize, synthesize_streaming, CommandError};
use crate::config::absolute_path;
use crate::engine::{Engine, EngineInvocation};
use crate::profile::{keys, Profile};

use super::config::ProcessorConfig;
use super::types::{BatchReport, Job, JobOutcome, PoolStatus};

/// Tracks statistics for a pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicUsize,
    peak_active: AtomicUsize,
    total_succeeded: AtomicU64,
    total_failed: AtomicU64,
}

impl PoolStats {
    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self, succeeded: bool) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        if succeeded {
            self.total_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.total_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn to_status(&self, max_concurrent: usize) -> PoolStatus {
        PoolStatus {
            max_concurrent,
            active_jobs: self.active.load(Ordering::SeqCst),
            peak_active: self.peak_active.load(Ordering::SeqCst),
            total_succeeded: self.total_succeeded.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }
}

/// A fully resolved engine run.
struct Execution {
    input: PathBuf,
    args: Vec<String>,
    work_dir: PathBuf,
    log_path: PathBuf,
    destination: Option<String>,
    /// Profile whose cleanup flags apply on success; `None` disables cleanup.
    cleanup: Option<Arc<Profile>>,
}

/// Runs engine jobs with at most `max_parallel_jobs` at a time.
pub struct WorkerPool<E: Engine + ?Sized> {
    config: ProcessorConfig,
    engine: Arc<E>,
    semaphore: Arc<Semaphore>,
    stats: Arc<PoolStats>,
}

impl<E: Engine + ?Sized + 'static> WorkerPool<E> {
    /// Creates a new pool sharing `engine`.
    pub fn new(config: ProcessorConfig, engine: Arc<E>) -> Self {
        let config = ProcessorConfig {
            max_parallel_jobs: config.max_parallel_jobs.max(1),
            ..config
        };
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_jobs));

        Self {
            config,
            engine,
            semaphore,
            stats: Arc::new(PoolStats::default()),
        }
    }

    pub fn max_parallel_jobs(&self) -> usize {
        self.config.max_parallel_jobs
    }

    /// Returns the current pool counters.
    pub fn status(&self) -> PoolStatus {
        self.stats.to_status(self.config.max_parallel_jobs)
    }

    /// Runs every job and waits for all of them.
    ///
    /// Outcomes come back in submission order. A failing job never affects
    /// its siblings.
    pub async fn submit_batch(&self, jobs: Vec<Job>) -> BatchReport {
        if jobs.is_empty() {
            return BatchReport::default();
        }

        tracing::info!(
            "Dispatching batch of {} job(s) over {} worker(s)",
            jobs.len(),
            self.config.max_parallel_jobs
        );

        let mut inputs = Vec::with_capacity(jobs.len());
        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let execution = self.conversion(job);
            inputs.push(execution.input.clone());
            handles.push(self.spawn(execution));
        }

        let results = join_all(handles).await;
        let outcomes = results
            .into_iter()
            .zip(inputs)
            .map(|(result, input)| {
                result.unwrap_or_else(|e| {
                    tracing::error!("Worker for {:?} aborted: {}", input, e);
                    JobOutcome::aborted(input, format!("worker aborted: {e}"))
                })
            })
            .collect();

        let report = BatchReport::new(outcomes);
        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Converts `input` in preview mode: output goes to `output.<ext>` in
    /// `out_dir` and the cleanup flags are ignored.
    pub async fn run_preview(&self, profile: Arc<Profile>, input: &Path, out_dir: &Path) -> JobOutcome {
        let input = absolute_path(input);
        let execution = Execution {
            args: synthesize(&profile, &input, true),
            work_dir: absolute_path(out_dir),
            log_path: self.log_path(&format!("{}.preview", file_label(&input))),
            input,
            destination: None,
            cleanup: None,
        };
        self.run_now(execution).await
    }

    /// Runs a streaming invocation to `destination`.
    pub async fn run_stream(
        &self,
        profile: Arc<Profile>,
        video_input: &str,
        audio_input: Option<&str>,
        destination: Option<&str>,
    ) -> Result<JobOutcome, CommandError> {
        let args = synthesize_streaming(&profile, video_input, audio_input, destination)?;
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let execution = Execution {
            input: PathBuf::from(destination.unwrap_or_default()),
            args,
            work_dir,
            log_path: self.log_path(&format!("stream-{}", profile.name())),
            destination: destination.map(str::to_string),
            cleanup: None,
        };
        Ok(self.run_now(execution).await)
    }

    async fn run_now(&self, execution: Execution) -> JobOutcome {
        let input = execution.input.clone();
        let destination = execution.destination.clone();
        match self.spawn(execution).await {
            Ok(outcome) => outcome,
            Err(e) => JobOutcome {
                destination,
                ..JobOutcome::aborted(input, format!("worker aborted: {e}"))
            },
        }
    }

    fn spawn(&self, execution: Execution) -> tokio::task::JoinHandle<JobOutcome> {
        let engine = Arc::clone(&self.engine);
        let semaphore = Arc::clone(&self.semaphore);
        let stats = Arc::clone(&self.stats);
        let log_dir = self.config.log_dir.clone();

        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            stats.enter();
            let outcome = execute(engine.as_ref(), &log_dir, execution).await;
            stats.leave(outcome.succeeded());
            outcome
        })
    }

    /// The engine runs inside the output directory, so the input is made
    /// absolute before it lands on the command line.
    fn conversion(&self, job: Job) -> Execution {
        let input = absolute_path(&job.input);
        let args = synthesize(&job.profile, &input, false);
        let work_dir = job
            .profile
            .output_dir()
            .unwrap_or_else(|| parent_dir(&input));
        Execution {
            log_path: self.log_path(&file_label(&input)),
            input,
            args,
            work_dir,
            destination: None,
            cleanup: Some(job.profile),
        }
    }

    fn log_path(&self, label: &str) -> PathBuf {
        self.config.log_dir.join(format!("{label}.log"))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "input".to_string())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Appends a marker line to the log. Best-effort.
async fn append_marker(log_path: &Path, text: &str) {
    let result = async {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .await?;
        file.write_all(text.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
    .await;

    if let Err(e) = result {
        tracing::warn!("Failed to write conversion log {:?}: {}", log_path, e);
    }
}

async fn remove_best_effort(path: &Path, what: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Deleted {} {:?}", what, path),
        Err(e) => tracing::warn!("Failed to delete {} {:?}: {}", what, path, e),
    }
}

async fn execute<E: Engine + ?Sized>(engine: &E, log_dir: &Path, execution: Execution) -> JobOutcome {
    let start = Instant::now();
    let Execution {
        input,
        args,
        work_dir,
        log_path,
        destination,
        cleanup,
    } = execution;

    if let Err(e) = tokio::fs::create_dir_all(log_dir).await {
        tracing::warn!("Failed to create log directory {:?}: {}", log_dir, e);
    }
    if let Err(e) = tokio::fs::create_dir_all(&work_dir).await {
        tracing::warn!("Failed to create output directory {:?}: {}", work_dir, e);
    }

    let command_line = engine.command_line(&args);
    append_marker(
        &log_path,
        &format!("=== {} {}", chrono::Local::now().to_rfc3339(), command_line),
    )
    .await;

    tracing::info!("Converting {:?}", input);
    tracing::debug!("Command: {}", command_line);

    let invocation = EngineInvocation {
        input: input.clone(),
        args,
        work_dir,
        log_path: log_path.clone(),
    };

    let (exit_code, error) = match engine.run(&invocation).await {
        Ok(exit) => {
            append_marker(&log_path, &format!("=== exit code {:?}", exit.code)).await;
            (exit.code, None)
        }
        Err(e) => {
            append_marker(&log_path, &format!("=== engine failed: {e}")).await;
            (None, Some(e.to_string()))
        }
    };

    let mut outcome = JobOutcome {
        input,
        exit_code,
        log_path: Some(log_path),
        error,
        duration_ms: start.elapsed().as_millis() as u64,
        destination,
    };

    if !outcome.succeeded() {
        tracing::error!("{}", outcome);
        return outcome;
    }

    tracing::info!("Converted {:?} in {} ms", outcome.input, outcome.duration_ms);

    if let Some(profile) = cleanup {
        if profile.flag(keys::DELETE_CONVERSION_LOGS) {
            if let Some(log_path) = outcome.log_path.take() {
                remove_best_effort(&log_path, "conversion log").await;
            }
        }
        if profile.flag(keys::DELETE_SOURCE) {
            remove_best_effort(&outcome.input, "source").await;
        }
    }

    outcome
}
