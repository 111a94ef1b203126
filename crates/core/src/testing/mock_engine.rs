//! Mock engine for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::command::join_words;
use crate::engine::{Engine, EngineError, EngineExit, EngineInvocation};

/// Mock implementation of the Engine trait.
///
/// Provides controllable behavior for testing:
/// - Record every invocation for assertions
/// - Fail inputs whose path contains a pattern
/// - Simulate run time to exercise concurrency limits
///
/// # Example
///
/// ```rust,ignore
/// use ffactory_core::testing::MockEngine;
///
/// let engine = MockEngine::new();
/// engine.fail_inputs_containing("broken", 1).await;
/// engine.set_run_duration(Duration::from_millis(50)).await;
///
/// let pool = WorkerPool::new(config, Arc::new(engine.clone()));
/// pool.submit_batch(jobs).await;
///
/// assert_eq!(engine.run_count().await, 3);
/// assert!(engine.peak_concurrency() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Recorded invocations.
    runs: Arc<RwLock<Vec<EngineInvocation>>>,
    /// Path fragments that make a run exit with the paired code.
    failures: Arc<RwLock<Vec<(String, i32)>>>,
    /// If set, the next run fails to start with this error.
    next_error: Arc<RwLock<Option<EngineError>>>,
    /// Simulated run duration.
    run_duration: Arc<RwLock<Duration>>,
    /// Whether validate() reports the engine as usable.
    available: Arc<RwLock<bool>>,
    /// Whether a successful run writes its output file.
    write_outputs: Arc<RwLock<bool>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create a new mock engine where every run succeeds instantly.
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            run_duration: Arc::new(RwLock::new(Duration::ZERO)),
            available: Arc::new(RwLock::new(true)),
            write_outputs: Arc::new(RwLock::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded invocations, in start order.
    pub async fn recorded_runs(&self) -> Vec<EngineInvocation> {
        self.runs.read().await.clone()
    }

    /// Get the number of runs performed.
    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Clear recorded runs.
    pub async fn clear_recorded(&self) {
        self.runs.write().await.clear();
    }

    /// Make runs whose input path contains `pattern` exit with `code`.
    pub async fn fail_inputs_containing(&self, pattern: &str, code: i32) {
        self.failures.write().await.push((pattern.to_string(), code));
    }

    /// Configure the next run to fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated run duration.
    pub async fn set_run_duration(&self, duration: Duration) {
        *self.run_duration.write().await = duration;
    }

    /// Set whether validate() succeeds.
    pub async fn set_available(&self, available: bool) {
        *self.available.write().await = available;
    }

    /// Make successful runs write a small file at the output argument,
    /// resolved against the working directory.
    pub async fn set_write_outputs(&self, write: bool) {
        *self.write_outputs.write().await = write;
    }

    /// Highest number of runs observed in flight at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn exit_code_for(&self, invocation: &EngineInvocation) -> i32 {
        let input = invocation.input.to_string_lossy();
        self.failures
            .read()
            .await
            .iter()
            .find(|(pattern, _)| input.contains(pattern.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0)
    }
}

async fn write_output(invocation: &EngineInvocation) -> Result<(), EngineError> {
    let Some(output) = invocation.args.last() else {
        return Ok(());
    };
    let path = invocation.work_dir.join(output);
    tokio::fs::write(&path, b"converted").await?;
    Ok(())
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut words = vec!["mock-engine".to_string()];
        words.extend(args.iter().cloned());
        join_words(&words)
    }

    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError> {
        self.runs.write().await.push(invocation.clone());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let duration = *self.run_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        let code = self.exit_code_for(invocation).await;
        let written = if code == 0 && *self.write_outputs.read().await {
            write_output(invocation).await
        } else {
            Ok(())
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        written?;

        Ok(EngineExit {
            code: Some(code),
            output_lines: 0,
        })
    }

    async fn validate(&self) -> Result<(), EngineError> {
        if *self.available.read().await {
            Ok(())
        } else {
            Err(EngineError::EngineNotFound {
                path: "mock-engine".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn invocation(input: &str) -> EngineInvocation {
        EngineInvocation {
            input: PathBuf::from(input),
            args: vec!["-i".to_string(), input.to_string()],
            work_dir: PathBuf::from("/tmp"),
            log_path: PathBuf::from("/tmp/x.log"),
        }
    }

    #[tokio::test]
    async fn test_records_runs() {
        let engine = MockEngine::new();
        engine.run(&invocation("/in/a.mov")).await.unwrap();
        assert_eq!(engine.run_count().await, 1);
        assert_eq!(engine.peak_concurrency(), 1);

        engine.clear_recorded().await;
        assert_eq!(engine.run_count().await, 0);
    }

    #[tokio::test]
    async fn test_fail_pattern() {
        let engine = MockEngine::new();
        engine.fail_inputs_containing("bad", 2).await;

        let exit = engine.run(&invocation("/in/bad.mov")).await.unwrap();
        assert_eq!(exit.code, Some(2));
        let exit = engine.run(&invocation("/in/good.mov")).await.unwrap();
        assert!(exit.success());
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let engine = MockEngine::new();
        engine
            .set_next_error(EngineError::EngineNotFound {
                path: "/x".into(),
            })
            .await;
        assert!(engine.run(&invocation("/in/a.mov")).await.is_err());
        assert!(engine.run(&invocation("/in/a.mov")).await.is_ok());
    }

    #[tokio::test]
    async fn test_write_outputs() {
        let temp = tempfile::TempDir::new().unwrap();
        let engine = MockEngine::new();
        let mut run = invocation("/in/a.mov");
        run.work_dir = temp.path().to_path_buf();
        run.args.push("a.mkv".to_string());

        engine.run(&run).await.unwrap();
        assert!(!temp.path().join("a.mkv").exists());

        engine.set_write_outputs(true).await;
        engine.run(&run).await.unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.mkv")).unwrap(), b"converted");
    }

    #[tokio::test]
    async fn test_validate_toggle() {
        let engine = MockEngine::new();
        assert!(engine.validate().await.is_ok());
        engine.set_available(false).await;
        assert!(engine.validate().await.is_err());
    }
}
