//! FFmpeg process runner.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::command::join_words;

use super::error::EngineError;
use super::traits::{Engine, EngineExit, EngineInvocation};

/// Buffered output lines between the pipe readers and the log writer.
const LINE_BUFFER: usize = 256;

/// Runs the `ffmpeg` executable (or anything flag-compatible with it).
///
/// On unix each run gets its own process group, so a Ctrl-C delivered to
/// the foreground group reaches the orchestrator but not its conversions.
/// A watch drains its running batch on Ctrl-C and relies on that.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    path: PathBuf,
    own_process_group: bool,
}

impl FfmpegEngine {
    /// Creates an engine for the executable at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            own_process_group: true,
        }
    }

    /// Keeps runs in the caller's process group, so terminal signals stop
    /// them together with the caller.
    pub fn inherit_process_group(mut self) -> Self {
        self.own_process_group = false;
        self
    }

    /// Creates an engine resolving `ffmpeg` through PATH.
    pub fn with_defaults() -> Self {
        Self::new("ffmpeg")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_spawn_error(&self, e: std::io::Error) -> EngineError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::EngineNotFound {
                path: self.path.clone(),
            }
        } else {
            EngineError::Io(e)
        }
    }
}

/// Forwards every line of `stream` into `tx` until EOF or the receiver goes away.
fn forward_lines<R>(stream: R, tx: mpsc::Sender<String>) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    })
}

#[async_trait]
impl Engine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut words = Vec::with_capacity(args.len() + 1);
        words.push(self.path.to_string_lossy().to_string());
        words.extend(args.iter().cloned());
        join_words(&words)
    }

    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError> {
        // The log is best-effort: without it the output is still drained.
        let mut log = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&invocation.log_path)
            .await
        {
            Ok(file) => Some(BufWriter::new(file)),
            Err(e) => {
                tracing::warn!(
                    "Cannot open conversion log {:?}, running without it: {}",
                    invocation.log_path,
                    e
                );
                None
            }
        };

        // stdin must never be an inherited terminal: ffmpeg reads
        // keystrokes from it and stalls when it is one.
        let mut command = Command::new(&self.path);
        command
            .args(&invocation.args)
            .current_dir(&invocation.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        if self.own_process_group {
            command.process_group(0);
        }
        let mut child = command.spawn().map_err(|e| self.map_spawn_error(e))?;

        let (tx, mut rx) = mpsc::channel::<String>(LINE_BUFFER);
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut output_lines = 0;
        while let Some(line) = rx.recv().await {
            output_lines += 1;
            let Some(writer) = log.as_mut() else {
                continue;
            };
            let write = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await
            };
            if let Err(e) = write.await {
                tracing::warn!(
                    "Failed writing conversion log {:?}: {}",
                    invocation.log_path,
                    e
                );
                log = None;
            }
        }

        for reader in readers {
            let _ = reader.await;
        }
        if let Some(mut writer) = log {
            if let Err(e) = writer.flush().await {
                tracing::warn!("Failed flushing conversion log {:?}: {}", invocation.log_path, e);
            }
        }

        let status = child.wait().await?;
        Ok(EngineExit {
            code: status.code(),
            output_lines,
        })
    }

    async fn validate(&self) -> Result<(), EngineError> {
        let output = Command::new(&self.path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(EngineError::Unusable {
                path: self.path.clone(),
                reason: format!("-version exited with {:?}", output.status.code()),
            });
        }

        Ok(())
    }
}
