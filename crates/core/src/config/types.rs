use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub factories: FactoriesConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub workers: WorkersConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

/// External engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSection {
    /// Engine executable, resolved through PATH when not absolute
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
        }
    }
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

/// Where factory profiles live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FactoriesConfig {
    #[serde(default = "default_factories_dir")]
    pub dir: PathBuf,
}

impl Default for FactoriesConfig {
    fn default() -> Self {
        Self {
            dir: default_factories_dir(),
        }
    }
}

fn default_factories_dir() -> PathBuf {
    PathBuf::from("~/.config/ffactory/factories")
}

/// Watch loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Seconds between scan cycles in interval mode
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Minimum age of a file's mtime before it is picked up
    #[serde(default = "default_settle")]
    pub settle_secs: u64,
    /// Skip dot-files (partial uploads, editor swap files)
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
    /// Extension allow-list; empty accepts everything
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            settle_secs: default_settle(),
            skip_hidden: true,
            extensions: Vec::new(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_settle() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// Worker pool limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkersConfig {
    /// Concurrent software encodes
    #[serde(default = "default_cpu_workers")]
    pub cpu: usize,
    /// Concurrent hardware-accelerated encodes
    #[serde(default = "default_gpu_workers")]
    pub gpu: usize,
    /// Encoder name fragments that mark a codec as hardware-accelerated
    #[serde(default = "default_accelerator_codecs")]
    pub accelerator_codecs: Vec<String>,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            cpu: default_cpu_workers(),
            gpu: default_gpu_workers(),
            accelerator_codecs: default_accelerator_codecs(),
        }
    }
}

fn default_cpu_workers() -> usize {
    2
}

fn default_gpu_workers() -> usize {
    1
}

pub fn default_accelerator_codecs() -> Vec<String> {
    [
        "nvenc",
        "qsv",
        "amf",
        "vaapi",
        "videotoolbox",
        "v4l2m2m",
        "mediacodec",
        "omx",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Conversion log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("ffactory-logs")
}

impl Config {
    /// Factory directory with `~` and environment variables expanded.
    pub fn factories_dir(&self) -> PathBuf {
        expand_path(&self.factories.dir)
    }

    /// Log directory with `~` and environment variables expanded.
    pub fn log_dir(&self) -> PathBuf {
        expand_path(&self.logs.dir)
    }
}

/// Expand `~` and `$VAR` in a path, leaving it untouched when expansion fails.
pub fn expand_path(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).as_ref()),
    }
}

/// Anchor a relative path at the current working directory.
///
/// Engine runs change directory, so every path handed to one must be
/// absolute. The path is returned unchanged if the working directory is
/// unavailable.
pub fn absolute_path(path: &std::path::Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
