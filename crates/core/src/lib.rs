pub mod command;
pub mod config;
pub mod engine;
pub mod processor;
pub mod profile;
pub mod testing;
pub mod watch;

pub use command::{synthesize, synthesize_streaming, CommandError};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use engine::{Engine, EngineError, FfmpegEngine};
pub use processor::{BatchReport, Job, JobOutcome, WorkerLimits, WorkerPool};
pub use profile::{Profile, ProfileError, ProfileStore};
pub use watch::{WatchError, WatchLoop, WatchMode, WatchOptions};
