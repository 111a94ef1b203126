//! External engine invocation.
//!
//! The engine is opaque: it receives a command line, writes whatever it
//! likes to stdout/stderr and reports success through its exit code. The
//! `Engine` trait is the seam between the worker pool and the process;
//! `FfmpegEngine` spawns the real executable.
//!
//! # Example
//!
//! ```ignore
//! use ffactory_core::engine::{Engine, EngineInvocation, FfmpegEngine};
//!
//! let engine = FfmpegEngine::with_defaults();
//! engine.validate().await?;
//!
//! let exit = engine.run(&EngineInvocation {
//!     input: PathBuf::from("/in/clip.mov"),
//!     args: vec!["-i".into(), "/in/clip.mov".into(), "clip.mp4".into()],
//!     work_dir: PathBuf::from("/out"),
//!     log_path: PathBuf::from("/logs/clip.mov.log"),
//! }).await?;
//! println!("exit code {:?}", exit.code);
//! ```

mod capabilities;
mod error;
mod ffmpeg;
mod traits;

pub use capabilities::{is_accelerated, EncoderCapabilities};
pub use error::EngineError;
pub use ffmpeg::FfmpegEngine;
pub use traits::{Engine, EngineExit, EngineInvocation};
