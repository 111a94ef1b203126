//! Command synthesis.
//!
//! Turns a [`Profile`](crate::profile::Profile) into the argument list for
//! the external engine. Both entry points are pure: no I/O, no state, and
//! identical inputs always yield identical arguments.
//!
//! # Example
//!
//! ```ignore
//! use ffactory_core::command::synthesize;
//! use ffactory_core::profile::Profile;
//!
//! let profile = Profile::parse("h264", "VIDEOCODECS=libx264\nVIDEOWRAPPER=mp4\n");
//! let args = synthesize(&profile, Path::new("clip.mov"), false);
//! assert_eq!(args.last().unwrap(), "clip.mp4");
//! ```

mod error;
mod synthesize;
mod tokenize;

pub use error::CommandError;
pub use synthesize::{
    has_scale_filter, output_extension, output_path, synthesize, synthesize_streaming,
    DEFAULT_EXTENSION, PREVIEW_STEM,
};
pub use tokenize::{join_words, split_words};
