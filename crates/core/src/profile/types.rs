//! Profile (factory) types.

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{absolute_path, expand_path};

/// Profile keys understood by the synthesizer, dispatcher and watch loop.
pub mod keys {
    pub const ENABLE_FACTORY: &str = "ENABLEFACTORY";
    pub const NOTIFY_DIRECTORY: &str = "NOTIFYDIRECTORY";
    pub const OUTPUT_DIRECTORY: &str = "OUTPUTDIRECTORY";
    pub const VIDEO_WRAPPER: &str = "VIDEOWRAPPER";
    pub const AUDIO_FILE_EXTENSION: &str = "AUDIOFILEEXTENSION";
    pub const VIDEO_CODECS: &str = "VIDEOCODECS";
    pub const VIDEO_BITRATE: &str = "VIDEOBITRATE";
    pub const MATCH_MIN_MAX_BITRATE: &str = "MATCHMINMAXBITRATE";
    pub const VIDEO_PROFILE: &str = "VIDEOPROFILE";
    pub const VIDEO_PROFILE_LEVEL: &str = "VIDEOPROFILELEVEL";
    pub const GROUP_PIC_SIZE: &str = "GROUPPICSIZE";
    pub const B_FRAMES: &str = "BFRAMES";
    pub const FRAME_STRATEGY: &str = "FRAMESTRATEGY";
    pub const VIDEO_FILTERS: &str = "VIDEOFILTERS";
    pub const VIDEO_SIZE: &str = "VIDEOSIZE";
    pub const VIDEO_PIX_FORMAT: &str = "VIDEOPIXFORMAT";
    pub const SUBTITLE_CODECS: &str = "SUBTITLECODECS";
    pub const AUDIO_CODECS: &str = "AUDIOCODECS";
    pub const AUDIO_BITRATE: &str = "AUDIOBITRATE";
    pub const AUDIO_SAMPLE_RATE: &str = "AUDIOSAMPLERATE";
    pub const AUDIO_CHANNELS: &str = "AUDIOCHANNELS";
    pub const AUDIO_FILTERS: &str = "AUDIOFILTERS";
    pub const VIDEO_STREAM_ID: &str = "VIDEOSTREAMID";
    pub const AUDIO_STREAM_ID: &str = "AUDIOSTREAMID";
    pub const ENCODE_LENGTH: &str = "ENCODELENGTH";
    pub const START_TIME_OFFSET: &str = "STARTTIMEOFFSET";
    pub const MANUAL_OPTIONS_INPUT: &str = "MANUALOPTIONSINPUT";
    pub const MANUAL_OPTIONS_OUTPUT: &str = "MANUALOPTIONSOUTPUT";
    pub const FORCE_FORMAT: &str = "FORCEFORMAT";
    pub const DELETE_SOURCE: &str = "DELETESOURCE";
    pub const DELETE_CONVERSION_LOGS: &str = "DELETECONVERSIONLOGS";

    // Worker limits
    pub const CPU_CONCURRENCY: &str = "CPUCONCURRENCY";
    pub const GPU_CONCURRENCY: &str = "GPUCONCURRENCY";

    // Streaming
    pub const STREAM_VIDEO_FORMAT: &str = "STREAMVIDEOFORMAT";
    pub const STREAM_AUDIO_FORMAT: &str = "STREAMAUDIOFORMAT";
    pub const THREAD_QUEUE_SIZE: &str = "THREADQUEUESIZE";
    pub const AUTO_MAP_STREAMS: &str = "AUTOMAPSTREAMS";
}

/// Returns true for the truthy strings `true`, `yes`, `1` and `on`
/// (case-insensitive, surrounding whitespace ignored). Anything else,
/// including the empty string, is false.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// A named conversion recipe loaded from a `KEY=VALUE` file.
///
/// Keys are stored upper-cased. Lookups of missing keys yield the empty
/// string, so consumers never have to distinguish "absent" from "blank".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    name: String,
    values: HashMap<String, String>,
}

impl Profile {
    /// Creates a profile from already-normalized values.
    pub fn new(name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Parses profile text. Blank lines, `#` comments and lines without
    /// a `=` are skipped; the first `=` splits key from value.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let mut values = HashMap::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                tracing::debug!("Skipping profile line without '=': {:?}", trimmed);
                continue;
            };

            let key = key.trim().to_uppercase();
            if key.is_empty() {
                continue;
            }
            values.insert(key, value.trim().to_string());
        }

        Self::new(name, values)
    }

    /// Builds a profile from literal pairs (keys are upper-cased).
    pub fn from_pairs<'a>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v.to_string()))
            .collect();
        Self::new(name, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(&key.to_uppercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether `key` holds a truthy value.
    pub fn flag(&self, key: &str) -> bool {
        is_truthy(self.get(key))
    }

    /// Parses `key` as a positive count; zero, blank and garbage yield `None`.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.get(key).trim().parse::<usize>().ok().filter(|n| *n > 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.flag(keys::ENABLE_FACTORY)
    }

    /// Notify directory with `~`/`$VAR` expanded and made absolute, if
    /// configured.
    pub fn notify_dir(&self) -> Option<PathBuf> {
        non_empty_path(self.get(keys::NOTIFY_DIRECTORY))
    }

    /// Output directory with `~`/`$VAR` expanded and made absolute, if
    /// configured.
    pub fn output_dir(&self) -> Option<PathBuf> {
        non_empty_path(self.get(keys::OUTPUT_DIRECTORY))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(absolute_path(&expand_path(std::path::Path::new(raw))))
    }
}

/// A profile file found in the factory directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDescriptor {
    /// Profile name (the file name).
    pub name: String,
    /// Full path to the profile file.
    pub path: PathBuf,
}
