//! Hardware encoder detection.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Whether `codec` names a hardware-accelerated encoder, judged by
/// case-insensitive substring match against `fragments` (e.g. `nvenc`).
pub fn is_accelerated<S: AsRef<str>>(codec: &str, fragments: &[S]) -> bool {
    let codec = codec.trim().to_ascii_lowercase();
    !codec.is_empty()
        && fragments.iter().any(|f| {
            let f = f.as_ref().trim().to_ascii_lowercase();
            !f.is_empty() && codec.contains(&f)
        })
}

/// Hardware encoders the engine reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncoderCapabilities {
    /// Encoder names matching one of the accelerator fragments.
    pub hardware_encoders: Vec<String>,
}

impl EncoderCapabilities {
    /// Detects hardware encoders by running `<engine> -encoders`.
    ///
    /// An engine that cannot be run reports no encoders.
    pub async fn detect<S: AsRef<str>>(engine: &Path, fragments: &[S]) -> Self {
        let output = Command::new(engine)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(o) if o.status.success() => {
                Self::from_listing(&String::from_utf8_lossy(&o.stdout), fragments)
            }
            _ => Self::default(),
        }
    }

    /// Parses an `-encoders` listing. Entries follow the `------` separator
    /// as `<flags> <name> <description>`.
    pub fn from_listing<S: AsRef<str>>(listing: &str, fragments: &[S]) -> Self {
        let hardware_encoders = listing
            .lines()
            .skip_while(|line| !line.trim_start().starts_with("---"))
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(1))
            .filter(|name| is_accelerated(name, fragments))
            .map(str::to_string)
            .collect();

        Self { hardware_encoders }
    }

    /// Check if any hardware encoder is available.
    pub fn has_hardware_encoder(&self) -> bool {
        !self.hardware_encoders.is_empty()
    }

    pub fn supports(&self, encoder: &str) -> bool {
        self.hardware_encoders.iter().any(|e| e == encoder)
    }
}
