use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::geometry::SourcePoint;
use crate::io::upload::{ImageOrigin, SourceImage};

/// Which of the three screens is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// No image yet: show the file/camera pickers.
    Upload,
    /// Image loaded, waiting for a tap.
    Interact,
    /// A composited result is on screen.
    Result,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "Upload"),
            Self::Interact => write!(f, "Tap the image"),
            Self::Result => write!(f, "Result"),
        }
    }
}

/// The value a file input currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInput {
    pub name: Option<String>,
    pub origin: ImageOrigin,
}

/// Everything one upload-tap-result cycle knows about.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub source_image: Option<SourceImage>,
    /// Server-chosen overlay to apply next. Only ever 0 or a server value.
    pub overlay_index: u32,
    pub last_click: Option<SourcePoint>,
    /// The server's `result` string, verbatim.
    pub result_ref: Option<String>,
    /// Milliseconds timestamp of the last result, appended as a cache buster.
    pub result_stamp: u64,
    pub file_input: Option<FileInput>,
    /// Bumped whenever the image changes or the session resets.
    pub generation: u64,
}

impl SessionState {
    pub fn with_generation(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        match (&self.source_image, &self.result_ref) {
            (None, _) => ViewMode::Upload,
            (Some(_), None) => ViewMode::Interact,
            (Some(_), Some(_)) => ViewMode::Result,
        }
    }

    /// Result reference with a `t=` query so a reused file name is refetched.
    pub fn result_display_url(&self) -> Option<String> {
        self.result_ref
            .as_deref()
            .map(|r| cache_busted(r, self.result_stamp))
    }
}

pub fn cache_busted(url: &str, stamp: u64) -> String {
    if url.starts_with("data:") {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={stamp}")
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
