//! JSON bodies exchanged with the compositing server.

use serde::{Deserialize, Serialize};

use crate::geometry::SourcePoint;

/// Body of `POST /process`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Data URL of the (possibly downscaled) source image.
    pub image: String,
    pub x: u32,
    pub y: u32,
    pub overlay_index: u32,
}

impl ProcessRequest {
    pub fn new(image: String, point: SourcePoint, overlay_index: u32) -> Self {
        Self {
            image,
            x: point.x,
            y: point.y,
            overlay_index,
        }
    }

    pub fn point(&self) -> SourcePoint {
        SourcePoint {
            x: self.x,
            y: self.y,
        }
    }
}

/// Reply to `POST /process`.
///
/// A body carrying `error` is a failure even if it also carries other fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Failure {
        error: String,
    },
    Success {
        result: String,
        #[serde(rename = "nextOverlayIndex")]
        next_overlay_index: u32,
    },
}

/// Body of `POST /log-event`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEventRequest {
    pub event: String,
    pub details: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventCount {
    pub event_type: String,
    pub count: u64,
}

/// Reply to `GET /stats`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub event_counts: Vec<EventCount>,
    pub unique_users: u64,
    pub period_days: u32,
}

impl UsageStats {
    pub fn total_events(&self) -> u64 {
        self.event_counts.iter().map(|c| c.count).sum()
    }
}
