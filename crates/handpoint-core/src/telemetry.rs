use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{parse_base_url, resolve_url};
use crate::config::ClientConfig;
use crate::consts::{LOG_EVENT_PATH, TELEMETRY_TIMEOUT_SECS};
use crate::error::Result;
use crate::geometry::SourcePoint;
use crate::io::upload::ImageOrigin;
use crate::protocol::LogEventRequest;

/// A usage event reported for each user action.
#[derive(Clone, Debug, PartialEq)]
pub enum TelemetryEvent {
    ImageSelected {
        origin: ImageOrigin,
        image_type: String,
    },
    UploadError {
        error: String,
    },
    ImageClicked {
        point: SourcePoint,
        display_width: u32,
        display_height: u32,
        overlay_index: u32,
    },
    ImageProcessed {
        overlay_index: u32,
        next_overlay_index: u32,
    },
    ProcessError {
        error: String,
    },
    TryDifferentOverlay {
        current_overlay_index: u32,
    },
    StaleResponseDiscarded {
        overlay_index: u32,
    },
    ImageSaved {
        filename: String,
    },
    ShareFailed {
        error: String,
    },
    AppReset,
}

impl TelemetryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ImageSelected { .. } => "image_selected",
            Self::UploadError { .. } => "upload_error",
            Self::ImageClicked { .. } => "image_clicked",
            Self::ImageProcessed { .. } => "image_processed",
            Self::ProcessError { .. } => "process_error",
            Self::TryDifferentOverlay { .. } => "try_different_overlay",
            Self::StaleResponseDiscarded { .. } => "stale_response_discarded",
            Self::ImageSaved { .. } => "image_saved",
            Self::ShareFailed { .. } => "share_failed",
            Self::AppReset => "app_reset",
        }
    }

    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::ImageSelected { origin, image_type } => json!({
                "source": origin.to_string(),
                "imageType": image_type,
            }),
            Self::UploadError { error }
            | Self::ProcessError { error }
            | Self::ShareFailed { error } => json!({ "error": error }),
            Self::ImageClicked {
                point,
                display_width,
                display_height,
                overlay_index,
            } => json!({
                "x": point.x,
                "y": point.y,
                "imageWidth": display_width,
                "imageHeight": display_height,
                "overlayIndex": overlay_index,
            }),
            Self::ImageProcessed {
                overlay_index,
                next_overlay_index,
            } => json!({
                "success": true,
                "overlayIndex": overlay_index,
                "nextOverlayIndex": next_overlay_index,
            }),
            Self::TryDifferentOverlay {
                current_overlay_index,
            } => json!({ "currentOverlayIndex": current_overlay_index }),
            Self::StaleResponseDiscarded { overlay_index } => {
                json!({ "overlayIndex": overlay_index })
            }
            Self::ImageSaved { filename } => json!({ "filename": filename }),
            Self::AppReset => json!({}),
        }
    }

    pub fn to_request(&self) -> LogEventRequest {
        LogEventRequest {
            event: self.name().to_string(),
            details: self.details(),
        }
    }
}

/// Destination for telemetry events. Emitting must never block or fail the caller.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);

    /// Wait up to `timeout` for events still being delivered.
    /// Returns `true` once nothing is outstanding.
    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Drops every event; used when telemetry is disabled.
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        debug!(event = event.name(), "Telemetry disabled, event dropped");
    }
}

/// Count of posts that have been spawned but not finished.
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    done: Condvar,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(&self) {
        *self.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.done.notify_all();
        }
    }
}

/// Marks a post finished when dropped, even if the sender thread panics.
struct Finish(Arc<InFlight>);

impl Drop for Finish {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Posts each event to `/log-event` on its own detached thread.
///
/// `emit` never waits. Short-lived callers (the CLI) call `flush` before
/// exiting so the last events are not cut off.
pub struct HttpTelemetry {
    client: Client,
    url: Url,
    in_flight: Arc<InFlight>,
}

impl HttpTelemetry {
    pub fn new(server_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TELEMETRY_TIMEOUT_SECS))
            .build()?;
        let url = resolve_url(&parse_base_url(server_url)?, LOG_EVENT_PATH)?;
        Ok(Self {
            client,
            url,
            in_flight: Arc::new(InFlight::default()),
        })
    }

    /// Number of posts not yet finished.
    pub fn pending(&self) -> usize {
        *self.in_flight.lock()
    }
}

impl TelemetrySink for HttpTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        let body = event.to_request();
        let client = self.client.clone();
        let url = self.url.clone();

        self.in_flight.start();
        let finish = Finish(self.in_flight.clone());

        let spawned = std::thread::Builder::new()
            .name("handpoint-telemetry".into())
            .spawn(move || {
                let _finish = finish;
                match client
                    .post(url)
                    .json(&body)
                    .send()
                    .and_then(|r| r.error_for_status())
                {
                    Ok(_) => debug!(event = %body.event, "Telemetry event sent"),
                    Err(e) => warn!(event = %body.event, "Error logging event: {e}"),
                }
            });
        // On spawn failure the closure (and its `Finish`) is dropped here.
        if let Err(e) = spawned {
            warn!("Failed to spawn telemetry thread: {e}");
        }
    }

    fn flush(&self, timeout: Duration) -> bool {
        let count = self.in_flight.lock();
        let (count, _) = self
            .in_flight
            .done
            .wait_timeout_while(count, timeout, |n| *n > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }
}

/// Build the sink selected by `config.network.telemetry`.
pub fn sink_from_config(config: &ClientConfig) -> Result<Arc<dyn TelemetrySink>> {
    if config.network.telemetry {
        Ok(Arc::new(HttpTelemetry::new(&config.server_url)?))
    } else {
        Ok(Arc::new(NoopTelemetry))
    }
}
