use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::CompositingService;
use crate::config::UploadConfig;
use crate::consts::TRANSPORT_ERROR_MESSAGE;
use crate::error::{HandpointError, Result};
use crate::geometry::{to_source_point, DisplayRect, SourcePoint};
use crate::io::save::{save_file_name, write_result, SavePlan, ShareSheet};
use crate::io::upload::{prepare_upload, SelectedFile, SourceImage};
use crate::protocol::{ProcessRequest, ProcessResponse};
use crate::session::{now_millis, FileInput, SessionState, ViewMode};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

/// Identifies one compositing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    seq: u64,
}

/// A request that has been admitted and must be handed back to
/// [`Controller::finish_process`] once the server answers.
#[derive(Clone, Debug)]
pub struct PendingProcess {
    pub token: RequestToken,
    pub request: ProcessRequest,
}

/// What happened to a finished compositing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Result shown and overlay index advanced.
    Applied {
        display_url: String,
        next_overlay_index: u32,
    },
    /// The server answered with `{error}`. Nothing changed.
    Rejected(String),
    /// The request never got a usable answer. Nothing changed.
    Failed(String),
    /// The session moved on (reset or new image) while the request was out.
    Stale,
}

/// Owns the session and turns user actions into state transitions.
///
/// Network work is split into `begin_*` / `finish_*` so a surface can run the
/// request on another thread; `tap`, `process_at`, `try_different` and
/// `save_result` do the whole round trip in place.
pub struct Controller {
    session: SessionState,
    upload: UploadConfig,
    telemetry: Arc<dyn TelemetrySink>,
    in_flight: Option<RequestToken>,
    next_seq: u64,
}

impl Controller {
    pub fn new(upload: UploadConfig, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            session: SessionState::default(),
            upload,
            telemetry,
            in_flight: None,
            next_seq: 0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view_mode(&self) -> ViewMode {
        self.session.view_mode()
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload
    }

    /// Give outstanding telemetry up to `timeout` to be delivered.
    pub fn flush_telemetry(&self, timeout: Duration) -> bool {
        self.telemetry.flush(timeout)
    }

    /// True while a compositing request is out. Tap and try-different are refused.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Read, downscale and store a picked file. `None` (picker cancelled) is a no-op.
    pub fn select_image(&mut self, file: Option<SelectedFile>) -> Result<bool> {
        let Some(file) = file else {
            return Ok(false);
        };
        let input = FileInput {
            name: file.name,
            origin: file.origin,
        };
        let prepared = prepare_upload(&file.bytes, &self.upload);
        self.accept_upload(input, prepared)?;
        Ok(true)
    }

    /// Install an upload prepared elsewhere (e.g. on a worker thread).
    ///
    /// On failure the session falls back to the upload view and the error is
    /// returned for the surface to display.
    pub fn accept_upload(&mut self, input: FileInput, prepared: Result<SourceImage>) -> Result<()> {
        let generation = self.session.generation + 1;
        self.in_flight = None;

        match prepared {
            Ok(image) => {
                info!(
                    width = image.width,
                    height = image.height,
                    downscaled = image.downscaled,
                    origin = %input.origin,
                    "Image loaded"
                );
                self.telemetry.emit(TelemetryEvent::ImageSelected {
                    origin: input.origin,
                    image_type: image.mime.clone(),
                });
                self.session = SessionState {
                    source_image: Some(image),
                    file_input: Some(input),
                    ..SessionState::with_generation(generation)
                };
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load image: {e}");
                self.session = SessionState::with_generation(generation);
                self.telemetry.emit(TelemetryEvent::UploadError {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Processing
    // -----------------------------------------------------------------------

    /// Translate a tap on the displayed image and admit a request for it.
    pub fn click(&mut self, click_x: f32, click_y: f32, rect: DisplayRect) -> Result<PendingProcess> {
        let image = self
            .session
            .source_image
            .as_ref()
            .ok_or(HandpointError::NoSourceImage)?;
        let point = to_source_point(click_x, click_y, rect, image.size())?;
        let pending = self.begin_process(point)?;

        debug!(%point, overlay_index = self.session.overlay_index, "Image clicked");
        self.telemetry.emit(TelemetryEvent::ImageClicked {
            point,
            display_width: rect.width.round() as u32,
            display_height: rect.height.round() as u32,
            overlay_index: self.session.overlay_index,
        });
        Ok(pending)
    }

    /// Admit a request for `point` with the current overlay index.
    pub fn begin_process(&mut self, point: SourcePoint) -> Result<PendingProcess> {
        let image = self
            .session
            .source_image
            .as_ref()
            .ok_or(HandpointError::NoSourceImage)?;
        if self.in_flight.is_some() {
            return Err(HandpointError::RequestInFlight);
        }

        let request = ProcessRequest::new(image.data_url.clone(), point, self.session.overlay_index);
        let token = RequestToken {
            generation: self.session.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.session.last_click = Some(point);
        self.in_flight = Some(token);

        Ok(PendingProcess { token, request })
    }

    /// Re-admit the last tapped point with whatever index the server handed back.
    pub fn begin_try_different(&mut self) -> Result<PendingProcess> {
        let point = self
            .session
            .last_click
            .ok_or(HandpointError::NoPreviousClick)?;
        let pending = self.begin_process(point)?;

        info!(overlay_index = self.session.overlay_index, "Trying a different overlay");
        self.telemetry.emit(TelemetryEvent::TryDifferentOverlay {
            current_overlay_index: self.session.overlay_index,
        });
        Ok(pending)
    }

    /// Apply the server's answer for `token`, unless the session has moved on.
    pub fn finish_process(
        &mut self,
        token: RequestToken,
        outcome: Result<ProcessResponse>,
    ) -> ProcessStatus {
        if self.in_flight != Some(token) || token.generation != self.session.generation {
            info!(seq = token.seq, "Discarding stale response");
            self.telemetry.emit(TelemetryEvent::StaleResponseDiscarded {
                overlay_index: self.session.overlay_index,
            });
            return ProcessStatus::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(ProcessResponse::Success {
                result,
                next_overlay_index,
            }) => {
                let sent_index = self.session.overlay_index;
                self.session.overlay_index = next_overlay_index;
                self.session.result_ref = Some(result);
                self.session.result_stamp = now_millis();

                let display_url = self.session.result_display_url().unwrap_or_default();
                info!(%display_url, next_overlay_index, "Result received");
                self.telemetry.emit(TelemetryEvent::ImageProcessed {
                    overlay_index: sent_index,
                    next_overlay_index,
                });
                ProcessStatus::Applied {
                    display_url,
                    next_overlay_index,
                }
            }
            Ok(ProcessResponse::Failure { error }) => {
                warn!("Server rejected request: {error}");
                self.telemetry.emit(TelemetryEvent::ProcessError {
                    error: error.clone(),
                });
                ProcessStatus::Rejected(error)
            }
            Err(e) => {
                warn!("Process request failed: {e}");
                self.telemetry.emit(TelemetryEvent::ProcessError {
                    error: e.to_string(),
                });
                ProcessStatus::Failed(TRANSPORT_ERROR_MESSAGE.to_string())
            }
        }
    }

    pub fn tap(
        &mut self,
        service: &dyn CompositingService,
        click_x: f32,
        click_y: f32,
        rect: DisplayRect,
    ) -> Result<ProcessStatus> {
        let pending = self.click(click_x, click_y, rect)?;
        Ok(self.run(service, pending))
    }

    pub fn process_at(
        &mut self,
        service: &dyn CompositingService,
        point: SourcePoint,
    ) -> Result<ProcessStatus> {
        let pending = self.begin_process(point)?;
        Ok(self.run(service, pending))
    }

    pub fn try_different(&mut self, service: &dyn CompositingService) -> Result<ProcessStatus> {
        let pending = self.begin_try_different()?;
        Ok(self.run(service, pending))
    }

    fn run(&mut self, service: &dyn CompositingService, pending: PendingProcess) -> ProcessStatus {
        let outcome = service.process(&pending.request);
        self.finish_process(pending.token, outcome)
    }

    // -----------------------------------------------------------------------
    // Save / share
    // -----------------------------------------------------------------------

    /// Decide where the current result goes inside `dir`.
    pub fn plan_save(&self, dir: &Path) -> Result<SavePlan> {
        let url = self
            .session
            .result_ref
            .clone()
            .ok_or(HandpointError::NoResult)?;
        Ok(SavePlan {
            url,
            path: dir.join(save_file_name(now_millis())),
        })
    }

    /// Report a completed save and hand the file to `share`, if any.
    /// Share failures are logged and otherwise ignored.
    pub fn record_saved(&self, plan: &SavePlan, share: Option<&dyn ShareSheet>) {
        self.telemetry.emit(TelemetryEvent::ImageSaved {
            filename: plan.file_name(),
        });

        if let Some(sheet) = share {
            if let Err(e) = sheet.share(&plan.path) {
                warn!("Error sharing {}: {e}", plan.path.display());
                self.telemetry.emit(TelemetryEvent::ShareFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    pub fn save_result(
        &self,
        service: &dyn CompositingService,
        dir: &Path,
        share: Option<&dyn ShareSheet>,
    ) -> Result<SavePlan> {
        let plan = self.plan_save(dir)?;
        write_result(service, &plan)?;
        self.record_saved(&plan, share);
        Ok(plan)
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Back to the upload view with an empty session. Outstanding requests become stale.
    pub fn reset(&mut self) {
        self.session = SessionState::with_generation(self.session.generation + 1);
        self.in_flight = None;
        info!("Session reset");
        self.telemetry.emit(TelemetryEvent::AppReset);
    }
}
