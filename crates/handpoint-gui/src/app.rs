use std::path::{Path, PathBuf};
use std::sync::mpsc;

use handpoint_core::config::ClientConfig;
use handpoint_core::controller::{Controller, ProcessStatus};
use handpoint_core::geometry::DisplayRect;
use handpoint_core::io::save::ShareSheet;
use handpoint_core::io::upload::ImageOrigin;
use handpoint_core::telemetry::{sink_from_config, NoopTelemetry, TelemetrySink};
use tracing::warn;

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::share::SystemShare;
use crate::states::{Activity, UIState, ViewportState};
use crate::worker;

pub struct HandpointApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub controller: Controller,
    pub config: ClientConfig,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub show_about: bool,
}

fn build_controller(config: &ClientConfig) -> Controller {
    let telemetry: std::sync::Arc<dyn TelemetrySink> = match sink_from_config(config) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Telemetry disabled: {e}");
            std::sync::Arc::new(NoopTelemetry)
        }
    };
    Controller::new(config.upload.clone(), telemetry)
}

impl HandpointApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let config = ClientConfig::default();
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone(), &config);

        Self {
            cmd_tx,
            result_tx,
            result_rx,
            controller: build_controller(&config),
            config,
            ui_state: UIState::default(),
            viewport: ViewportState::default(),
            show_about: false,
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded {
                    input,
                    prepared,
                    preview,
                } => {
                    let name = input.name.clone();
                    match self.controller.accept_upload(input, prepared) {
                        Ok(()) => {
                            self.viewport.result = None;
                            self.viewport.source = preview.map(|img| {
                                ctx.load_texture("source", img, egui::TextureOptions::LINEAR)
                            });
                            if let Some(image) = &self.controller.session().source_image {
                                self.ui_state.add_log(format!(
                                    "Loaded {} ({}x{}{})",
                                    name.as_deref().unwrap_or("image"),
                                    image.width,
                                    image.height,
                                    if image.downscaled { ", downscaled" } else { "" }
                                ));
                            }
                            self.ui_state.file_name = name;
                        }
                        Err(e) => {
                            self.viewport.clear();
                            self.ui_state.file_name = None;
                            self.ui_state.show_alert(format!("Could not read image: {e}"));
                        }
                    }
                }
                WorkerResult::Processed { token, outcome } => {
                    match self.controller.finish_process(token, outcome) {
                        ProcessStatus::Applied {
                            display_url,
                            next_overlay_index,
                        } => {
                            self.ui_state.add_log(format!(
                                "Result ready (next overlay {next_overlay_index})"
                            ));
                            self.ui_state.activity = Some(Activity::Downloading);
                            self.send_command(WorkerCommand::FetchResult { display_url });
                        }
                        ProcessStatus::Rejected(message) => {
                            self.ui_state.show_alert(format!("Error: {message}"));
                        }
                        ProcessStatus::Failed(message) => {
                            self.ui_state.show_alert(message);
                        }
                        ProcessStatus::Stale => {
                            self.ui_state
                                .add_log("Ignored a response for a previous image".into());
                        }
                    }
                }
                WorkerResult::ResultImage { display_url, image } => {
                    // Only the newest result may replace what is on screen.
                    if self.controller.session().result_display_url().as_deref()
                        == Some(display_url.as_str())
                    {
                        self.ui_state.activity = None;
                        self.viewport.result =
                            Some(ctx.load_texture("result", image, egui::TextureOptions::LINEAR));
                    }
                }
                WorkerResult::Saved { plan, result } => {
                    self.ui_state.activity = None;
                    match result {
                        Ok(_) => {
                            self.ui_state
                                .add_log(format!("Saved: {}", plan.path.display()));
                            let share: Option<&dyn ShareSheet> = if self.ui_state.open_after_save {
                                Some(&SystemShare)
                            } else {
                                None
                            };
                            self.controller.record_saved(&plan, share);
                        }
                        Err(e) => self.ui_state.show_alert(format!("Failed to save: {e}")),
                    }
                }
                WorkerResult::SaveDirPicked { dir } => {
                    self.save_result_to(&dir);
                }
                WorkerResult::ConfigImported { config } => {
                    self.apply_config(config);
                    self.ui_state.add_log("Config imported".into());
                }
                WorkerResult::Error { message } => {
                    self.ui_state.activity = None;
                    self.ui_state.show_alert(message);
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Open a file picker on a helper thread; the worker loads whatever is chosen.
    pub fn pick_image(&self, origin: ImageOrigin) {
        let cmd_tx = self.cmd_tx.clone();
        let upload = self.config.upload.clone();
        let title = match origin {
            ImageOrigin::Gallery => "Choose a photo",
            ImageOrigin::Camera => "Choose a camera capture",
        };
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .set_title(title)
                .add_filter("Images", &["jpg", "jpeg", "png", "webp", "gif", "bmp"])
                .add_filter("All files", &["*"])
                .pick_file()
            {
                let _ = cmd_tx.send(WorkerCommand::LoadImage {
                    path,
                    origin,
                    upload,
                });
            }
        });
    }

    /// Tap on the displayed image at screen position `pos`.
    pub fn tap(&mut self, pos: egui::Pos2, img_rect: egui::Rect) {
        let rect = DisplayRect::new(
            img_rect.left(),
            img_rect.top(),
            img_rect.width(),
            img_rect.height(),
        );
        match self.controller.click(pos.x, pos.y, rect) {
            Ok(pending) => {
                self.ui_state
                    .add_log(format!("Tapped {}", pending.request.point()));
                self.send_command(WorkerCommand::Process { pending });
            }
            Err(e) => self.ui_state.add_log(format!("Tap ignored: {e}")),
        }
    }

    pub fn try_different(&mut self) {
        match self.controller.begin_try_different() {
            Ok(pending) => self.send_command(WorkerCommand::Process { pending }),
            Err(e) => self.ui_state.add_log(format!("Cannot retry: {e}")),
        }
    }

    pub fn save_result(&mut self) {
        let dir = self.config.save_dir.clone();
        self.save_result_to(&dir);
    }

    pub fn save_result_as(&self) {
        let result_tx = self.result_tx.clone();
        std::thread::spawn(move || {
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                let _ = result_tx.send(WorkerResult::SaveDirPicked { dir });
            }
        });
    }

    fn save_result_to(&mut self, dir: &Path) {
        match self.controller.plan_save(dir) {
            Ok(plan) => {
                self.ui_state.activity = Some(Activity::Saving);
                self.send_command(WorkerCommand::SaveResult { plan });
            }
            Err(e) => self.ui_state.add_log(format!("Nothing to save: {e}")),
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.viewport.clear();
        self.ui_state.file_name = None;
        self.ui_state.activity = None;
        self.ui_state.add_log("Ready for a new image".into());
    }

    /// Swap in a new config. The session starts over since the server may differ.
    pub fn apply_config(&mut self, config: ClientConfig) {
        self.controller = build_controller(&config);
        self.viewport.clear();
        self.ui_state.file_name = None;
        self.ui_state.activity = None;
        self.send_command(WorkerCommand::Reconfigure {
            config: config.clone(),
        });
        self.config = config;
    }

    pub fn export_config(&self) {
        let config = self.config.clone();
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("TOML", &["toml"])
                .set_file_name("handpoint.toml")
                .save_file()
            {
                match config.to_toml() {
                    Ok(content) => {
                        if let Err(e) = std::fs::write(&path, content) {
                            warn!("Failed to write {}: {e}", path.display());
                        }
                    }
                    Err(e) => warn!("Failed to serialise config: {e}"),
                }
            }
        });
    }

    pub fn import_config(&self) {
        let result_tx = self.result_tx.clone();
        std::thread::spawn(move || {
            let picked: Option<PathBuf> = rfd::FileDialog::new()
                .add_filter("TOML", &["toml"])
                .pick_file();
            let Some(path) = picked else {
                return;
            };
            let msg = match ClientConfig::load(&path) {
                Ok(config) => WorkerResult::ConfigImported { config },
                Err(e) => WorkerResult::Error {
                    message: format!("Failed to import {}: {e}", path.display()),
                },
            };
            let _ = result_tx.send(msg);
        });
    }
}

impl eframe::App for HandpointApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::actions::show(ctx, self);
        panels::viewport::show(ctx, self);

        if let Some(message) = self.ui_state.alert.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.ui_state.alert = None;
                    }
                });
        }

        // About dialog
        if self.show_about {
            egui::Window::new("About Handpoint")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Handpoint");
                        ui.label("Tap a photo, get a pointing hand");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.label(format!("Server: {}", self.config.server_url));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
