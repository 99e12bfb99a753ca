use std::path::Path;
use std::sync::mpsc;

use handpoint_core::client::{CompositingService, HttpClient};
use handpoint_core::config::{ClientConfig, UploadConfig};
use handpoint_core::controller::PendingProcess;
use handpoint_core::io::save::{write_result, SavePlan};
use handpoint_core::io::upload::{prepare_upload, ImageOrigin, SelectedFile};
use handpoint_core::session::FileInput;
use tracing::warn;

use crate::convert::decode_color_image;
use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    config: &ClientConfig,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
    let config = config.clone();

    std::thread::Builder::new()
        .name("handpoint-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx, config);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Error { message: msg.into() });
}

fn build_client(
    config: &ClientConfig,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) -> Option<HttpClient> {
    match HttpClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Failed to build HTTP client: {e}");
            send_error(tx, ctx, format!("Invalid server settings: {e}"));
            None
        }
    }
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    config: ClientConfig,
) {
    let mut client = build_client(&config, &tx, &ctx);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadImage {
                path,
                origin,
                upload,
            } => {
                handle_load_image(&path, origin, &upload, &tx, &ctx);
            }
            WorkerCommand::Process { pending } => {
                handle_process(client.as_ref(), pending, &tx, &ctx);
            }
            WorkerCommand::FetchResult { display_url } => match client.as_ref() {
                Some(c) => handle_fetch_result(c, display_url, &tx, &ctx),
                None => send_error(&tx, &ctx, "No server configured."),
            },
            WorkerCommand::SaveResult { plan } => match client.as_ref() {
                Some(c) => {
                    let result = write_result(c, &plan);
                    send(&tx, &ctx, WorkerResult::Saved { plan, result });
                }
                None => send_error(&tx, &ctx, "No server configured."),
            },
            WorkerCommand::Reconfigure { config } => {
                client = build_client(&config, &tx, &ctx);
                if client.is_some() {
                    send_log(&tx, &ctx, format!("Server: {}", config.server_url));
                }
            }
        }
    }
}

fn handle_load_image(
    path: &Path,
    origin: ImageOrigin,
    upload: &UploadConfig,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let file = match SelectedFile::open(path, origin) {
        Ok(f) => f,
        Err(e) => {
            send_error(tx, ctx, format!("Failed to open file: {e}"));
            return;
        }
    };

    let prepared = prepare_upload(&file.bytes, upload);
    let preview = prepared
        .as_ref()
        .ok()
        .and_then(|image| image.bytes().ok())
        .and_then(|bytes| decode_color_image(&bytes).ok());

    send(
        tx,
        ctx,
        WorkerResult::ImageLoaded {
            input: FileInput {
                name: file.name,
                origin: file.origin,
            },
            prepared,
            preview,
        },
    );
}

fn handle_process(
    client: Option<&HttpClient>,
    pending: PendingProcess,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    // A request without a client still has to be finished, or the controller stays busy.
    let outcome = match client {
        Some(c) => c.process(&pending.request),
        None => Err(handpoint_core::error::HandpointError::InvalidUrl(
            "no server configured".into(),
        )),
    };
    send(
        tx,
        ctx,
        WorkerResult::Processed {
            token: pending.token,
            outcome,
        },
    );
}

fn handle_fetch_result(
    client: &HttpClient,
    display_url: String,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let bytes = match client.fetch_result(&display_url) {
        Ok(b) => b,
        Err(e) => {
            send_error(tx, ctx, format!("Failed to download result: {e}"));
            return;
        }
    };
    match decode_color_image(&bytes) {
        Ok(image) => send(tx, ctx, WorkerResult::ResultImage { display_url, image }),
        Err(e) => send_error(tx, ctx, format!("Failed to decode result: {e}")),
    }
}
