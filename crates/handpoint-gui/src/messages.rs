use std::path::PathBuf;

use handpoint_core::config::{ClientConfig, UploadConfig};
use handpoint_core::controller::{PendingProcess, RequestToken};
use handpoint_core::error::Result;
use handpoint_core::io::save::SavePlan;
use handpoint_core::io::upload::{ImageOrigin, SourceImage};
use handpoint_core::protocol::ProcessResponse;
use handpoint_core::session::FileInput;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Read, downscale and preview a picked file.
    LoadImage {
        path: PathBuf,
        origin: ImageOrigin,
        upload: UploadConfig,
    },

    /// Send an admitted compositing request.
    Process { pending: PendingProcess },

    /// Download and decode a result for display.
    FetchResult { display_url: String },

    /// Download a result and write it to disk.
    SaveResult { plan: SavePlan },

    /// Rebuild the HTTP client after a config change.
    Reconfigure { config: ClientConfig },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    ImageLoaded {
        input: FileInput,
        prepared: Result<SourceImage>,
        preview: Option<egui::ColorImage>,
    },
    Processed {
        token: RequestToken,
        outcome: Result<ProcessResponse>,
    },
    ResultImage {
        display_url: String,
        image: egui::ColorImage,
    },
    Saved {
        plan: SavePlan,
        result: Result<usize>,
    },
    SaveDirPicked {
        dir: PathBuf,
    },
    ConfigImported {
        config: ClientConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
