use std::path::{Path, PathBuf};

use tracing::info;

use crate::client::CompositingService;
use crate::consts::SAVE_FILE_PREFIX;
use crate::error::Result;

/// Where a result is fetched from and written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavePlan {
    /// Result reference exactly as the server returned it.
    pub url: String,
    pub path: PathBuf,
}

impl SavePlan {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// `pointing_<millis>.jpg`
pub fn save_file_name(millis: u64) -> String {
    format!("{SAVE_FILE_PREFIX}{millis}.jpg")
}

/// Download the result and write it to `plan.path`. Returns the byte count.
pub fn write_result(service: &dyn CompositingService, plan: &SavePlan) -> Result<usize> {
    let bytes = service.fetch_result(&plan.url)?;
    if let Some(parent) = plan.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&plan.path, &bytes)?;
    info!(path = %plan.path.display(), bytes = bytes.len(), "Result saved");
    Ok(bytes.len())
}

/// A platform share facility. Optional: a surface without one simply saves.
pub trait ShareSheet {
    fn share(&self, path: &Path) -> Result<()>;
}
