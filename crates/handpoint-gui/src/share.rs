use std::path::Path;

use handpoint_core::error::{HandpointError, Result};
use handpoint_core::io::save::ShareSheet;

/// Hands a saved file to the desktop's default handler.
pub struct SystemShare;

impl ShareSheet for SystemShare {
    fn share(&self, path: &Path) -> Result<()> {
        open::that(path).map_err(|e| HandpointError::Share(e.to_string()))
    }
}
