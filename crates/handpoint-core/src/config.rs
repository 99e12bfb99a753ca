use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, DOWNSCALE_JPEG_QUALITY, DOWNSCALE_MAX_WIDTH,
};
use crate::error::Result;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the compositing server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Directory saved results are written to.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_save_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            save_dir: default_save_dir(),
            upload: UploadConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Uploads wider than this are downscaled to exactly this width.
    pub max_width: u32,
    /// JPEG quality (1-100) for downscaled uploads.
    pub jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_width: DOWNSCALE_MAX_WIDTH,
            jpeg_quality: DOWNSCALE_JPEG_QUALITY,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    /// Send usage events to `/log-event`.
    pub telemetry: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            telemetry: true,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
