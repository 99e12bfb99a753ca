use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandpointError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid display rect: {width}x{height}")]
    InvalidDisplayRect { width: f32, height: f32 },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("No image loaded")]
    NoSourceImage,

    #[error("No previous click to reuse")]
    NoPreviousClick,

    #[error("No result to save")]
    NoResult,

    #[error("A request is already in flight")]
    RequestInFlight,

    #[error("Server returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Stats period must be between 1 and 365 days (got {0})")]
    InvalidStatsPeriod(u32),

    #[error("Share failed: {0}")]
    Share(String),
}

pub type Result<T> = std::result::Result<T, HandpointError>;
