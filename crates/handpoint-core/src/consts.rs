/// Uploads wider than this (in pixels) are downscaled before sending.
pub const DOWNSCALE_MAX_WIDTH: u32 = 1080;

/// JPEG quality (1-100) used when re-encoding a downscaled upload.
pub const DOWNSCALE_JPEG_QUALITY: u8 = 90;

/// Compositing endpoint path, relative to the server base URL.
pub const PROCESS_PATH: &str = "/process";

/// Telemetry endpoint path, relative to the server base URL.
pub const LOG_EVENT_PATH: &str = "/log-event";

/// Usage statistics endpoint path (HTTP Basic auth).
pub const STATS_PATH: &str = "/stats";

/// Server the client talks to when no config overrides it.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

/// Timeout for compositing and fetch requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Telemetry posts give up much sooner than user-facing requests.
pub const TELEMETRY_TIMEOUT_SECS: u64 = 5;

/// How long a short-lived caller waits for telemetry before exiting.
/// Slightly longer than a single post may take.
pub const TELEMETRY_FLUSH_SECS: u64 = TELEMETRY_TIMEOUT_SECS + 1;

/// Allowed range for the stats period, in days.
pub const STATS_MAX_DAYS: u32 = 365;

/// Prefix of saved result file names (`pointing_<millis>.jpg`).
pub const SAVE_FILE_PREFIX: &str = "pointing_";

/// Message shown for transport failures during processing.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error processing image. Please try again.";
