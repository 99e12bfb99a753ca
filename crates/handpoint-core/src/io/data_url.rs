use base64::{engine::general_purpose, Engine as _};

use crate::error::{HandpointError, Result};

/// Encode raw bytes as a `data:<mime>;base64,<payload>` URL.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded bytes.
pub fn decode(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| HandpointError::InvalidDataUrl("missing data: scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| HandpointError::InvalidDataUrl("missing ',' separator".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| HandpointError::InvalidDataUrl("only base64 payloads are supported".into()))?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| HandpointError::InvalidDataUrl(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}
