use std::fmt;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::config::UploadConfig;
use crate::error::{HandpointError, Result};
use crate::geometry::ImageSize;
use crate::io::data_url;

/// Where the user picked the image from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    Gallery,
    Camera,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gallery => write!(f, "gallery"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

/// A file handed over by a file picker or camera capture, read fully into memory.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub name: Option<String>,
    pub origin: ImageOrigin,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn open(path: &Path, origin: ImageOrigin) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            origin,
            bytes,
        })
    }
}

/// The encoded image payload held by the session and sent to the server.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub data_url: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    /// True when the payload was re-encoded at a smaller width.
    pub downscaled: bool,
    /// Dimensions of the file as picked, before any downscale.
    pub original: ImageSize,
}

impl SourceImage {
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw encoded bytes behind the data URL.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        data_url::decode(&self.data_url).map(|(_, bytes)| bytes)
    }
}

/// Target size for a `width`x`height` image under a `max_width` cap.
///
/// Returns the input unchanged when no downscale is needed.
pub fn downscaled_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || max_width == 0 {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, scaled.max(1))
}

/// Decode an uploaded file and turn it into the payload the server expects.
///
/// Images wider than `config.max_width` are resized and re-encoded as JPEG;
/// anything else keeps its original bytes.
pub fn prepare_upload(bytes: &[u8], config: &UploadConfig) -> Result<SourceImage> {
    let format = image::guess_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(HandpointError::InvalidDimensions { width, height });
    }

    let original = ImageSize { width, height };
    let (target_w, target_h) = downscaled_size(width, height, config.max_width);
    if (target_w, target_h) == (width, height) {
        let mime = format.to_mime_type();
        debug!(width, height, mime, "Upload kept at original size");
        return Ok(SourceImage {
            data_url: data_url::encode(mime, bytes),
            mime: mime.to_string(),
            width,
            height,
            downscaled: false,
            original,
        });
    }

    let encoded = encode_jpeg(&img, target_w, target_h, config.jpeg_quality)?;
    debug!(
        from_width = width,
        from_height = height,
        to_width = target_w,
        to_height = target_h,
        bytes = encoded.len(),
        "Upload downscaled"
    );

    Ok(SourceImage {
        data_url: data_url::encode("image/jpeg", &encoded),
        mime: "image/jpeg".to_string(),
        width: target_w,
        height: target_h,
        downscaled: true,
        original,
    })
}

fn encode_jpeg(img: &DynamicImage, width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel, so flatten to RGB first.
    let rgb = img.resize_exact(width, height, FilterType::Triangle).to_rgb8();

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
    Ok(buf)
}
