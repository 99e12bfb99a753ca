mod common;

use approx::assert_relative_eq;
use handpoint_core::config::UploadConfig;
use handpoint_core::io::data_url;
use handpoint_core::io::upload::{downscaled_size, prepare_upload};
use image::{GenericImageView, ImageFormat};

use common::encoded_image;

#[test]
fn test_downscaled_size_keeps_narrow_images() {
    assert_eq!(downscaled_size(800, 600, 1080), (800, 600));
    assert_eq!(downscaled_size(1080, 2000, 1080), (1080, 2000));
}

#[test]
fn test_downscaled_size_preserves_aspect() {
    assert_eq!(downscaled_size(2000, 1000, 1080), (1080, 540));
    assert_eq!(downscaled_size(4032, 3024, 1080), (1080, 810));
    // Extremely wide strips never collapse to zero rows.
    assert_eq!(downscaled_size(100_000, 10, 1080), (1080, 1));
}

#[test]
fn test_small_image_keeps_original_bytes() {
    let bytes = encoded_image(640, 480, ImageFormat::Png);
    let prepared = prepare_upload(&bytes, &UploadConfig::default()).unwrap();

    assert!(!prepared.downscaled);
    assert_eq!(prepared.mime, "image/png");
    assert_eq!((prepared.width, prepared.height), (640, 480));
    assert_eq!(prepared.original, prepared.size());
    assert_eq!(prepared.bytes().unwrap(), bytes);
    assert!(prepared.data_url.starts_with("data:image/png;base64,"));
}

#[test]
fn test_wide_image_is_downscaled_to_threshold() {
    let bytes = encoded_image(2000, 1000, ImageFormat::Png);
    let prepared = prepare_upload(&bytes, &UploadConfig::default()).unwrap();

    assert!(prepared.downscaled);
    assert_eq!(prepared.mime, "image/jpeg");
    assert_eq!((prepared.width, prepared.height), (1080, 540));
    assert_eq!(
        (prepared.original.width, prepared.original.height),
        (2000, 1000)
    );

    let (mime, payload) = data_url::decode(&prepared.data_url).unwrap();
    assert_eq!(mime, "image/jpeg");
    let decoded = image::load_from_memory(&payload).unwrap();
    assert_eq!(decoded.dimensions(), (1080, 540));
}

#[test]
fn test_downscale_respects_configured_width() {
    let config = UploadConfig {
        max_width: 300,
        jpeg_quality: 50,
    };
    let bytes = encoded_image(901, 677, ImageFormat::Jpeg);
    let prepared = prepare_upload(&bytes, &config).unwrap();

    assert_eq!(prepared.width, 300);
    let original_ratio = 901.0 / 677.0;
    let stored_ratio = prepared.width as f64 / prepared.height as f64;
    assert_relative_eq!(original_ratio, stored_ratio, epsilon = 0.01);
}

#[test]
fn test_garbage_bytes_are_rejected() {
    let result = prepare_upload(b"definitely not an image", &UploadConfig::default());
    assert!(result.is_err());
}
