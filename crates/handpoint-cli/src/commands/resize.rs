use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use handpoint_core::config::{ClientConfig, UploadConfig};
use handpoint_core::io::upload::prepare_upload;

#[derive(Args)]
pub struct ResizeArgs {
    /// Input image file
    pub file: PathBuf,

    /// Maximum width in pixels (defaults to the config value)
    #[arg(long)]
    pub max_width: Option<u32>,

    /// JPEG quality for downscaled output (1-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Output file path
    #[arg(short, long, default_value = "upload.jpg")]
    pub output: PathBuf,
}

pub fn run(args: &ResizeArgs, config: &ClientConfig) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let upload = UploadConfig {
        max_width: args.max_width.unwrap_or(config.upload.max_width),
        jpeg_quality: args.quality.unwrap_or(config.upload.jpeg_quality),
    };
    let prepared = prepare_upload(&bytes, &upload)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;

    if prepared.downscaled {
        println!(
            "Downscaled to {}x{} ({}, quality {})",
            prepared.width, prepared.height, prepared.mime, upload.jpeg_quality
        );
    } else {
        println!(
            "Kept original {}x{} ({})",
            prepared.width, prepared.height, prepared.mime
        );
    }

    let payload = prepared.bytes()?;
    std::fs::write(&args.output, &payload)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Saved {:.1} KB to {}",
        payload.len() as f64 / 1024.0,
        args.output.display()
    );

    Ok(())
}
