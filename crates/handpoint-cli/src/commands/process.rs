use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use handpoint_core::client::HttpClient;
use handpoint_core::config::ClientConfig;
use handpoint_core::consts::TELEMETRY_FLUSH_SECS;
use handpoint_core::controller::{Controller, ProcessStatus};
use handpoint_core::geometry::DisplayRect;
use handpoint_core::io::upload::{ImageOrigin, SelectedFile};
use handpoint_core::telemetry::sink_from_config;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::summary::print_upload_summary;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input image file
    pub file: PathBuf,

    /// Horizontal tap position
    #[arg(short, long, allow_negative_numbers = true)]
    pub x: f32,

    /// Vertical tap position
    #[arg(short, long, allow_negative_numbers = true)]
    pub y: f32,

    /// Size the image was displayed at when tapped, as "WIDTHxHEIGHT".
    /// Without it, x/y are pixels of the input file as picked (before any
    /// downscale of the upload).
    #[arg(long)]
    pub display: Option<String>,

    /// Mark the upload as a camera capture rather than a gallery pick
    #[arg(long)]
    pub camera: bool,

    /// Number of overlay variants to fetch for the same point
    #[arg(long, default_value = "1")]
    pub variants: u32,

    /// Directory results are saved to (defaults to the config value)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ProcessArgs, config: &ClientConfig) -> Result<()> {
    let client = HttpClient::new(config).context("Failed to build HTTP client")?;
    let telemetry = sink_from_config(config)?;
    let mut controller = Controller::new(config.upload.clone(), telemetry);

    let result = process_file(args, config, &client, &mut controller);

    // Telemetry posts run on their own threads; give them a chance to land.
    if !controller.flush_telemetry(Duration::from_secs(TELEMETRY_FLUSH_SECS)) {
        warn!("Some telemetry events were not delivered before exit");
    }
    result
}

fn process_file(
    args: &ProcessArgs,
    config: &ClientConfig,
    client: &HttpClient,
    controller: &mut Controller,
) -> Result<()> {
    let origin = if args.camera {
        ImageOrigin::Camera
    } else {
        ImageOrigin::Gallery
    };
    let file = SelectedFile::open(&args.file, origin)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    controller
        .select_image(Some(file))
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let Some(image) = controller.session().source_image.as_ref() else {
        bail!("No image loaded");
    };
    let original = image.original;
    print_upload_summary(&args.file, image, &config.server_url);

    let rect = match args.display {
        Some(ref spec) => parse_display(spec)?,
        None => DisplayRect::sized(original.width as f32, original.height as f32),
    };
    debug!(x = args.x, y = args.y, width = rect.width, height = rect.height, "Tap position");
    let out_dir = args.output.clone().unwrap_or_else(|| config.save_dir.clone());

    for variant in 0..args.variants.max(1) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!(
            "Compositing overlay {}",
            controller.session().overlay_index
        ));

        let status = if variant == 0 {
            controller.tap(client, args.x, args.y, rect)?
        } else {
            controller.try_different(client)?
        };
        pb.finish_and_clear();

        match status {
            ProcessStatus::Applied {
                display_url,
                next_overlay_index,
            } => {
                let point = controller.session().last_click.unwrap_or_default();
                println!("Composited at {point}: {display_url}");
                let plan = controller
                    .save_result(client, &out_dir, None)
                    .context("Failed to save result")?;
                info!(variant, path = %plan.path.display(), "Result saved");
                println!(
                    "Saved to {} (next overlay {})",
                    plan.path.display(),
                    next_overlay_index
                );
            }
            ProcessStatus::Rejected(message) => bail!("Server error: {message}"),
            ProcessStatus::Failed(message) => bail!(message),
            ProcessStatus::Stale => bail!("Response arrived for a stale session"),
        }
    }

    Ok(())
}

fn parse_display(spec: &str) -> Result<DisplayRect> {
    let (w, h) = spec
        .split_once(['x', 'X'])
        .context("Invalid display size (expected 'WIDTHxHEIGHT')")?;
    let width: f32 = w.trim().parse().context("Invalid display width")?;
    let height: f32 = h.trim().parse().context("Invalid display height")?;
    if width <= 0.0 || height <= 0.0 {
        bail!("Display size must be positive, got {width}x{height}");
    }
    Ok(DisplayRect::sized(width, height))
}
