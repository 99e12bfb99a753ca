mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use handpoint_core::config::ClientConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "handpoint", about = "Point at things in photos with a composited hand")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Client config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the server base URL
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and composite a hand at a point
    Process(commands::process::ProcessArgs),
    /// Downscale an image the way uploads are, without contacting the server
    Resize(commands::resize::ResizeArgs),
    /// Show usage statistics from the server
    Stats(commands::stats::StatsArgs),
    /// Print or save the default client config
    Config(commands::config::ConfigArgs),
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(ref server) = cli.server {
        config.server_url = server.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;
    debug!(server = %config.server_url, "Config loaded");

    match &cli.command {
        Commands::Process(args) => commands::process::run(args, &config),
        Commands::Resize(args) => commands::resize::run(args, &config),
        Commands::Stats(args) => commands::stats::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
