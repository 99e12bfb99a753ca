use anyhow::{Context, Result};
use clap::Args;
use handpoint_core::client::HttpClient;
use handpoint_core::config::ClientConfig;

use crate::summary::print_stats;

#[derive(Args)]
pub struct StatsArgs {
    /// Number of days to report (1-365)
    #[arg(long, default_value = "7")]
    pub days: u32,

    /// Stats user name
    #[arg(short, long, default_value = "admin")]
    pub user: String,

    /// Stats password
    #[arg(short, long)]
    pub password: String,
}

pub fn run(args: &StatsArgs, config: &ClientConfig) -> Result<()> {
    let client = HttpClient::new(config).context("Failed to build HTTP client")?;
    let stats = client
        .fetch_stats(args.days, &args.user, &args.password)
        .with_context(|| format!("Failed to fetch stats from {}", client.base_url()))?;

    print_stats(&stats);
    Ok(())
}
