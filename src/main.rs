//! CLI entry point for the response capture tool.

use anyhow::{Context, Result, bail};
use clap::Parser;
use sabapi::{Client, ClientConfig, capture_all};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(
        url = ?args.url,
        out_dir = %args.out_dir.display(),
        include_mutating = args.include_mutating,
        "CLI arguments parsed"
    );

    // Flags override the environment
    let mut config = ClientConfig::from_env().context("invalid SABNZBD_* environment")?;
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(api_key) = args.apikey {
        config.api_key = api_key;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    if config.url.trim().is_empty() {
        bail!("no server URL given; pass --url or set SABNZBD_URL");
    }

    let client = Client::from_config(&config).context("failed to create API client")?;
    info!(endpoint = %client.endpoint(), "capturing responses");

    let result = capture_all(&client, &args.out_dir, args.include_mutating).await;
    client.close().await;
    let summary = result
        .with_context(|| format!("failed to write captures to {}", args.out_dir.display()))?;

    info!(
        written = summary.written.len(),
        empty = summary.empty.len(),
        failed = summary.failed.len(),
        skipped = summary.skipped.len(),
        "Capture complete"
    );

    Ok(())
}
