//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Capture live SABnzbd API responses as JSON fixture files.
///
/// Calls every argument-free API operation and writes one
/// `<operation>.json` file per non-empty response. The API key is
/// redacted from the stored request URLs.
#[derive(Parser, Debug)]
#[command(name = "sabapi-capture")]
#[command(author, version, about)]
pub struct Args {
    /// Server root URL, e.g. http://localhost:8080 (falls back to SABNZBD_URL)
    #[arg(short, long)]
    pub url: Option<String>,

    /// API key (falls back to SABNZBD_APIKEY)
    #[arg(short, long)]
    pub apikey: Option<String>,

    /// Directory the captured files are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Per-request timeout in seconds, 1-3600 (falls back to SABNZBD_TIMEOUT_SECS, then 10)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Also call operations that change server state (pause, key resets, purge, ...)
    #[arg(long)]
    pub include_mutating: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
