//! Response capture: calls every argument-free operation against a live
//! server and stores each answer as a fixture file.
//!
//! Each file is named after the operation and holds
//! `{"url": <request url, key redacted>, "response": <body>}`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{Client, HistoryQuery};
use crate::error::SabError;
use crate::params::Params;
use crate::response::ApiResponse;

/// Errors that abort a capture run.
///
/// A failing operation does not; it is logged and recorded in
/// [`CaptureSummary::failed`].
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize capture for {operation}: {source}")]
    Serialize {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// An argument-free client operation the capture run can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Auth,
    Queue,
    Version,
    Warnings,
    ServerStats,
    FullStatus,
    History,
    GetConfig,
    Pause,
    Resume,
    PausePostprocessing,
    ResumePostprocessing,
    ScanRss,
    ScanWatchfolder,
    ResetQuota,
    ResetNzbkey,
    PurgeQueue,
    ResetApikey,
}

impl Operation {
    /// Every operation, read-only ones first. `ResetApikey` runs last since
    /// every call after it would be rejected with the old key.
    pub const ALL: [Operation; 18] = [
        Self::Auth,
        Self::Queue,
        Self::Version,
        Self::Warnings,
        Self::ServerStats,
        Self::FullStatus,
        Self::History,
        Self::GetConfig,
        Self::Pause,
        Self::Resume,
        Self::PausePostprocessing,
        Self::ResumePostprocessing,
        Self::ScanRss,
        Self::ScanWatchfolder,
        Self::ResetQuota,
        Self::ResetNzbkey,
        Self::PurgeQueue,
        Self::ResetApikey,
    ];

    /// File stem used for the captured response.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Queue => "queue",
            Self::Version => "version",
            Self::Warnings => "warnings",
            Self::ServerStats => "server_stats",
            Self::FullStatus => "full_status",
            Self::History => "history",
            Self::GetConfig => "get_config",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::PausePostprocessing => "pause_postprocessing",
            Self::ResumePostprocessing => "resume_postprocessing",
            Self::ScanRss => "scan_rss",
            Self::ScanWatchfolder => "scan_watchfolder",
            Self::ResetQuota => "reset_quota",
            Self::ResetApikey => "reset_apikey",
            Self::ResetNzbkey => "reset_nzbkey",
            Self::PurgeQueue => "purge_queue",
        }
    }

    /// Returns `true` when calling the operation changes server state.
    #[must_use]
    pub fn mutates_server(self) -> bool {
        !matches!(
            self,
            Self::Auth
                | Self::Queue
                | Self::Version
                | Self::Warnings
                | Self::ServerStats
                | Self::FullStatus
                | Self::History
                | Self::GetConfig
        )
    }

    /// Calls the operation with its default arguments.
    ///
    /// # Errors
    ///
    /// Whatever the underlying client operation returns.
    pub async fn invoke(self, client: &Client) -> Result<ApiResponse, SabError> {
        match self {
            Self::Auth => client.auth().await,
            Self::Queue => client.queue(Params::new()).await,
            Self::Version => client.version().await,
            Self::Warnings => client.warnings().await,
            Self::ServerStats => client.server_stats().await,
            Self::FullStatus => client.full_status(true).await,
            Self::History => client.history(HistoryQuery::default()).await,
            Self::GetConfig => client.get_config(None, None).await,
            Self::Pause => client.pause(None).await,
            Self::Resume => client.resume().await,
            Self::PausePostprocessing => client.pause_postprocessing().await,
            Self::ResumePostprocessing => client.resume_postprocessing().await,
            Self::ScanRss => client.scan_rss().await,
            Self::ScanWatchfolder => client.scan_watchfolder().await,
            Self::ResetQuota => client.reset_quota().await,
            Self::ResetApikey => client.reset_apikey().await,
            Self::ResetNzbkey => client.reset_nzbkey().await,
            Self::PurgeQueue => client.purge_queue(None, false).await,
        }
    }
}

/// On-disk shape of one captured response.
#[derive(Debug, Serialize)]
struct CaptureRecord<'a> {
    url: &'a str,
    response: Value,
}

/// Outcome of a capture run.
#[derive(Debug, Default)]
pub struct CaptureSummary {
    /// Files written, in call order.
    pub written: Vec<PathBuf>,
    /// Operations whose response was empty.
    pub empty: Vec<&'static str>,
    /// Operations that failed, with the error text.
    pub failed: Vec<(&'static str, String)>,
    /// Mutating operations left out of the run.
    pub skipped: Vec<&'static str>,
}

/// Captures every operation in [`Operation::ALL`] into `out_dir`.
///
/// Mutating operations are only called when `include_mutating` is set.
///
/// # Errors
///
/// Returns [`CaptureError`] when the directory or a file cannot be written.
/// Individual operation failures are logged and collected instead.
pub async fn capture_all(
    client: &Client,
    out_dir: &Path,
    include_mutating: bool,
) -> Result<CaptureSummary, CaptureError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| CaptureError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let mut summary = CaptureSummary::default();
    for operation in Operation::ALL {
        let name = operation.name();
        if operation.mutates_server() && !include_mutating {
            debug!(operation = name, "skipping mutating operation");
            summary.skipped.push(name);
            continue;
        }

        let response = match operation.invoke(client).await {
            Ok(response) => response,
            Err(error) => {
                warn!(operation = name, error = %error, "operation failed");
                summary.failed.push((name, error.to_string()));
                continue;
            }
        };

        if response.is_empty() {
            debug!(operation = name, "empty response, nothing written");
            summary.empty.push(name);
            continue;
        }

        let path = write_capture(out_dir, name, &response).await?;
        info!(operation = name, path = %path.display(), "captured");
        summary.written.push(path);
    }
    Ok(summary)
}

async fn write_capture(
    out_dir: &Path,
    operation: &'static str,
    response: &ApiResponse,
) -> Result<PathBuf, CaptureError> {
    let record = CaptureRecord {
        url: response.url().as_str(),
        response: response.to_value(),
    };
    let mut contents = serde_json::to_string_pretty(&record)
        .map_err(|source| CaptureError::Serialize { operation, source })?;
    contents.push('\n');

    let path = out_dir.join(format!("{operation}.json"));
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| CaptureError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
