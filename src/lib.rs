//! Async client for the SABnzbd HTTP API.
//!
//! A [`Client`] wraps the single `/sabnzbd/api` endpoint: every operation
//! selects a `mode`, adds its parameters, and gets back a decoded
//! [`ApiResponse`] or a [`SabError`].
//!
//! # Architecture
//!
//! - [`client`] - construction, dispatch and the operation catalog
//! - [`params`] - typed query parameters and the merge rules
//! - [`response`] - response decoding and `error` field handling
//! - [`transport`] - the HTTP seam, with a `reqwest` implementation
//! - [`config`] - explicit and environment-based configuration
//! - [`capture`] - records live responses as fixture files
//!
//! ```no_run
//! # async fn example() -> Result<(), sabapi::SabError> {
//! let client = sabapi::Client::new("http://localhost:8080", "apikey")?;
//! let version = client.version().await?;
//! println!("{:?}", version.get("version"));
//! client.close().await;
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod client;
pub mod config;
pub mod error;
pub mod params;
pub mod response;
pub mod transport;
pub mod types;

pub(crate) mod user_agent;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test_support;

// Re-export commonly used types
pub use capture::{CaptureError, CaptureSummary, Operation, capture_all};
pub use client::{AddOptions, Client, ClientBuilder, HistoryQuery, Request};
pub use config::ClientConfig;
pub use error::SabError;
pub use params::{ParamValue, Params};
pub use response::{ApiResponse, ResponseBody};
pub use transport::{
    HttpMethod, RawResponse, ReqwestTransport, Transport, TransportError, TransportRequest,
};
pub use types::{JobIds, OutputFormat, PostProcessing, Priority};
