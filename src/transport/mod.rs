//! HTTP transport seam between the client and the network.
//!
//! The client builds a [`TransportRequest`] as plain data, hands it to a
//! [`Transport`], and decodes the [`RawResponse`] it gets back. Keeping the
//! exchange this narrow lets tests substitute an in-process transport and
//! lets callers share one connection pool between several clients.
//!
//! Failures are returned, never swallowed: a timeout or connection error
//! comes back as [`TransportError`] and the caller has to handle it.

mod error;
mod reqwest_transport;

pub use error::TransportError;
pub use reqwest_transport::ReqwestTransport;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::params::APIKEY_KEY;

/// Placeholder written in place of the API key wherever a URL leaves the client.
pub const REDACTED: &str = "REDACTED";

/// HTTP method for a request. The SABnzbd API only needs GET in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A fully built request: the URL already carries the merged query string.
#[derive(Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub timeout: Duration,
}

impl TransportRequest {
    /// The request URL with the API key replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted_url(&self) -> Url {
        redact_api_key(&self.url)
    }

    /// Looks up a query parameter on the request URL.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.redacted_url().as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A response as plain data: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one bounded request.
///
/// Implementations must be safe to share across tasks: a client issues
/// concurrent requests through the same handle.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request, giving up once `request.timeout` has elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;

    /// Releases the underlying resources. Requests issued afterwards fail.
    ///
    /// Only called by a client that owns the transport.
    async fn close(&self) {}
}

/// Returns a copy of `url` with the `apikey` query value replaced.
#[must_use]
pub fn redact_api_key(url: &Url) -> Url {
    if !url.query_pairs().any(|(key, _)| key == APIKEY_KEY) {
        return url.clone();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == APIKEY_KEY {
                (key.into_owned(), REDACTED.to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}
