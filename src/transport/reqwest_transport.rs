//! Default [`Transport`] backed by a pooled `reqwest::Client`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use super::{HttpMethod, RawResponse, Transport, TransportError, TransportRequest};
use crate::user_agent;

/// Default connect timeout. The per-request deadline still bounds the whole exchange.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport that sends requests with `reqwest`.
///
/// Cloning the inner `reqwest::Client` is cheap and shares its pool, so a
/// caller that already has one can wrap it with [`ReqwestTransport::from_client`].
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    closed: AtomicBool,
}

impl ReqwestTransport {
    /// Builds a transport with the crate's default user agent.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] when the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_user_agent(user_agent::default_user_agent())
    }

    /// Builds a transport sending `user_agent` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] when the HTTP client cannot be constructed.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Result<Self, TransportError> {
        let client = base_builder(user_agent.into())
            .build()
            .map_err(|source| TransportError::Build { source })?;
        Ok(Self::from_client(client))
    }

    /// Wraps an existing `reqwest::Client`.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns `true` once [`Transport::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn send(
        &self,
        request: &TransportRequest,
        url: &str,
    ) -> Result<RawResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url.clone()),
            HttpMethod::Post => self.client.post(request.url.clone()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, request.timeout, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, request.timeout, e))?;

        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let url = request.redacted_url().to_string();
        let outcome = tokio::time::timeout(request.timeout, self.send(&request, &url)).await;
        match outcome {
            Ok(Ok(response)) => {
                debug!(
                    method = request.method.as_str(),
                    url = %url,
                    status = response.status,
                    "request completed"
                );
                Ok(response)
            }
            Ok(Err(error)) => {
                warn!(
                    method = request.method.as_str(),
                    url = %url,
                    error = %error,
                    "request failed"
                );
                Err(error)
            }
            Err(_elapsed) => {
                warn!(
                    method = request.method.as_str(),
                    url = %url,
                    timeout = ?request.timeout,
                    "request timed out"
                );
                Err(TransportError::timeout(url, request.timeout))
            }
        }
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("reqwest transport closed");
        }
    }
}

fn base_builder(user_agent: String) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent)
        .gzip(true)
}

fn map_reqwest_error(url: &str, timeout: Duration, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(url, timeout)
    } else {
        TransportError::network(url, error)
    }
}
