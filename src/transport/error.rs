//! Transport-level failures: the request produced no usable response.

use std::time::Duration;

use thiserror::Error;

/// Errors raised before a response could be obtained.
///
/// URLs stored here have already had the API key redacted.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The scoped deadline elapsed before the response was fully read.
    #[error("timeout after {after:?} requesting {url}")]
    Timeout {
        /// The (redacted) request URL.
        url: String,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The (redacted) request URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Connection failure reported by a non-reqwest transport.
    #[error("connection failed requesting {url}: {reason}")]
    Connect {
        /// The (redacted) request URL.
        url: String,
        /// Why the connection failed.
        reason: String,
    },

    /// The owning client was closed; no further requests are accepted.
    #[error("transport is closed")]
    Closed,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Build {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            url: url.into(),
            after,
        }
    }

    /// Creates a network error from a reqwest error.
    ///
    /// The URL reqwest attached is dropped since it still carries the API key.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source: source.without_url(),
        }
    }

    /// Creates a connection error with a free-form reason.
    pub fn connect(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connect {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = TransportError::timeout("http://m:8080/sabnzbd/api", Duration::from_secs(10));
        let msg = error.to_string();
        assert!(msg.contains("timeout"), "Expected 'timeout' in: {msg}");
        assert!(msg.contains("10s"), "Expected duration in: {msg}");
        assert!(msg.contains("http://m:8080/sabnzbd/api"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_connect_display() {
        let error = TransportError::connect("http://m:8080/sabnzbd/api", "connection refused");
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(TransportError::Closed.to_string(), "transport is closed");
    }
}
