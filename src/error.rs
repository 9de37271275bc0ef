//! Error types for client operations.
//!
//! Every failure reaches the caller of the operation that triggered it. The
//! variants separate what the server said (`Api`, `HttpStatus`) from what
//! went wrong on the way there (`Transport`) and from bodies that could not
//! be understood (`Decode`).

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum SabError {
    /// The server answered successfully but reported an application error.
    #[error("SABnzbd API error: {message}")]
    Api {
        /// The server-provided `error` text.
        message: String,
    },

    /// The request never produced a response (timeout, connection failure, closed client).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success HTTP status and a body that is
    /// not a JSON object.
    #[error("HTTP {status} for mode '{mode}'")]
    HttpStatus {
        /// The API mode that was called.
        mode: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, kept for debugging.
        body: String,
    },

    /// The body could not be decoded for the configured output format.
    #[error("failed to decode '{mode}' response: {reason}")]
    Decode {
        /// The API mode that was called.
        mode: String,
        /// What was wrong with the body.
        reason: String,
        /// The underlying JSON error, when there is one.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The base URL given at construction is empty or malformed.
    #[error("invalid SABnzbd URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A configuration value is out of range or unparseable.
    #[error("invalid config value for `{field}`: {reason}")]
    Config {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl SabError {
    /// Creates an application-level API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(mode: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            mode: mode.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error caused by malformed JSON.
    pub fn json(mode: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            mode: mode.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a decode error for a body that parsed but has the wrong shape.
    pub fn decode(mode: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            mode: mode.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the server message for [`SabError::Api`].
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` when the request never got an answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` when the request hit its deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout { .. }))
    }
}

// `From<serde_json::Error>` is deliberately absent: decode errors need the
// mode for context, so `SabError::json` is used at the call site instead.
