//! Decoded API responses and the rules that turn raw bodies into them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::error::SabError;
use crate::transport::RawResponse;
use crate::types::OutputFormat;

/// Key the server uses to report application-level failures.
pub const ERROR_KEY: &str = "error";

/// Body of a successful response, shaped by the configured output format.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// A decoded JSON object.
    Json(Map<String, Value>),
    /// Raw XML text. Parsing into a tree is left to the caller.
    Xml(String),
    /// Raw text for any other output format.
    Text(String),
}

/// A successful API response together with what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    mode: String,
    status: u16,
    url: Url,
    body: ResponseBody,
}

impl ApiResponse {
    /// Assembles a response. `url` should already be redacted.
    #[must_use]
    pub fn new(mode: impl Into<String>, status: u16, url: Url, body: ResponseBody) -> Self {
        Self {
            mode: mode.into(),
            status,
            url,
            body,
        }
    }

    /// The API mode that was called.
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// The HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The request URL with the API key redacted.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    #[must_use]
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// The decoded object for JSON responses.
    #[must_use]
    pub fn json(&self) -> Option<&Map<String, Value>> {
        match &self.body {
            ResponseBody::Json(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the response, returning the decoded object for JSON responses.
    #[must_use]
    pub fn into_json(self) -> Option<Map<String, Value>> {
        match self.body {
            ResponseBody::Json(map) => Some(map),
            _ => None,
        }
    }

    /// The raw text for XML and text responses.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Xml(text) | ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    /// Looks up a top-level key of a JSON response.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.json().and_then(|map| map.get(key))
    }

    /// Returns `true` for an empty object or blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ResponseBody::Json(map) => map.is_empty(),
            ResponseBody::Xml(text) | ResponseBody::Text(text) => text.trim().is_empty(),
        }
    }

    /// The body as a JSON value; text bodies become JSON strings.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match &self.body {
            ResponseBody::Json(map) => Value::Object(map.clone()),
            ResponseBody::Xml(text) | ResponseBody::Text(text) => Value::String(text.clone()),
        }
    }

    /// Deserializes a JSON response into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::Decode`] when the response is not JSON or does not
    /// match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, SabError> {
        let Some(map) = self.json() else {
            return Err(SabError::decode(&self.mode, "response is not JSON"));
        };
        serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| SabError::json(&self.mode, e))
    }
}

/// Turns a raw response into an [`ApiResponse`] or the error it represents.
///
/// Non-2xx answers are decoded like any other; the status stays available
/// through [`ApiResponse::status`].
///
/// # Errors
///
/// - [`SabError::Api`] when a 2xx JSON body carries a truthy `error`.
/// - [`SabError::Decode`] when a 2xx JSON body is malformed or not an object.
/// - [`SabError::HttpStatus`] when a non-2xx JSON body is not an object.
pub fn decode(
    mode: &str,
    format: OutputFormat,
    url: Url,
    raw: RawResponse,
) -> Result<ApiResponse, SabError> {
    let body = match format {
        OutputFormat::Json => ResponseBody::Json(json_object(mode, &raw)?),
        OutputFormat::Xml => ResponseBody::Xml(raw.body),
        OutputFormat::Text => ResponseBody::Text(raw.body),
    };

    Ok(ApiResponse::new(mode, raw.status, url, body))
}

fn json_object(mode: &str, raw: &RawResponse) -> Result<Map<String, Value>, SabError> {
    if !raw.is_success() {
        return match serde_json::from_str(&raw.body) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(SabError::http_status(mode, raw.status, raw.body.as_str())),
        };
    }

    let value: Value = serde_json::from_str(&raw.body).map_err(|e| SabError::json(mode, e))?;
    let Value::Object(map) = value else {
        return Err(SabError::decode(mode, "expected a JSON object"));
    };
    if let Some(message) = map.get(ERROR_KEY).and_then(error_message) {
        return Err(SabError::api(message));
    }
    Ok(map)
}

/// Extracts the message from an `error` value if it counts as set.
///
/// `null`, `false`, `0`, `""` and empty collections mean "no error".
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
