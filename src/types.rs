//! Small domain types shared by the client operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SabError;
use crate::params::ParamValue;

/// Response encoding requested from the server via the `output` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Decoded into a JSON object; `error` fields become [`SabError::Api`].
    #[default]
    Json,
    /// Returned as raw text.
    Xml,
    /// Returned as raw text.
    Text,
}

impl OutputFormat {
    /// Returns the wire name sent as `output=`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = SabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "text" => Ok(Self::Text),
            other => Err(SabError::config(
                "output",
                format!("unknown output format '{other}', expected json, xml or text"),
            )),
        }
    }
}

/// Queue priority for newly added or existing jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Use the category's priority.
    #[default]
    Default,
    /// Add the job paused.
    Paused,
    Low,
    Normal,
    High,
    /// Start immediately, even when the queue is paused.
    Force,
}

impl Priority {
    /// Numeric code understood by the API.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Default => -100,
            Self::Paused => -2,
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
            Self::Force => 2,
        }
    }
}

impl From<Priority> for ParamValue {
    fn from(value: Priority) -> Self {
        ParamValue::Int(value.code())
    }
}

/// Post-processing level applied after a job finishes downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostProcessing {
    /// Use the category's setting.
    Default,
    None,
    #[default]
    Repair,
    RepairUnpack,
    RepairUnpackDelete,
}

impl PostProcessing {
    /// Numeric code understood by the API.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Default => -1,
            Self::None => 0,
            Self::Repair => 1,
            Self::RepairUnpack => 2,
            Self::RepairUnpackDelete => 3,
        }
    }
}

impl From<PostProcessing> for ParamValue {
    fn from(value: PostProcessing) -> Self {
        ParamValue::Int(value.code())
    }
}

/// One or more job identifiers (nzo ids), or a wildcard.
///
/// The literal strings `all` and `failed` convert to the wildcard variants so
/// `JobIds::from("all")` behaves like the server expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobIds {
    /// Explicit ids, sent comma separated.
    Ids(Vec<String>),
    /// Every job.
    All,
    /// Every failed job. Only meaningful for history deletion.
    Failed,
}

impl JobIds {
    /// Wire form of the selector.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Ids(ids) => ids.join(","),
            Self::All => "all".to_string(),
            Self::Failed => "failed".to_string(),
        }
    }
}

impl From<&str> for JobIds {
    fn from(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "failed" => Self::Failed,
            id => Self::Ids(vec![id.to_string()]),
        }
    }
}

impl From<String> for JobIds {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for JobIds {
    fn from(value: Vec<String>) -> Self {
        Self::Ids(value)
    }
}

impl From<&[&str]> for JobIds {
    fn from(value: &[&str]) -> Self {
        Self::Ids(value.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for JobIds {
    fn from(value: [&str; N]) -> Self {
        Self::Ids(value.iter().map(ToString::to_string).collect())
    }
}

impl From<&JobIds> for ParamValue {
    fn from(value: &JobIds) -> Self {
        ParamValue::Str(value.to_query_value())
    }
}
