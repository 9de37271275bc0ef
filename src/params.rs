//! Query parameter values and the merge rules applied before every request.
//!
//! The SABnzbd API only understands flat `key=value` query strings. Values
//! are kept typed until the last moment so booleans can be rendered as the
//! `1`/`0` encoding the server expects instead of `true`/`false`.

use std::collections::BTreeMap;
use std::fmt;

/// Parameter key carrying the API key.
pub const APIKEY_KEY: &str = "apikey";
/// Parameter key carrying the requested output format.
pub const OUTPUT_KEY: &str = "output";
/// Parameter key selecting the remote operation.
pub const MODE_KEY: &str = "mode";

/// A single scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Sent verbatim.
    Str(String),
    /// Sent in decimal.
    Int(i64),
    /// Sent as `1` or `0`, never as a literal boolean token.
    Bool(bool),
}

impl ParamValue {
    /// Renders the value the way it appears in the query string.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Str(value) => value.clone(),
            Self::Int(value) => value.to_string(),
            Self::Bool(value) => i64::from(*value).to_string(),
        }
    }

    /// Replaces a boolean with its integer encoding; other values pass through.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Bool(value) => Self::Int(i64::from(value)),
            other => other,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Ordered mapping of parameter name to value.
///
/// Keys are kept sorted so the generated query string is stable, which keeps
/// captured URLs and test assertions deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(
        mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Merges per-call arguments, the mode and the client defaults.
    ///
    /// Precedence, lowest first: `self` (caller arguments), then `mode`, then
    /// `defaults`. Callers therefore cannot override `mode`, `output` or
    /// `apikey`; every other key they supply is kept. Booleans are normalized
    /// to `1`/`0` in the result.
    #[must_use]
    pub fn merged(self, mode: &str, defaults: &Params) -> Params {
        let mut entries = self.entries;
        entries.insert(MODE_KEY.to_string(), ParamValue::from(mode));
        for (key, value) in &defaults.entries {
            entries.insert(key.clone(), value.clone());
        }
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key, value.normalized()))
            .collect();
        Params { entries }
    }

    /// Renders every pair as query-string ready strings.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.to_query_value()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn defaults() -> Params {
        Params::new().with(OUTPUT_KEY, "json").with(APIKEY_KEY, "secret")
    }

    #[test]
    fn test_bool_renders_as_one_or_zero() {
        assert_eq!(ParamValue::from(true).to_query_value(), "1");
        assert_eq!(ParamValue::from(false).to_query_value(), "0");
    }

    #[test]
    fn test_merged_normalizes_booleans() {
        let merged = Params::new()
            .with("del_files", true)
            .with("skip_dashboard", false)
            .merged("queue", &defaults());

        assert_eq!(merged.get("del_files"), Some(&ParamValue::Int(1)));
        assert_eq!(merged.get("skip_dashboard"), Some(&ParamValue::Int(0)));
        assert!(
            merged
                .iter()
                .all(|(_, value)| !matches!(value, ParamValue::Bool(_))),
            "no boolean may survive the merge"
        );
    }

    #[test]
    fn test_merged_defaults_win_over_caller_output_and_apikey() {
        let merged = Params::new()
            .with(OUTPUT_KEY, "xml")
            .with(APIKEY_KEY, "stolen")
            .merged("version", &defaults());

        assert_eq!(merged.get(OUTPUT_KEY), Some(&ParamValue::from("json")));
        assert_eq!(merged.get(APIKEY_KEY), Some(&ParamValue::from("secret")));
    }

    #[test]
    fn test_merged_mode_cannot_be_overridden_by_caller() {
        let merged = Params::new()
            .with(MODE_KEY, "shutdown")
            .merged("queue", &defaults());
        assert_eq!(merged.get(MODE_KEY), Some(&ParamValue::from("queue")));
    }

    #[test]
    fn test_merged_keeps_other_caller_keys() {
        let merged = Params::new()
            .with("name", "delete")
            .with("value", "SABnzbd_nzo_1")
            .merged("queue", &defaults());

        assert_eq!(merged.len(), 5);
        assert_eq!(merged.get("name"), Some(&ParamValue::from("delete")));
        assert_eq!(merged.get("value"), Some(&ParamValue::from("SABnzbd_nzo_1")));
    }

    #[test]
    fn test_with_opt_skips_none() {
        let params = Params::new()
            .with_opt("password", None::<&str>)
            .with_opt("search", Some("linux"));
        assert!(!params.contains_key("password"));
        assert_eq!(params.get("search"), Some(&ParamValue::from("linux")));
    }

    #[test]
    fn test_query_pairs_are_sorted_by_key() {
        let pairs = Params::new()
            .with("value2", 3)
            .with("mode", "switch")
            .with("value", "a")
            .to_query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["mode", "value", "value2"]);
    }

    #[test]
    fn test_from_iterator_collects_pairs() {
        let params: Params = [("start", 10), ("limit", 20)].into_iter().collect();
        assert_eq!(params.get("limit"), Some(&ParamValue::Int(20)));
    }
}
