//! Loads canned API responses from `tests/fixtures/`.
//!
//! A fixture is either a bare JSON body or the capture tool's
//! `{"url": ..., "response": ...}` envelope; both load as the body.

use std::path::PathBuf;

use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MOCK_API_KEY: &str = "12345";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Reads a fixture and unwraps the capture envelope if present.
pub fn load(name: &str) -> Value {
    let raw = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("cannot read fixture {name}: {e}"));
    let value: Value =
        serde_json::from_str(&raw).unwrap_or_else(|e| panic!("fixture {name} is not JSON: {e}"));
    match value {
        Value::Object(mut map) if map.contains_key("url") && map.contains_key("response") => {
            map.remove("response").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Serves `fixture` for every GET on the API path with the given `mode`.
pub async fn mount_mode(server: &MockServer, mode: &str, fixture: &str) {
    Mock::given(method("GET"))
        .and(path("/sabnzbd/api"))
        .and(query_param("mode", mode))
        .respond_with(ResponseTemplate::new(200).set_body_json(load(fixture)))
        .mount(server)
        .await;
}
