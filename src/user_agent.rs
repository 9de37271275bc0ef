//! User-Agent string sent by the default transport.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/Hellowlol/sabapi";

/// Default User-Agent (identifies the library and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("sabapi/{version} (+{PROJECT_UA_URL})")
}
