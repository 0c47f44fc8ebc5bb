//! Default User-Agent for streaming requests.

/// Default User-Agent sent unless the caller sets one.
#[must_use]
pub(crate) fn default_stream_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("jsonstream/{version} (chunked-json-client)")
}
