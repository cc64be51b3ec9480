//! Channel endpoint derivation.
//!
//! The chat channel always lives on the host that served the page, at a
//! fixed path. Only the scheme varies: a page loaded over a secure transport
//! gets the secure channel scheme.

use url::Url;

use crate::constants::CHAT_PATH;
use crate::error::EndpointError;

/// Derive the channel endpoint for a page URL.
///
/// `https://chat.example.org/index.html` becomes `wss://chat.example.org/ws`
/// and `http://localhost:8080/` becomes `ws://localhost:8080/ws`. Query,
/// fragment and credentials of the page are never carried over.
pub fn derive_endpoint(page: &Url) -> Result<Url, EndpointError> {
    let scheme = match page.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
    };

    let host = page
        .host_str()
        .ok_or_else(|| EndpointError::Invalid(format!("{page} has no host")))?;
    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Url::parse(&format!("{scheme}://{authority}{CHAT_PATH}"))
        .map_err(|e| EndpointError::Invalid(e.to_string()))
}
