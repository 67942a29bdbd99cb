//! Request errors, rendered as small HTML pages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::nostr::nip19::Nip19Error;
use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The path segment is not a usable hex or NIP-19 reference.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] Nip19Error),

    /// No relay returned the requested event.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// No relay returned a profile for the requested pubkey.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "request failed");
        let (status, markup) = match &self {
            Self::InvalidIdentifier(err) => (
                StatusCode::BAD_REQUEST,
                render::error_page(
                    "Invalid Identifier",
                    &format!("Expected a hex id or a NIP-19 identifier: {err}"),
                ),
            ),
            Self::EventNotFound(id) => (
                StatusCode::NOT_FOUND,
                render::not_found_page("Event", id, "nevent"),
            ),
            Self::ProfileNotFound(pubkey) => (
                StatusCode::NOT_FOUND,
                render::not_found_page("Profile", pubkey, "nprofile"),
            ),
        };
        (status, crate::api::routes::html_headers(), markup.into_string()).into_response()
    }
}
