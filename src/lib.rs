//! Server-rendered pages for single Nostr events.
//!
//! `GET /e/{id}` fetches an event from relays and renders its id, author,
//! kind, date, tags, content and signature, with link-driven display toggles,
//! an on-demand signature check and a best-effort re-broadcast.

pub mod api;
pub mod config;
pub mod error;
pub mod nostr;
pub mod presenter;
pub mod relay;
pub mod render;
pub mod state;

pub use config::Config;
pub use state::AppState;
