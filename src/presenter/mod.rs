//! View-model for a single event page.
//!
//! [`EventPresenter`] borrows its inputs and recomputes every field on demand;
//! the only state it knows about is the [`DisplayState`] handed to it.

pub mod capability;
pub mod derive;
pub mod state;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::nostr::event::Event;
use crate::nostr::kind::kind_name;
use capability::{IdentifierCodec, RelayPublisher, SignatureVerifier};
use derive::MediaUrls;
use state::{DisplayState, IdFormat};

pub struct EventPresenter<'a> {
    event: &'a Event,
    author: Option<&'a Event>,
    relays: &'a [String],
    codec: &'a dyn IdentifierCodec,
}

impl<'a> EventPresenter<'a> {
    pub fn new(
        event: &'a Event,
        author: Option<&'a Event>,
        relays: &'a [String],
        codec: &'a dyn IdentifierCodec,
    ) -> Self {
        Self {
            event,
            author,
            relays,
            codec,
        }
    }

    pub fn event(&self) -> &'a Event {
        self.event
    }

    pub fn relays(&self) -> &'a [String] {
        self.relays
    }

    pub fn title(&self) -> String {
        derive::title(self.event)
    }

    pub fn media(&self) -> MediaUrls {
        derive::sniff_media(&self.event.content)
    }

    /// TOML text of a kind-0 profile event.
    pub fn metadata(&self) -> Option<String> {
        if self.event.kind == 0 {
            derive::profile_metadata(&self.event.content)
        } else {
            None
        }
    }

    pub fn npub(&self) -> String {
        self.codec
            .encode_npub(&self.event.pubkey)
            .unwrap_or_else(|e| {
                tracing::debug!(pubkey = %self.event.pubkey, error = %e, "npub encoding failed");
                self.event.pubkey.clone()
            })
    }

    pub fn site_name(&self) -> String {
        derive::site_name(&self.npub(), self.author)
    }

    pub fn description(&self) -> Option<String> {
        let metadata = self.metadata();
        derive::description(self.event, metadata.as_deref()).map(str::to_string)
    }

    /// Link-preview tags, in document order.
    pub fn page_meta(&self) -> Vec<(&'static str, String)> {
        let media = self.media();
        let mut meta = vec![
            ("og:site_name", self.site_name()),
            ("og:title", self.title()),
        ];
        if let Some(image) = media.image {
            meta.push(("og:image", image));
        }
        if let Some(video) = media.video {
            meta.push(("og:video", video));
        }
        if let Some(description) = self.description() {
            meta.push(("og:description", description));
        }
        meta.push(("twitter:card", "summary".to_string()));
        meta
    }

    /// The event id in the requested encoding. Falls back to hex when the id
    /// cannot be encoded.
    pub fn id_display(&self, format: IdFormat) -> String {
        let id = &self.event.id;
        let encoded = match format.normalize(self.event.kind) {
            IdFormat::Hex => return id.clone(),
            IdFormat::Note => self.codec.encode_note(id),
            IdFormat::Nevent => self.codec.encode_nevent(id, self.relays),
        };
        encoded.unwrap_or_else(|e| {
            tracing::debug!(id = %id, error = %e, "id encoding failed");
            id.clone()
        })
    }

    pub fn pubkey_display(&self, hex_visible: bool) -> String {
        if hex_visible {
            self.event.pubkey.clone()
        } else {
            self.npub()
        }
    }

    /// Upper-cased kind name, empty for unknown kinds.
    pub fn kind_label(&self) -> String {
        kind_name(self.event.kind)
            .unwrap_or_default()
            .to_uppercase()
    }

    pub fn date_display(&self) -> String {
        derive::display_date(self.event.created_at)
    }
}

/// Runs the verifier once against the full event and records the outcome.
pub fn check_signature(
    state: DisplayState,
    verifier: &dyn SignatureVerifier,
    event: &Event,
) -> DisplayState {
    let ok = verifier.verify(event);
    tracing::info!(id = %event.id, valid = ok, "signature checked");
    state.with_signature(ok)
}

/// Publishes `event` to every relay in `relays`, one detached task each.
///
/// Best effort: failures are logged and dropped. The handles are returned for
/// callers that want to wait; dropping them does not cancel the tasks.
pub fn rebroadcast(
    publisher: Arc<dyn RelayPublisher>,
    relays: &[String],
    event: &Event,
) -> Vec<JoinHandle<()>> {
    tracing::info!(id = %event.id, relays = relays.len(), "rebroadcasting event");
    relays
        .iter()
        .map(|url| {
            let publisher = publisher.clone();
            let url = url.clone();
            let event = event.clone();
            tokio::spawn(async move {
                if let Err(e) = publisher.publish(url.clone(), event).await {
                    tracing::debug!(relay = %url, error = %e, "rebroadcast failed");
                }
            })
        })
        .collect()
}
