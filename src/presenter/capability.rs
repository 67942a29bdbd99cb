//! Protocol capabilities the presenter depends on.
//!
//! Production implementations live in [`crate::nostr`] and [`crate::relay`];
//! tests substitute fakes.

use futures_util::future::BoxFuture;

use crate::nostr::{event::Event, nip19::Nip19Error};

pub trait IdentifierCodec: Send + Sync {
    fn encode_note(&self, id: &str) -> Result<String, Nip19Error>;
    fn encode_nevent(&self, id: &str, relays: &[String]) -> Result<String, Nip19Error>;
    fn encode_npub(&self, pubkey: &str) -> Result<String, Nip19Error>;
}

pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, event: &Event) -> bool;
}

pub trait RelayPublisher: Send + Sync {
    /// Connects to `url` and publishes `event` unchanged.
    fn publish(&self, url: String, event: Event) -> BoxFuture<'static, anyhow::Result<()>>;
}

pub trait EventSource: Send + Sync {
    /// Looks up a single event by hex id.
    fn fetch_event(&self, id: String, relays: Vec<String>) -> BoxFuture<'static, Option<Event>>;

    /// Looks up the newest kind-0 profile event of `pubkey`.
    fn fetch_profile(
        &self,
        pubkey: String,
        relays: Vec<String>,
    ) -> BoxFuture<'static, Option<Event>>;
}
