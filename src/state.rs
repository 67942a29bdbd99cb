//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::nostr::{nip19::Nip19Codec, verify::SchnorrVerifier};
use crate::presenter::capability::{
    EventSource, IdentifierCodec, RelayPublisher, SignatureVerifier,
};
use crate::relay::WsRelayClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn EventSource>,
    pub publisher: Arc<dyn RelayPublisher>,
    pub codec: Arc<dyn IdentifierCodec>,
    pub verifier: Arc<dyn SignatureVerifier>,
}

impl AppState {
    /// Production wiring: websocket relays, NIP-19 codec, schnorr verifier.
    pub fn new(config: Config) -> Self {
        let client = Arc::new(WsRelayClient::new(config.relay_timeout));
        Self {
            config: Arc::new(config),
            source: client.clone(),
            publisher: client,
            codec: Arc::new(Nip19Codec),
            verifier: Arc::new(SchnorrVerifier),
        }
    }
}
