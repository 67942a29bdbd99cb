//! Event id and BIP-340 signature checks (NIP-01).

use secp256k1::{schnorr, Message, Secp256k1, XOnlyPublicKey};
use serde_json::json;
use sha2::{Digest, Sha256};

use super::event::Event;
use crate::presenter::capability::SignatureVerifier;

/// sha256 over `[0, pubkey, created_at, kind, tags, content]`.
pub fn compute_id(event: &Event) -> [u8; 32] {
    let serialized = json!([
        0,
        event.pubkey,
        event.created_at,
        event.kind,
        event.tags,
        event.content
    ])
    .to_string();
    Sha256::digest(serialized.as_bytes()).into()
}

/// True when the id commits to the event fields and `sig` signs that id.
pub fn verify_event(event: &Event) -> bool {
    let id = compute_id(event);
    if hex::encode(id) != event.id.to_lowercase() {
        tracing::debug!(id = %event.id, "event id does not match its contents");
        return false;
    }
    let Ok(pubkey_bytes) = hex::decode(&event.pubkey) else {
        return false;
    };
    let Ok(sig_bytes) = hex::decode(&event.sig) else {
        return false;
    };
    let Ok(pubkey) = XOnlyPublicKey::from_slice(&pubkey_bytes) else {
        return false;
    };
    let Ok(sig) = schnorr::Signature::from_slice(&sig_bytes) else {
        return false;
    };
    let secp = Secp256k1::verification_only();
    secp.verify_schnorr(&sig, &Message::from_digest(id), &pubkey)
        .is_ok()
}

/// [`SignatureVerifier`] running [`verify_event`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrVerifier;

impl SignatureVerifier for SchnorrVerifier {
    fn verify(&self, event: &Event) -> bool {
        verify_event(event)
    }
}
