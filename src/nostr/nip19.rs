//! NIP-19 bech32 identifiers: `npub`, `note`, `nevent`, `nprofile`.
//!
//! `note` and `npub` are the bare 32 bytes. `nevent` and `nprofile` are TLV
//! lists: type 0 is the id/pubkey, type 1 a relay url (repeatable), type 2 the
//! author pubkey and type 3 the kind as a big-endian u32.

use bech32::{Bech32, Hrp};

use crate::presenter::capability::IdentifierCodec;

const HRP_NPUB: Hrp = Hrp::parse_unchecked("npub");
const HRP_NOTE: Hrp = Hrp::parse_unchecked("note");
const HRP_NEVENT: Hrp = Hrp::parse_unchecked("nevent");

const TLV_SPECIAL: u8 = 0;
const TLV_RELAY: u8 = 1;
const TLV_AUTHOR: u8 = 2;
const TLV_KIND: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum Nip19Error {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error(transparent)]
    Decode(#[from] bech32::DecodeError),
    #[error(transparent)]
    Encode(#[from] bech32::EncodeError),
    #[error("unsupported prefix: {0}")]
    UnsupportedPrefix(String),
    #[error("malformed tlv: {0}")]
    MalformedTlv(&'static str),
    #[error("not an {expected} reference: {got}")]
    WrongEntity { expected: &'static str, got: String },
}

/// A decoded NIP-19 entity. Ids and pubkeys are lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nip19 {
    Pubkey(String),
    Note(String),
    Event {
        id: String,
        relays: Vec<String>,
        author: Option<String>,
        kind: Option<u32>,
    },
    Profile {
        pubkey: String,
        relays: Vec<String>,
    },
}

/// An event id plus whatever relay hints came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub id: String,
    pub relays: Vec<String>,
}

/// A pubkey plus whatever relay hints came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubkeyRef {
    pub pubkey: String,
    pub relays: Vec<String>,
}

fn key_bytes(hex_str: &str) -> Result<Vec<u8>, Nip19Error> {
    let bytes = hex::decode(hex_str)?;
    if bytes.len() != 32 {
        return Err(Nip19Error::InvalidLength(bytes.len()));
    }
    Ok(bytes)
}

fn is_hex_key(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn encode_npub(pubkey_hex: &str) -> Result<String, Nip19Error> {
    Ok(bech32::encode::<Bech32>(HRP_NPUB, &key_bytes(pubkey_hex)?)?)
}

pub fn encode_note(id_hex: &str) -> Result<String, Nip19Error> {
    Ok(bech32::encode::<Bech32>(HRP_NOTE, &key_bytes(id_hex)?)?)
}

pub fn encode_nevent(id_hex: &str, relays: &[String]) -> Result<String, Nip19Error> {
    let data = tlv_with_relays(key_bytes(id_hex)?, relays);
    Ok(bech32::encode::<Bech32>(HRP_NEVENT, &data)?)
}

fn tlv_with_relays(special: Vec<u8>, relays: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(34 + relays.iter().map(|r| r.len() + 2).sum::<usize>());
    push_tlv(&mut out, TLV_SPECIAL, &special);
    for relay in relays {
        if relay.len() > u8::MAX as usize {
            tracing::debug!(relay = %relay, "relay hint too long for tlv, skipped");
            continue;
        }
        push_tlv(&mut out, TLV_RELAY, relay.as_bytes());
    }
    out
}

fn push_tlv(out: &mut Vec<u8>, t: u8, value: &[u8]) {
    out.push(t);
    out.push(value.len() as u8);
    out.extend_from_slice(value);
}

struct Tlv {
    special: Option<Vec<u8>>,
    relays: Vec<String>,
    author: Option<Vec<u8>>,
    kind: Option<u32>,
}

fn parse_tlv(mut data: &[u8]) -> Result<Tlv, Nip19Error> {
    let mut tlv = Tlv {
        special: None,
        relays: Vec::new(),
        author: None,
        kind: None,
    };
    while !data.is_empty() {
        let [t, len, rest @ ..] = data else {
            return Err(Nip19Error::MalformedTlv("truncated header"));
        };
        let len = *len as usize;
        if rest.len() < len {
            return Err(Nip19Error::MalformedTlv("truncated value"));
        }
        let (value, tail) = rest.split_at(len);
        match *t {
            TLV_SPECIAL if tlv.special.is_none() => tlv.special = Some(value.to_vec()),
            TLV_RELAY => {
                if let Ok(url) = std::str::from_utf8(value) {
                    tlv.relays.push(url.to_string());
                }
            }
            TLV_AUTHOR if value.len() == 32 => tlv.author = Some(value.to_vec()),
            TLV_KIND if value.len() == 4 => {
                tlv.kind = Some(u32::from_be_bytes([value[0], value[1], value[2], value[3]]))
            }
            // unknown types are ignored
            _ => {}
        }
        data = tail;
    }
    Ok(tlv)
}

fn special_hex(special: Option<Vec<u8>>) -> Result<String, Nip19Error> {
    let bytes = special.ok_or(Nip19Error::MalformedTlv("missing type 0"))?;
    if bytes.len() != 32 {
        return Err(Nip19Error::InvalidLength(bytes.len()));
    }
    Ok(hex::encode(bytes))
}

/// Decodes a bech32 NIP-19 string, with or without a `nostr:` prefix.
pub fn decode(input: &str) -> Result<Nip19, Nip19Error> {
    let input = input.trim();
    let input = input.strip_prefix("nostr:").unwrap_or(input);
    let (hrp, data) = bech32::decode(input)?;

    match hrp.to_lowercase().as_str() {
        "npub" => Ok(Nip19::Pubkey(special_hex(Some(data))?)),
        "note" => Ok(Nip19::Note(special_hex(Some(data))?)),
        "nevent" => {
            let tlv = parse_tlv(&data)?;
            Ok(Nip19::Event {
                id: special_hex(tlv.special)?,
                relays: tlv.relays,
                author: tlv.author.map(hex::encode),
                kind: tlv.kind,
            })
        }
        "nprofile" => {
            let tlv = parse_tlv(&data)?;
            Ok(Nip19::Profile {
                pubkey: special_hex(tlv.special)?,
                relays: tlv.relays,
            })
        }
        other => Err(Nip19Error::UnsupportedPrefix(other.to_string())),
    }
}

/// Parses an event reference from a path segment: 64-char hex, `note` or `nevent`.
pub fn parse_event_ref(input: &str) -> Result<EventRef, Nip19Error> {
    let input = input.trim();
    if is_hex_key(input) {
        return Ok(EventRef {
            id: input.to_lowercase(),
            relays: Vec::new(),
        });
    }
    match decode(input)? {
        Nip19::Note(id) => Ok(EventRef { id, relays: Vec::new() }),
        Nip19::Event { id, relays, .. } => Ok(EventRef { id, relays }),
        _ => Err(Nip19Error::WrongEntity {
            expected: "event",
            got: input.to_string(),
        }),
    }
}

/// Parses a pubkey reference from a path segment: 64-char hex, `npub` or `nprofile`.
pub fn parse_pubkey_ref(input: &str) -> Result<PubkeyRef, Nip19Error> {
    let input = input.trim();
    if is_hex_key(input) {
        return Ok(PubkeyRef {
            pubkey: input.to_lowercase(),
            relays: Vec::new(),
        });
    }
    match decode(input)? {
        Nip19::Pubkey(pubkey) => Ok(PubkeyRef { pubkey, relays: Vec::new() }),
        Nip19::Profile { pubkey, relays } => Ok(PubkeyRef { pubkey, relays }),
        _ => Err(Nip19Error::WrongEntity {
            expected: "pubkey",
            got: input.to_string(),
        }),
    }
}

/// [`IdentifierCodec`] backed by the functions in this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nip19Codec;

impl IdentifierCodec for Nip19Codec {
    fn encode_note(&self, id: &str) -> Result<String, Nip19Error> {
        encode_note(id)
    }

    fn encode_nevent(&self, id: &str, relays: &[String]) -> Result<String, Nip19Error> {
        encode_nevent(id, relays)
    }

    fn encode_npub(&self, pubkey: &str) -> Result<String, Nip19Error> {
        encode_npub(pubkey)
    }
}
