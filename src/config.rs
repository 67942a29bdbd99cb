//! Service configuration loaded from environment variables.

use std::time::Duration;

use anyhow::Context;

use crate::relay::parse_relay_list;

/// Relays that receive re-broadcasts when `FALLBACK_RELAYS` is unset.
pub const DEFAULT_FALLBACK_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.nostr.band",
    "wss://relay.snort.social",
    "wss://nostr.wine",
];

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. "127.0.0.1:8080").
    pub bind_addr: String,

    /// Re-broadcast targets.
    pub fallback_relays: Vec<String>,

    /// Relays always asked when fetching events and profiles.
    pub default_relays: Vec<String>,

    /// Per-relay timeout for queries and publishes.
    pub relay_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BIND_ADDR` (default "127.0.0.1:8080")
    /// - `FALLBACK_RELAYS`: comma separated (default: built-in list)
    /// - `DEFAULT_RELAYS`: comma separated (default: the fallback relays)
    /// - `RELAY_TIMEOUT_MS` (default 4000)
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        tracing::info!(
            bind_addr = %config.bind_addr,
            fallback_relays = config.fallback_relays.len(),
            default_relays = config.default_relays.len(),
            relay_timeout_ms = config.relay_timeout.as_millis() as u64,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());

        let fallback_relays = lookup("FALLBACK_RELAYS")
            .map(|raw| parse_relay_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_FALLBACK_RELAYS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let default_relays = lookup("DEFAULT_RELAYS")
            .map(|raw| parse_relay_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| fallback_relays.clone());

        let relay_timeout = match lookup("RELAY_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("RELAY_TIMEOUT_MS is not a number: {raw}"))?,
            ),
            None => Duration::from_millis(4000),
        };

        Ok(Self {
            bind_addr,
            fallback_relays,
            default_relays,
            relay_timeout,
        })
    }
}
