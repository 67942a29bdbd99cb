use std::time::Duration;

use anyhow::Context;
use futures_util::{
    future::{join_all, BoxFuture},
    sink::SinkExt,
    stream::{FuturesUnordered, StreamExt},
};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as TungMessage};

use crate::nostr::event::Event;
use crate::nostr::message::{parse_relay_msg, ClientMsg, RelayMsg};
use crate::presenter::capability::{EventSource, RelayPublisher};

/// One short-lived websocket connection per query or publish.
#[derive(Debug, Clone)]
pub struct WsRelayClient {
    timeout: Duration,
}

impl WsRelayClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs a single-filter subscription against `url` until EOSE, CLOSED or
    /// the timeout. Events received before a timeout are still returned.
    pub async fn query(&self, url: &str, filter: Value) -> anyhow::Result<Vec<Event>> {
        let mut events = Vec::new();
        match tokio::time::timeout(self.timeout, run_query(url, filter, &mut events)).await {
            Ok(result) => result?,
            Err(_) => tracing::debug!(relay = %url, received = events.len(), "query timed out"),
        }
        Ok(events)
    }

    /// Sends `event` to `url` and waits (within the timeout) for the relay's OK.
    pub async fn send_event(&self, url: &str, event: &Event) -> anyhow::Result<()> {
        tokio::time::timeout(self.timeout, run_publish(url, event))
            .await
            .with_context(|| format!("publish to {url} timed out"))?
    }
}

async fn run_query(url: &str, filter: Value, out: &mut Vec<Event>) -> anyhow::Result<()> {
    let (mut ws, _resp) = connect_async(url)
        .await
        .with_context(|| format!("connect {url}"))?;

    let sub_id = uuid::Uuid::new_v4().simple().to_string();
    let req = ClientMsg::Req {
        sub_id: sub_id.clone(),
        filters: vec![filter],
    };
    ws.send(TungMessage::Text(req.to_json())).await?;

    while let Some(msg) = ws.next().await {
        match msg? {
            TungMessage::Text(text) => match parse_relay_msg(&text) {
                Ok(RelayMsg::Event { sub_id: s, event }) if s == sub_id => out.push(event),
                Ok(RelayMsg::Eose { sub_id: s }) if s == sub_id => break,
                Ok(RelayMsg::Closed { sub_id: s, message }) if s == sub_id => {
                    tracing::debug!(relay = %url, %message, "subscription closed by relay");
                    return Ok(());
                }
                Ok(RelayMsg::Notice { message }) => {
                    tracing::debug!(relay = %url, %message, "relay notice");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(relay = %url, error = %e, "unparsed relay message"),
            },
            TungMessage::Close(_) => return Ok(()),
            // ignore frames we don't map yet
            _ => {}
        }
    }

    let close = ClientMsg::Close { sub_id };
    let _ = ws.send(TungMessage::Text(close.to_json())).await;
    let _ = ws.close(None).await;
    Ok(())
}

async fn run_publish(url: &str, event: &Event) -> anyhow::Result<()> {
    let (mut ws, _resp) = connect_async(url)
        .await
        .with_context(|| format!("connect {url}"))?;

    let msg = ClientMsg::Event {
        event: event.clone(),
    };
    ws.send(TungMessage::Text(msg.to_json())).await?;

    while let Some(msg) = ws.next().await {
        if let TungMessage::Text(text) = msg? {
            if let Ok(RelayMsg::Ok {
                event_id,
                accepted,
                message,
            }) = parse_relay_msg(&text)
            {
                if event_id == event.id {
                    tracing::info!(relay = %url, accepted, %message, "relay answered publish");
                    break;
                }
            }
        }
    }

    let _ = ws.close(None).await;
    Ok(())
}

impl EventSource for WsRelayClient {
    fn fetch_event(&self, id: String, relays: Vec<String>) -> BoxFuture<'static, Option<Event>> {
        let client = self.clone();
        Box::pin(async move {
            let filter = json!({ "ids": [id], "limit": 1 });
            let mut pending: FuturesUnordered<_> = relays
                .iter()
                .map(|url| {
                    let client = client.clone();
                    let filter = filter.clone();
                    async move { (url, client.query(url, filter).await) }
                })
                .collect();

            while let Some((url, result)) = pending.next().await {
                match result {
                    Ok(events) => {
                        if let Some(event) = events.into_iter().find(|e| e.id == id) {
                            tracing::debug!(relay = %url, id = %id, "event found");
                            return Some(event);
                        }
                    }
                    Err(e) => tracing::warn!(relay = %url, error = %e, "event query failed"),
                }
            }
            None
        })
    }

    fn fetch_profile(
        &self,
        pubkey: String,
        relays: Vec<String>,
    ) -> BoxFuture<'static, Option<Event>> {
        let client = self.clone();
        Box::pin(async move {
            let filter = json!({ "authors": [pubkey], "kinds": [0], "limit": 1 });
            let results =
                join_all(relays.iter().map(|url| client.query(url, filter.clone()))).await;

            results
                .into_iter()
                .zip(&relays)
                .filter_map(|(result, url)| match result {
                    Ok(events) => Some(events),
                    Err(e) => {
                        tracing::warn!(relay = %url, error = %e, "profile query failed");
                        None
                    }
                })
                .flatten()
                .filter(|e| e.kind == 0 && e.pubkey == pubkey)
                .max_by_key(|e| e.created_at)
        })
    }
}

impl RelayPublisher for WsRelayClient {
    fn publish(&self, url: String, event: Event) -> BoxFuture<'static, anyhow::Result<()>> {
        let client = self.clone();
        Box::pin(async move { client.send_event(&url, &event).await })
    }
}
