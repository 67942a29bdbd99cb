//! Display fields computed from an event. All functions here are pure.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use serde_json::Value;

use crate::nostr::event::Event;
use crate::nostr::kind::{is_parameterized_replaceable, kind_name};

static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[^ ]*\.(?i:gif|jpe?g|png|webp)").unwrap());
static VIDEO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[^ ]*\.(?i:mp4|webm)").unwrap());

/// Page title: kind label plus the creation minute in UTC.
pub fn title(event: &Event) -> String {
    let mut title = if is_parameterized_replaceable(event.kind) {
        let name = kind_name(event.kind)
            .map(str::to_string)
            .unwrap_or_else(|| format!("kind:{}", event.kind));
        let topic = event
            .first_tag_value("t")
            .filter(|v| !v.is_empty())
            .unwrap_or("~");
        format!("{name}: {topic}")
    } else if let Some(name) = kind_name(event.kind) {
        name.to_string()
    } else {
        format!("kind:{} event", event.kind)
    };

    if let Some(date) = title_date(event.created_at) {
        title.push_str(" at ");
        title.push_str(&date);
    }
    title
}

/// `YYYY-MM-DD HH:MM UTC`, truncated to the minute.
pub fn title_date(created_at: i64) -> Option<String> {
    let dt = DateTime::from_timestamp(created_at, 0)?;
    Some(dt.format("%Y-%m-%d %H:%M UTC").to_string())
}

/// Full timestamp for the date row.
pub fn display_date(created_at: i64) -> String {
    DateTime::from_timestamp(created_at, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| created_at.to_string())
}

/// Preview media found in the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUrls {
    pub image: Option<String>,
    pub video: Option<String>,
}

/// A category is only exposed when exactly one URL of it appears.
pub fn sniff_media(content: &str) -> MediaUrls {
    MediaUrls {
        image: single_match(&IMAGE_URL, content),
        video: single_match(&VIDEO_URL, content),
    }
}

fn single_match(re: &Regex, content: &str) -> Option<String> {
    let mut matches = re.find_iter(content);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first.as_str().to_string())
}

/// TOML rendering of a JSON profile object. `None` on any parse or
/// serialization failure, and for an empty object.
pub fn profile_metadata(content: &str) -> Option<String> {
    let value: Value = serde_json::from_str(content).ok()?;
    let value = strip_nulls(value);
    if !value.is_object() {
        return None;
    }
    let text = toml::to_string(&value).ok()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}

/// Non-empty string `name` from a kind-0 profile record. Other JSON types
/// are ignored.
pub fn author_name(author: &Event) -> Option<String> {
    let value: Value = serde_json::from_str(&author.content).ok()?;
    value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn site_name(npub: &str, author: Option<&Event>) -> String {
    match author.and_then(author_name) {
        Some(name) => format!("{name} ({npub})"),
        None => npub.to_string(),
    }
}

/// Notes and articles describe themselves; profiles use their metadata text.
pub fn description<'a>(event: &'a Event, metadata: Option<&'a str>) -> Option<&'a str> {
    if event.kind == 1 || event.kind == 30023 {
        Some(event.content.as_str())
    } else {
        metadata
    }
}
