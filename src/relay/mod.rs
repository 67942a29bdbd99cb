pub mod client;

pub use client::WsRelayClient;

/// Concatenates relay lists, trimming entries and dropping blanks and
/// duplicates while keeping first-seen order.
pub fn merge_relays<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut out: Vec<String> = Vec::new();
    for url in lists.into_iter().flatten() {
        let url = url.trim();
        if url.is_empty() || out.iter().any(|u| u == url) {
            continue;
        }
        out.push(url.to_string());
    }
    out
}

/// Splits a comma separated relay list such as `FALLBACK_RELAYS`.
pub fn parse_relay_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
