use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;
use secp256k1::{Keypair, Message, Secp256k1};
use tower::ServiceExt;

use nostr_event_viewer::nostr::{event::Event, nip19, verify::compute_id};
use nostr_event_viewer::presenter::capability::{EventSource, RelayPublisher};
use nostr_event_viewer::api::routes::DisplayParams;
use nostr_event_viewer::{api, nostr::nip19::Nip19Codec, nostr::verify::SchnorrVerifier};
use nostr_event_viewer::{AppState, Config};

#[derive(Default)]
struct MemorySource {
    events: HashMap<String, Event>,
    profiles: HashMap<String, Event>,
    asked_relays: Mutex<Vec<Vec<String>>>,
}

impl EventSource for MemorySource {
    fn fetch_event(&self, id: String, relays: Vec<String>) -> BoxFuture<'static, Option<Event>> {
        self.asked_relays.lock().unwrap().push(relays);
        let found = self.events.get(&id).cloned();
        Box::pin(async move { found })
    }

    fn fetch_profile(
        &self,
        pubkey: String,
        _relays: Vec<String>,
    ) -> BoxFuture<'static, Option<Event>> {
        let found = self.profiles.get(&pubkey).cloned();
        Box::pin(async move { found })
    }
}

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, String)>>,
}

impl RelayPublisher for RecordingPublisher {
    fn publish(&self, url: String, event: Event) -> BoxFuture<'static, anyhow::Result<()>> {
        self.published.lock().unwrap().push((url.clone(), event.id));
        Box::pin(async move {
            if url.contains("offline") {
                anyhow::bail!("connection refused");
            }
            Ok(())
        })
    }
}

fn signed_event(seckey: u8, kind: i64, content: &str, created_at: i64) -> Event {
    let secp = Secp256k1::new();
    let keypair = Keypair::from_seckey_slice(&secp, &[seckey; 32]).unwrap();
    let (xonly, _) = keypair.x_only_public_key();
    let mut event = Event {
        id: String::new(),
        pubkey: xonly.to_string(),
        created_at,
        kind,
        tags: vec![vec!["t".into(), "test".into()]],
        content: content.into(),
        sig: String::new(),
    };
    let id = compute_id(&event);
    event.id = hex::encode(id);
    event.sig = secp
        .sign_schnorr_no_aux_rand(&Message::from_digest(id), &keypair)
        .to_string();
    event
}

struct Harness {
    state: AppState,
    source: Arc<MemorySource>,
    publisher: Arc<RecordingPublisher>,
}

fn harness(events: Vec<Event>, profiles: Vec<Event>) -> Harness {
    let source = Arc::new(MemorySource {
        events: events.into_iter().map(|e| (e.id.clone(), e)).collect(),
        profiles: profiles.into_iter().map(|e| (e.pubkey.clone(), e)).collect(),
        ..Default::default()
    });
    let publisher = Arc::new(RecordingPublisher::default());
    let config = Config::from_lookup(|key| match key {
        "FALLBACK_RELAYS" => Some("wss://fallback.one,wss://offline.two".to_string()),
        "DEFAULT_RELAYS" => Some("wss://default.example".to_string()),
        _ => None,
    })
    .unwrap();
    let state = AppState {
        config: Arc::new(config),
        source: source.clone(),
        publisher: publisher.clone(),
        codec: Arc::new(Nip19Codec),
        verifier: Arc::new(SchnorrVerifier),
    };
    Harness {
        state,
        source,
        publisher,
    }
}

async fn get(state: &AppState, uri: &str) -> Response {
    api::routes::router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(state: &AppState, uri: &str, form: &str) -> Response {
    api::routes::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let h = harness(vec![], vec![]);
    assert_eq!(get(&h.state, "/healthz").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn event_page_renders_preview_meta() {
    let event = signed_event(1, 1, "hello https://x.com/a.png world", 1_700_000_000);
    let author = signed_event(1, 0, r#"{"name":"alice"}"#, 1_600_000_000);
    let h = harness(vec![event.clone()], vec![author]);

    let resp = get(&h.state, &format!("/e/{}", event.id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(resp.headers().contains_key(header::CONTENT_SECURITY_POLICY));

    let html = body_text(resp).await;
    let npub = nip19::encode_npub(&event.pubkey).unwrap();
    assert!(html.contains("<title>Short Note at 2023-11-14 22:13 UTC</title>"));
    assert!(html.contains(&format!(
        r#"<meta property="og:site_name" content="alice ({npub})">"#
    )));
    assert!(html.contains(r#"<meta property="og:image" content="https://x.com/a.png">"#));
    assert!(html.contains(
        r#"<meta property="og:description" content="hello https://x.com/a.png world">"#
    ));
    assert!(html.contains(&nip19::encode_nevent(&event.id, &[]).unwrap()));
}

#[tokio::test]
async fn missing_event_renders_not_found() {
    let h = harness(vec![], vec![]);
    let id = "ab".repeat(32);
    let resp = get(&h.state, &format!("/e/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let html = body_text(resp).await;
    assert!(html.contains(&format!("Event {id} wasn't found.")));
    assert!(html.contains("<code>nevent</code>"));
}

#[tokio::test]
async fn malformed_identifier_is_bad_request() {
    let h = harness(vec![], vec![]);
    let resp = get(&h.state, "/e/not-an-id").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let npub = nip19::encode_npub(&"11".repeat(32)).unwrap();
    let resp = get(&h.state, &format!("/e/{npub}")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nevent_relay_hints_are_used_for_fetch_and_links() {
    let event = signed_event(2, 1, "hi", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);
    let hints = vec!["wss://hint.example".to_string()];
    let nevent = nip19::encode_nevent(&event.id, &hints).unwrap();

    let resp = get(&h.state, &format!("/e/{nevent}?relays=wss://query.example")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    let asked = h.source.asked_relays.lock().unwrap().clone();
    assert_eq!(
        asked,
        vec![vec![
            "wss://hint.example".to_string(),
            "wss://query.example".to_string(),
            "wss://default.example".to_string(),
        ]]
    );
    assert!(html.contains(&format!(
        r#"href="/p/{}?relays=wss%3A%2F%2Fhint.example&amp;relays=wss%3A%2F%2Fquery.example">open</a>"#,
        event.pubkey
    )));
    let expected_nevent = nip19::encode_nevent(
        &event.id,
        &["wss://hint.example".to_string(), "wss://query.example".to_string()],
    )
    .unwrap();
    assert!(html.contains(&expected_nevent));
}

#[tokio::test]
async fn query_state_selects_rendering() {
    let event = signed_event(3, 1, "raw me", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);

    let uri = format!("/e/{}?id=hex&pubkey=hex&raw=1", event.id);
    let html = body_text(get(&h.state, &uri).await).await;
    assert!(html.contains(&format!(r#"value="{}""#, event.id)));
    assert!(html.contains(&format!(r#"value="{}""#, event.pubkey)));
    assert!(html.contains("Republish Event"));
    assert!(html.contains(r#"<pre class="raw">"#));

    let html = body_text(get(&h.state, &format!("/e/{}?id=note", event.id)).await).await;
    assert!(html.contains(&nip19::encode_note(&event.id).unwrap()));
}

#[tokio::test]
async fn verify_reports_valid_and_invalid() {
    let good = signed_event(4, 1, "signed", 1_700_000_000);
    let mut bad = signed_event(5, 1, "signed too", 1_700_000_000);
    bad.content.push('!');
    let h = harness(vec![good.clone(), bad.clone()], vec![]);

    let uri = format!("/e/{}/verify", good.id);
    let html = body_text(post_form(&h.state, &uri, "id=nevent").await).await;
    assert!(html.contains(r#"class="btn success">valid</button>"#));

    let uri = format!("/e/{}/verify", bad.id);
    let html = body_text(post_form(&h.state, &uri, "id=hex&raw=1").await).await;
    assert!(html.contains(r#"class="btn error">invalid</button>"#));
    assert!(html.contains("Republish Event"));
}

#[tokio::test]
async fn republish_sends_to_fallback_relays_and_redirects() {
    let event = signed_event(6, 1, "again", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);

    let resp = post_form(&h.state, &format!("/e/{}/republish", event.id), "id=nevent").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()[header::LOCATION],
        format!("/e/{}?raw=1", event.id).as_str()
    );

    let mut published = Vec::new();
    for _ in 0..50 {
        published = h.publisher.published.lock().unwrap().clone();
        if published.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    published.sort();
    assert_eq!(
        published,
        vec![
            ("wss://fallback.one".to_string(), event.id.clone()),
            ("wss://offline.two".to_string(), event.id.clone()),
        ]
    );
}

#[tokio::test]
async fn profile_page_links_to_event() {
    let profile = signed_event(7, 0, r#"{"name":"bob","about":"hi"}"#, 1_650_000_000);
    let h = harness(vec![], vec![profile.clone()]);
    let npub = nip19::encode_npub(&profile.pubkey).unwrap();

    let resp = get(&h.state, &format!("/p/{npub}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(&format!(r#"content="bob ({npub})""#)));
    assert!(html.contains(&format!(r#"href="/e/{}">open</a>"#, profile.id)));
    assert!(html.contains(r#"<pre class="metadata">"#));
    assert!(html.contains("<title>Metadata at "));

    let resp = get(&h.state, &format!("/p/{}", "22".repeat(32))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn query_of(href: &str) -> DisplayParams {
    let (_, query) = href.split_once('?').unwrap_or((href, ""));
    DisplayParams::parse(query.as_bytes())
}

fn href_before(html: &str, prefix: &str, text: &str) -> String {
    let start = html.find(prefix).unwrap() + r#"href=""#.len();
    let end = start + html[start..].find(&format!(r#"">{text}</a>"#)).unwrap();
    html[start..end].replace("&amp;", "&")
}

#[tokio::test]
async fn republish_redirect_encodes_control_characters_in_hints() {
    let event = signed_event(8, 1, "hostile", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);

    let uri = format!("/e/{}/republish", event.id);
    let resp = post_form(&h.state, &uri, "id=nevent&relays=wss%3A%2F%2Fa%0Ab").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(location, format!("/e/{}?raw=1&relays=wss%3A%2F%2Fa%0Ab", event.id));
    let params = query_of(&location);
    assert_eq!(params.relay_hints(), vec!["wss://a\nb"]);
    assert!(params.display_state().raw_visible);
}

#[tokio::test]
async fn republish_redirects_to_canonical_path() {
    let event = signed_event(9, 1, "padded", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);

    let resp = post_form(&h.state, &format!("/e/{}%0A/republish", event.id), "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()[header::LOCATION],
        format!("/e/{}?raw=1", event.id).as_str()
    );

    let note = nip19::encode_note(&event.id).unwrap();
    let resp = post_form(&h.state, &format!("/e/{note}/republish"), "pubkey=hex").await;
    assert_eq!(
        resp.headers()[header::LOCATION],
        format!("/e/{}?pubkey=hex&raw=1", event.id).as_str()
    );
}

#[tokio::test]
async fn hostile_relay_hints_round_trip_through_links() {
    let event = signed_event(10, 1, "hints", 1_700_000_000);
    let h = harness(vec![event.clone()], vec![]);
    let hints = vec![
        "wss://a,b".to_string(),
        "wss://c/?x=1&y=2".to_string(),
        "wss://line\nbreak".to_string(),
    ];
    let nevent = nip19::encode_nevent(&event.id, &hints[..2]).unwrap();

    let resp = get(&h.state, &format!("/e/{nevent}?relays=wss%3A%2F%2Fline%0Abreak")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    let open = href_before(&html, &format!(r#"href="/p/{}"#, event.pubkey), "open");
    assert_eq!(query_of(&open).relay_hints(), hints);

    let toggle = href_before(&html, &format!(r#"href="/e/{}?"#, event.id), "note");
    let params = query_of(&toggle);
    assert_eq!(params.relay_hints(), hints);
    assert_eq!(params.id.as_deref(), Some("note"));

    for hint in &hints {
        let escaped = hint.replace('&', "&amp;");
        let input = format!(r#"<input type="hidden" name="relays" value="{escaped}">"#);
        assert!(html.contains(&input));
    }

    let asked = h.source.asked_relays.lock().unwrap().clone();
    assert_eq!(asked[0][..3], hints[..]);
}
