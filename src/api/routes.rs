use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

use crate::error::ViewerError;
use crate::nostr::event::Event;
use crate::nostr::nip19::{parse_event_ref, parse_pubkey_ref};
use crate::presenter::state::{DisplayState, IdFormat};
use crate::presenter::{check_signature, rebroadcast, EventPresenter};
use crate::relay::merge_relays;
use crate::render::components::{state_href, CSP_HEADER};
use crate::render::{render_event_page, PageKind, PageView};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/e/:code", get(event_page))
        .route("/e/:code/verify", post(verify_event))
        .route("/e/:code/republish", post(republish_event))
        .route("/p/:code", get(profile_page))
        .route("/healthz", get(|| async { StatusCode::OK }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Headers for every HTML response.
pub fn html_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::CONTENT_TYPE, "text/html; charset=utf-8"),
        (header::CONTENT_SECURITY_POLICY, CSP_HEADER),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    ]
}

/// Display state and relay hints, from the query string or a form body.
/// `relays` repeats, one hint per pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayParams {
    pub id: Option<String>,
    pub pubkey: Option<String>,
    pub raw: Option<String>,
    pub relays: Vec<String>,
}

impl DisplayParams {
    /// Reads `application/x-www-form-urlencoded` pairs; unknown keys are ignored.
    pub fn parse(input: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(input) {
            match &*key {
                "id" => params.id = Some(value.into_owned()),
                "pubkey" => params.pubkey = Some(value.into_owned()),
                "raw" => params.raw = Some(value.into_owned()),
                "relays" => params.relays.push(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    fn from_query(query: Option<String>) -> Self {
        Self::parse(query.as_deref().unwrap_or_default().as_bytes())
    }

    /// Unknown values fall back to the defaults instead of rejecting the request.
    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            id_format: self
                .id
                .as_deref()
                .and_then(IdFormat::parse)
                .unwrap_or_default(),
            pubkey_hex_visible: self.pubkey.as_deref() == Some("hex"),
            raw_visible: matches!(self.raw.as_deref(), Some("1" | "true")),
            ..DisplayState::default()
        }
    }

    pub fn relay_hints(&self) -> Vec<String> {
        merge_relays([self.relays.as_slice()])
    }
}

struct Loaded {
    event: Event,
    author: Option<Event>,
    /// Relay hints from the identifier and the query, used in links.
    hints: Vec<String>,
}

async fn load_event(
    state: &AppState,
    code: &str,
    params: &DisplayParams,
) -> Result<Loaded, ViewerError> {
    let event_ref = parse_event_ref(code)?;
    let hints = merge_relays([event_ref.relays.as_slice(), params.relay_hints().as_slice()]);
    let fetch_from = merge_relays([hints.as_slice(), state.config.default_relays.as_slice()]);

    let event = state
        .source
        .fetch_event(event_ref.id.clone(), fetch_from.clone())
        .await
        .ok_or_else(|| {
            tracing::info!(id = %event_ref.id, relays = fetch_from.len(), "event not found");
            ViewerError::EventNotFound(event_ref.id.clone())
        })?;
    let author = state
        .source
        .fetch_profile(event.pubkey.clone(), fetch_from)
        .await;

    Ok(Loaded {
        event,
        author,
        hints,
    })
}

fn render_page(
    state: &AppState,
    loaded: &Loaded,
    display: DisplayState,
    kind: PageKind,
    path: &str,
) -> Response {
    let presenter = EventPresenter::new(
        &loaded.event,
        loaded.author.as_ref(),
        &loaded.hints,
        state.codec.as_ref(),
    );
    let markup = render_event_page(&PageView {
        presenter: &presenter,
        state: display,
        kind,
        path,
    });
    (StatusCode::OK, html_headers(), markup.into_string()).into_response()
}

// Pages link back to the canonical hex path; hints travel in the query.

async fn event_page(
    State(state): State<AppState>,
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ViewerError> {
    let params = DisplayParams::from_query(query);
    let loaded = load_event(&state, &code, &params).await?;
    tracing::debug!(id = %loaded.event.id, kind = loaded.event.kind, "rendering event page");
    let path = format!("/e/{}", loaded.event.id);
    Ok(render_page(&state, &loaded, params.display_state(), PageKind::Event, &path))
}

async fn verify_event(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<Response, ViewerError> {
    let params = DisplayParams::parse(&body);
    let loaded = load_event(&state, &code, &params).await?;
    let display = check_signature(params.display_state(), state.verifier.as_ref(), &loaded.event);
    let path = format!("/e/{}", loaded.event.id);
    Ok(render_page(&state, &loaded, display, PageKind::Event, &path))
}

async fn republish_event(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<Redirect, ViewerError> {
    let params = DisplayParams::parse(&body);
    let loaded = load_event(&state, &code, &params).await?;
    // Dropping the handles detaches the tasks; relay outcomes are only logged.
    drop(rebroadcast(
        state.publisher.clone(),
        &state.config.fallback_relays,
        &loaded.event,
    ));

    let display = DisplayState {
        raw_visible: true,
        ..params.display_state()
    };
    Ok(Redirect::to(&state_href(
        &format!("/e/{}", loaded.event.id),
        display,
        &loaded.hints,
    )))
}

async fn profile_page(
    State(state): State<AppState>,
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ViewerError> {
    let params = DisplayParams::from_query(query);
    let pubkey_ref = parse_pubkey_ref(&code)?;
    let hints = merge_relays([pubkey_ref.relays.as_slice(), params.relay_hints().as_slice()]);
    let fetch_from = merge_relays([hints.as_slice(), state.config.default_relays.as_slice()]);

    let profile = state
        .source
        .fetch_profile(pubkey_ref.pubkey.clone(), fetch_from)
        .await
        .ok_or_else(|| ViewerError::ProfileNotFound(pubkey_ref.pubkey.clone()))?;

    // The profile event is its own author record.
    let loaded = Loaded {
        author: Some(profile.clone()),
        event: profile,
        hints,
    };
    Ok(render_page(
        &state,
        &loaded,
        params.display_state(),
        PageKind::Profile,
        &format!("/p/{}", loaded.event.pubkey),
    ))
}
