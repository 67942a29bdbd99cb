//! HTML pages.
//!
//! All markup goes through maud, so every dynamic value is escaped. The page
//! is fully server-rendered: toggles are links to the next [`DisplayState`]
//! and the two actions are small forms.

pub mod components;
pub mod content;

use maud::{html, Markup};

use crate::presenter::state::{DisplayState, SignatureStatus};
use crate::presenter::EventPresenter;
use components::{field, link_button, page_shell, state_href};

/// Which route the page is served under; decides where the "open" link goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Event,
    Profile,
}

pub struct PageView<'a> {
    pub presenter: &'a EventPresenter<'a>,
    pub state: DisplayState,
    pub kind: PageKind,
    /// Path of the current page without query string.
    pub path: &'a str,
}

pub fn render_event_page(view: &PageView<'_>) -> Markup {
    let presenter = view.presenter;
    let event = presenter.event();
    let relays = presenter.relays();
    let state = view.state.normalized(event.kind);
    let sid: String = event.id.chars().take(4).collect();
    let link_to = |next: DisplayState| state_href(view.path, next, relays);
    let open_event = state_href(&format!("/e/{}", event.id), DisplayState::default(), relays);
    let open_profile = state_href(
        &format!("/p/{}", event.pubkey),
        DisplayState::default(),
        relays,
    );

    let next_id_format = state.id_format.next(event.kind);
    let id_controls = html! {
        (link_button(&link_to(state.advance_id_format(event.kind)), "", next_id_format.as_str()))
        @if view.kind == PageKind::Profile {
            (link_button(&open_event, "primary", "open"))
        }
    };

    let pubkey_controls = html! {
        (link_button(
            &link_to(state.toggle_pubkey()),
            "",
            if state.pubkey_hex_visible { "npub" } else { "hex" },
        ))
        @if view.kind == PageKind::Event {
            (link_button(&open_profile, "primary", "open"))
        }
    };

    let sig_class = match state.signature_status {
        SignatureStatus::Unchecked => "",
        SignatureStatus::Valid => "success",
        SignatureStatus::Invalid => "error",
    };
    let sig_controls = html! {
        form class="btn-form" method="post" action=(format!("/e/{}/verify", event.id)) {
            (state_inputs(state, relays))
            button type="submit" class={ "btn " (sig_class) } { (state.signature_status.label()) }
        }
    };

    let media = presenter.media();
    let metadata = presenter.metadata();

    let body = html! {
        div class="panel" {
            (field("id", &format!("id-{sid}"), &presenter.id_display(state.id_format), id_controls))
            (field("author", &format!("pubkey-{sid}"), &presenter.pubkey_display(state.pubkey_hex_visible), pubkey_controls))
            div class="field" {
                label for=(format!("kind-{sid}")) { "kind" }
                input readonly id=(format!("kind-{sid}")) value=(event.kind);
                input readonly value=(presenter.kind_label());
            }
            (field("date", &format!("date-{sid}"), &presenter.date_display(), html! {}))
            (content::tags_table(&event.tags))
            (content::render_content(event, &media, metadata.as_deref()))
            (field("signature", &format!("sig-{sid}"), &event.sig, sig_controls))

            div class="raw-toggle" {
                (link_button(&link_to(state.toggle_raw()), "primary", "<>"))
            }
            @if state.raw_visible {
                div class="panel" {
                    form class="btn-form" method="post" action=(format!("/e/{}/republish", event.id)) {
                        (state_inputs(state, relays))
                        button type="submit" class="btn primary" { "Republish Event" }
                    }
                    pre class="raw" { (event.to_pretty_json()) }
                }
            }
        }
    };

    page_shell(&presenter.title(), &presenter.page_meta(), body)
}

/// Hidden fields carrying the current state through a form post.
fn state_inputs(state: DisplayState, relays: &[String]) -> Markup {
    html! {
        input type="hidden" name="id" value=(state.id_format.as_str());
        @if state.pubkey_hex_visible {
            input type="hidden" name="pubkey" value="hex";
        }
        @if state.raw_visible {
            input type="hidden" name="raw" value="1";
        }
        @for relay in relays {
            input type="hidden" name="relays" value=(relay);
        }
    }
}

/// Notice for an event or profile no relay returned.
pub fn not_found_page(entity: &str, id: &str, hint_prefix: &str) -> Markup {
    let body = html! {
        div class="panel" {
            p { (entity) " " (id) " wasn't found." }
            p {
                "Try using a "
                code { (hint_prefix) }
                " identifier with relay hints."
            }
        }
    };
    page_shell(&format!("{entity} not found"), &[], body)
}

pub fn error_page(title: &str, message: &str) -> Markup {
    let body = html! {
        div class="panel" {
            h1 { (title) }
            p { (message) }
        }
    };
    page_shell(title, &[], body)
}
