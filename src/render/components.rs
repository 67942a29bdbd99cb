//! Shared page pieces: CSS, the `<head>` shell and small markup helpers.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use url::form_urlencoded;

use crate::presenter::state::DisplayState;

pub const PAGE_CSS: &str = r#"
*{box-sizing:border-box}
body{font-family:ui-monospace,"SF Mono",Menlo,monospace;background:#f4f4f4;color:#212529;margin:0;padding:1.5rem 1rem;display:flex;justify-content:center}
main{max-width:860px;width:100%}
.panel{background:#fff;border:3px solid #212529;padding:1.25rem;margin-bottom:1rem}
.field{display:flex;align-items:center;gap:.75rem;margin:.6rem 0}
.field label{min-width:5.5rem;font-weight:700}
.field input{flex:1;min-width:0;font:inherit;padding:.35rem .5rem;border:2px solid #212529;background:#fafafa}
.btn{display:inline-block;font:inherit;padding:.3rem .75rem;border:2px solid #212529;background:#f7d51d;color:#212529;text-decoration:none;cursor:pointer}
.btn.primary{background:#209cee;color:#fff}
.btn.success{background:#92cc41}
.btn.error{background:#e76e55;color:#fff}
.btn-form{display:inline;margin:0}
table.tags{border-collapse:collapse;width:100%;margin:1rem 0;font-size:.9rem}
table.tags td{border:1px solid #ccc;padding:.25rem .5rem;word-break:break-all}
.content{white-space:pre-wrap;word-break:break-word;margin:1rem 0}
.content img,.content video{max-width:100%;display:block;margin-top:.75rem}
.article img{max-width:100%}
pre.raw,pre.metadata{white-space:pre-wrap;word-break:break-all;background:#fafafa;border:1px dashed #999;padding:.75rem}
.raw-toggle{text-align:right;margin-top:1rem}
"#;

/// No scripts at all; forms may only post back to this origin.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: data:; media-src https:; form-action 'self'; frame-ancestors 'none'; base-uri 'none'";

/// Full HTML document. `meta` pairs become `<meta property=.. content=..>`.
pub fn page_shell(title: &str, meta: &[(&'static str, String)], body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                @for (property, content) in meta {
                    meta property=(property) content=(content);
                }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body) }
            }
        }
    }
}

/// A labelled read-only input followed by optional controls.
pub fn field(name: &str, dom_id: &str, value: &str, controls: Markup) -> Markup {
    html! {
        div class="field" {
            label for=(dom_id) { (name) }
            input readonly id=(dom_id) value=(value);
            (controls)
        }
    }
}

/// A button-looking link.
pub fn link_button(href: &str, class: &str, text: &str) -> Markup {
    html! {
        a class={ "btn " (class) } href=(href) { (text) }
    }
}

/// `path` with the display state and one `relays` pair per hint, form
/// encoded. The result is plain ASCII, so it is safe in a `Location` header.
pub fn state_href(path: &str, state: DisplayState, relays: &[String]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(state.query_pairs());
    query.extend_pairs(relays.iter().map(|r| ("relays", r)));
    let query = query.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
