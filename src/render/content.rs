//! Event body rendering: tags table, content and media embeds.

use maud::{html, Markup, PreEscaped};
use pulldown_cmark::{html as md_html, Event as MdEvent, Options, Parser};

use crate::nostr::event::Event;
use crate::presenter::derive::MediaUrls;

/// Markdown to HTML. Raw HTML in the source is shown as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        MdEvent::Html(raw) | MdEvent::InlineHtml(raw) => MdEvent::Text(raw),
        other => other,
    });

    let mut html_output = String::new();
    md_html::push_html(&mut html_output, parser);
    html_output
}

pub fn tags_table(tags: &[Vec<String>]) -> Markup {
    html! {
        @if !tags.is_empty() {
            table class="tags" {
                tbody {
                    @for tag in tags {
                        tr {
                            @for value in tag {
                                td { (value) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Kind 0 shows its metadata block, kind 30023 is Markdown, anything else is
/// plain text with at most one image and one video embedded.
pub fn render_content(event: &Event, media: &MediaUrls, metadata: Option<&str>) -> Markup {
    if event.kind == 0 {
        return html! {
            @match metadata {
                Some(text) => {
                    pre class="metadata" { (text) }
                },
                None => {
                    div class="content" { (event.content) }
                },
            }
        };
    }

    if event.kind == 30023 {
        return html! {
            @if let Some(title) = event.first_tag_value("title") {
                h2 { (title) }
            }
            div class="article" { (PreEscaped(markdown_to_html(&event.content))) }
        };
    }

    html! {
        div class="content" {
            (event.content)
            @if let Some(image) = &media.image {
                img src=(image) alt="" loading="lazy";
            }
            @if let Some(video) = &media.video {
                video src=(video) controls preload="metadata" {}
            }
        }
    }
}
