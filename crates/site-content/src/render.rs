use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::headings::{heading_id, Heading, IdDeduper};

/// An article body rendered to HTML, plus the headings that received anchors.
#[derive(Debug, Clone)]
pub struct RenderedArticle {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Renders an article body to HTML.
///
/// `h2`/`h3` elements get an `id` derived from their text, with repeats suffixed so
/// anchors stay unique. Heading-like lines inside code blocks are not headings and
/// get neither an anchor nor an entry.
pub fn render_article(markdown: &str) -> RenderedArticle {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options).collect();
    let mut ids = IdDeduper::new();
    let mut headings = Vec::new();

    let mut i = 0;
    while i < events.len() {
        let level = match &events[i] {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H2,
                ..
            }) => 2,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H3,
                ..
            }) => 3,
            _ => {
                i += 1;
                continue;
            }
        };

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let text = text.trim().to_string();
        let assigned = ids.assign(heading_id(&text));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(assigned.clone().into());
        }
        headings.push(Heading {
            id: assigned,
            text,
            level,
        });
        i = end + 1;
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    RenderedArticle {
        html: out,
        headings,
    }
}

pub fn render_html(markdown: &str) -> String {
    render_article(markdown).html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_heading_ids() {
        let html = render_html("## Getting Started\n\nHello *world*.\n\n### Use `cargo`\n");
        assert!(html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#), "{html}");
        assert!(html.contains(r#"<h3 id="use-cargo">Use <code>cargo</code></h3>"#), "{html}");
        assert!(html.contains("<em>world</em>"));
    }

    #[test]
    fn repeated_headings_get_unique_anchors() {
        let html = render_html("## Notes\n\n## Notes\n");
        assert!(html.contains(r#"<h2 id="notes">"#));
        assert!(html.contains(r#"<h2 id="notes-1">"#));
    }

    #[test]
    fn other_levels_are_untouched() {
        let html = render_html("# Title\n\n#### Deep\n");
        assert!(html.contains("<h1>Title</h1>"), "{html}");
        assert!(html.contains("<h4>Deep</h4>"), "{html}");
    }

    #[test]
    fn fenced_heading_lines_are_not_anchored() {
        let article = render_article("## Setup\n\n```sh\n## Setup\n```\n\n## Setup\n");
        let ids: Vec<&str> = article.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["setup", "setup-1"]);
        for id in ids {
            assert!(article.html.contains(&format!(r#"id="{id}""#)), "{}", article.html);
        }
        assert!(!article.html.contains("setup-2"));
        assert!(article.html.contains("<code class=\"language-sh\">## Setup\n</code>"));
    }

    #[test]
    fn headings_carry_rendered_text_and_level() {
        let article = render_article("## Getting Started\n\n### Use `cargo`\n\n#### Deep\n");
        assert_eq!(
            article.headings,
            vec![
                Heading {
                    id: "getting-started".to_string(),
                    text: "Getting Started".to_string(),
                    level: 2,
                },
                Heading {
                    id: "use-cargo".to_string(),
                    text: "Use cargo".to_string(),
                    level: 3,
                },
            ]
        );
    }
}
