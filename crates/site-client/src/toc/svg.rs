//! Markup for the table of contents.

use std::fmt::Write as _;

use pulldown_cmark_escape::escape_html;
use site_content::Heading;

use super::layout::{item_indent, Point};
use super::path::{fmt_num, TocPath};

const DOT_RADIUS: u32 = 3;
const MARKER_RADIUS: u32 = 5;
const HIGHLIGHT: &str = "var(--text-primary)";
const MUTED: &str = "var(--text-muted)";
const TRACK: &str = "var(--border)";

/// Track, progress fill, start and end dots, and the marker.
pub fn render_toc_svg(path: &TocPath, marker: Point, active: usize, progress: f64) -> String {
    let (Some(first), Some(last)) = (path.segments.first(), path.segments.last()) else {
        return String::new();
    };
    let last_index = path.segments.len() - 1;
    let d = path.d();
    let dot_fill = |highlighted: bool| if highlighted { HIGHLIGHT } else { MUTED };

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg class="toc-path" width="{}" height="{}" aria-hidden="true">"#,
        fmt_num(path.width),
        fmt_num(path.height)
    );
    let _ = write!(
        out,
        r#"<path d="{d}" fill="none" stroke="{TRACK}" stroke-width="2" stroke-linecap="round"/>"#
    );
    let _ = write!(
        out,
        r#"<path d="{d}" fill="none" stroke="{MUTED}" stroke-width="2" stroke-linecap="round" stroke-dasharray="{}"/>"#,
        path.fill_dasharray(progress)
    );
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{DOT_RADIUS}" fill="{}"/>"#,
        fmt_num(first.offset),
        fmt_num(first.center_y),
        dot_fill(active == 0)
    );
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{MARKER_RADIUS}" fill="{HIGHLIGHT}"/>"#,
        fmt_num(marker.x),
        fmt_num(marker.y)
    );
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{DOT_RADIUS}" fill="{}"/>"#,
        fmt_num(last.offset),
        fmt_num(last.center_y),
        dot_fill(active >= last_index)
    );
    out.push_str("</svg>");
    out
}

/// Entry list. Entries before the active one are marked `past`, after it `upcoming`.
pub fn render_toc_nav(headings: &[Heading], active: usize) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="toc-entries">"#);
    for (index, heading) in headings.iter().enumerate() {
        let state = match index.cmp(&active) {
            std::cmp::Ordering::Less => "past",
            std::cmp::Ordering::Equal => "active",
            std::cmp::Ordering::Greater => "upcoming",
        };
        let _ = write!(out, r##"<li><button class="toc-entry level-{} {state}" data-target="#"##, heading.level);
        // Writing into a String cannot fail.
        let _ = escape_html(&mut out, &heading.id);
        let _ = write!(out, r#"" style="padding-left: {}px">"#, fmt_num(item_indent(heading.level)));
        let _ = escape_html(&mut out, &heading.text);
        out.push_str("</button></li>");
    }
    out.push_str("</ul>");
    out
}
