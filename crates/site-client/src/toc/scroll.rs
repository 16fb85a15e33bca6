use std::time::{Duration, Instant};

/// A heading counts as reached once its anchor is this far below the top of the viewport.
pub const LOOK_AHEAD: f64 = 100.0;
/// Within this distance of the page end the last heading is always active.
pub const BOTTOM_THRESHOLD: f64 = 100.0;
/// Scroll events are ignored this long after a click, while the smooth scroll runs.
pub const CLICK_COOLDOWN: Duration = Duration::from_millis(1000);
/// Clicked headings land this far below the top of the viewport.
pub const SCROLL_MARGIN: f64 = 100.0;

/// Window scroll state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_y: f64,
    pub inner_height: f64,
    pub page_height: f64,
}

impl Viewport {
    pub fn is_near_bottom(&self) -> bool {
        self.scroll_y + self.inner_height >= self.page_height - BOTTOM_THRESHOLD
    }
}

/// Index of the heading the reader is in.
///
/// `anchor_tops[i]` is the document offset of heading `i`'s anchor, or `None` when the
/// anchor is missing from the page. Defaults to the first heading.
pub fn active_index(anchor_tops: &[Option<f64>], viewport: &Viewport) -> usize {
    if anchor_tops.is_empty() {
        return 0;
    }
    if viewport.is_near_bottom() {
        return anchor_tops.len() - 1;
    }
    let line = viewport.scroll_y + LOOK_AHEAD;
    anchor_tops
        .iter()
        .enumerate()
        .filter(|(_, top)| top.is_some_and(|top| top <= line))
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0)
}

/// A smooth scroll the host has to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub index: usize,
    pub top: f64,
}

/// Tracks the active heading across scroll events and entry clicks.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    len: usize,
    active: usize,
    suppressed_until: Option<Instant>,
}

impl ScrollTracker {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            active: 0,
            suppressed_until: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.suppressed_until.is_some_and(|until| now < until)
    }

    /// Recomputes the active heading. Returns the new index only when it changed.
    pub fn on_scroll(&mut self, anchor_tops: &[Option<f64>], viewport: &Viewport, now: Instant) -> Option<usize> {
        if self.is_empty() || self.is_suppressed(now) {
            return None;
        }
        self.suppressed_until = None;
        let next = if viewport.is_near_bottom() {
            self.len - 1
        } else {
            active_index(&anchor_tops[..anchor_tops.len().min(self.len)], viewport)
        };
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(next)
    }

    /// Activates `index` immediately and asks for a scroll to it.
    ///
    /// `element_top` is the anchor's top relative to the viewport. Scroll events are
    /// ignored for [`CLICK_COOLDOWN`] so the smooth scroll does not flicker the marker.
    pub fn on_click(
        &mut self,
        index: usize,
        element_top: f64,
        viewport: &Viewport,
        now: Instant,
    ) -> Option<ScrollRequest> {
        if index >= self.len {
            return None;
        }
        self.active = index;
        self.suppressed_until = Some(now + CLICK_COOLDOWN);
        Some(ScrollRequest {
            index,
            top: element_top + viewport.scroll_y - SCROLL_MARGIN,
        })
    }
}

/// Percentage of the horizontal progress bar in the mobile TOC.
pub fn mobile_progress(active: usize, len: usize, near_bottom: bool) -> f64 {
    if len == 0 {
        return 0.0;
    }
    if near_bottom {
        return 100.0;
    }
    (active.min(len - 1) + 1) as f64 / len as f64 * 100.0
}

/// Horizontal scroll offset that centers the active chip of the mobile TOC.
/// The first chip always keeps the strip at its start.
pub fn mobile_scroll_left(index: usize, chip_left: f64, chip_width: f64, container_width: f64) -> f64 {
    if index == 0 {
        return 0.0;
    }
    (chip_left - container_width / 2.0 + chip_width / 2.0).max(0.0)
}
