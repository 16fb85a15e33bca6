use std::time::Instant;

use site_content::Heading;
use tracing::debug;

use super::animator::{AnimationHandle, Frame, MarkerAnimator};
use super::debounce::Debouncer;
use super::layout::{LayoutMetrics, Point};
use super::path::{build_path, TocPath};
use super::scroll::{ScrollRequest, ScrollTracker, Viewport};
use super::svg::{render_toc_nav, render_toc_svg};

/// Result of clicking a table-of-contents entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub scroll: ScrollRequest,
    pub animation: Option<AnimationHandle>,
}

/// Desktop table of contents: headings, the path drawn through their entries,
/// and the marker that follows the reader.
///
/// The host feeds it events with explicit timestamps and redraws from
/// [`TableOfContents::svg`] after each [`TableOfContents::on_frame`].
#[derive(Debug, Clone)]
pub struct TableOfContents {
    headings: Vec<Heading>,
    metrics: LayoutMetrics,
    path: Option<TocPath>,
    tracker: ScrollTracker,
    animator: MarkerAnimator,
    animation: Option<AnimationHandle>,
    resize: Debouncer,
}

impl TableOfContents {
    /// Lays the entries out with estimated centers until the host measures them.
    pub fn new(headings: Vec<Heading>, metrics: LayoutMetrics) -> Self {
        let centers = metrics.estimate_centers(headings.len());
        let path = build_path(&headings, &centers, &metrics);
        let start = path.as_ref().and_then(|p| p.center(0)).unwrap_or_default();
        Self {
            tracker: ScrollTracker::new(headings.len()),
            headings,
            metrics,
            path,
            animator: MarkerAnimator::new(start),
            animation: None,
            resize: Debouncer::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn path(&self) -> Option<&TocPath> {
        self.path.as_ref()
    }

    pub fn active_index(&self) -> usize {
        self.tracker.active()
    }

    pub fn marker(&self) -> Option<Point> {
        self.path.as_ref().map(|_| self.animator.position())
    }

    /// Fill fraction currently drawn.
    pub fn progress(&self) -> f64 {
        self.animator.progress()
    }

    /// Rebuilds the path from measured entry centers and snaps the marker onto it.
    pub fn measure(&mut self, centers: &[f64]) {
        self.path = build_path(&self.headings, centers, &self.metrics);
        self.animation = None;
        if let Some(path) = &self.path {
            let active = path.clamp_index(self.tracker.active());
            let at = path.center(active).unwrap_or_default();
            self.animator.jump_to(active, at, path.progress_for(active));
            debug!(entries = path.segments.len(), length = path.total_length, "toc path measured");
        }
    }

    pub fn on_resize(&mut self, now: Instant) {
        self.resize.trigger(now);
    }

    /// True once the resize burst has settled and the host should call [`Self::measure`].
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        self.resize.poll(now)
    }

    pub fn on_scroll(&mut self, anchor_tops: &[Option<f64>], viewport: &Viewport, now: Instant) -> Option<AnimationHandle> {
        let index = self.tracker.on_scroll(anchor_tops, viewport, now)?;
        self.animate_to(index, now)
    }

    pub fn on_click(&mut self, index: usize, element_top: f64, viewport: &Viewport, now: Instant) -> Option<ClickOutcome> {
        let scroll = self.tracker.on_click(index, element_top, viewport, now)?;
        Some(ClickOutcome {
            scroll,
            animation: self.animate_to(index, now),
        })
    }

    /// Advances the marker. Returns `None` when nothing is animating.
    pub fn on_frame(&mut self, now: Instant) -> Option<Frame> {
        let handle = self.animation?;
        let frame = self.animator.tick(handle, now);
        if frame.map_or(true, |f| f.finished) {
            self.animation = None;
        }
        frame
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn svg(&self) -> String {
        match (&self.path, self.marker()) {
            (Some(path), Some(marker)) => render_toc_svg(path, marker, self.active_index(), self.progress()),
            _ => String::new(),
        }
    }

    pub fn nav(&self) -> String {
        render_toc_nav(&self.headings, self.active_index())
    }

    fn animate_to(&mut self, index: usize, now: Instant) -> Option<AnimationHandle> {
        let path = self.path.as_ref()?;
        let index = path.clamp_index(index);
        let target = path.center(index)?;
        let handle = self.animator.retarget(index, target, path.progress_for(index), now)?;
        self.animation = Some(handle);
        Some(handle)
    }
}
