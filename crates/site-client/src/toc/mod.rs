//! Table of contents with a scroll-synchronised progress path.
//!
//! The pipeline has two phases. [`layout`] is pure: heading depth to indentation and
//! an estimate of item positions. [`path`] runs after render with the measured item
//! centers and builds the drawable path. [`scroll`] and [`animator`] keep the marker
//! in sync with the reader, and [`controller::TableOfContents`] wires them together.

pub mod animator;
pub mod controller;
pub mod debounce;
pub mod layout;
pub mod path;
pub mod scroll;
pub mod svg;

pub use animator::{AnimationHandle, Frame, MarkerAnimator, MarkerState};
pub use controller::{ClickOutcome, TableOfContents};
pub use layout::{LayoutMetrics, Point};
pub use path::{build_path, PathCommand, PathSegment, TocPath};
pub use scroll::{ScrollRequest, ScrollTracker, Viewport};
