use std::fmt::Write as _;

use serde::Serialize;
use site_content::Heading;

use super::layout::{line_offset, LayoutMetrics, Point, SVG_BOTTOM_MARGIN, SVG_WIDTH};

/// Radius of the rounded turn where the path changes indentation.
pub const CORNER_RADIUS: f64 = 4.0;

const CURVE_SAMPLES: usize = 32;

/// One heading's place on the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    pub offset: f64,
    pub top: f64,
    pub bottom: f64,
    pub center_y: f64,
}

impl PathSegment {
    pub fn center(&self) -> Point {
        Point::new(self.offset, self.center_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { control: Point, to: Point },
}

impl PathCommand {
    pub fn end(&self) -> Point {
        match *self {
            PathCommand::MoveTo { to } | PathCommand::LineTo { to } | PathCommand::QuadTo { to, .. } => to,
        }
    }
}

/// The drawable progress path of a table of contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocPath {
    pub segments: Vec<PathSegment>,
    pub commands: Vec<PathCommand>,
    pub width: f64,
    pub height: f64,
    pub total_length: f64,
}

/// Builds the path through the measured centers of the rendered entries.
///
/// `centers[i]` is the vertical center of entry `i` relative to the top of the
/// navigation panel. When the two slices disagree in length the shorter one wins.
/// Returns `None` when there is nothing to draw.
pub fn build_path(headings: &[Heading], centers: &[f64], metrics: &LayoutMetrics) -> Option<TocPath> {
    let count = headings.len().min(centers.len());
    if count == 0 {
        return None;
    }

    let segments: Vec<PathSegment> = headings
        .iter()
        .zip(centers)
        .take(count)
        .enumerate()
        .map(|(i, (heading, &center_y))| {
            let (top, bottom) = metrics.span(center_y, i, count);
            PathSegment {
                offset: line_offset(heading.level),
                top,
                bottom,
                center_y,
            }
        })
        .collect();

    let mut commands = vec![PathCommand::MoveTo {
        to: segments[0].center(),
    }];
    for pair in segments.windows(2) {
        push_connection(&mut commands, pair[0].center(), pair[1].center());
    }

    let max_y = segments
        .iter()
        .map(|s| s.center_y)
        .fold(f64::NEG_INFINITY, f64::max);
    let total_length = path_length(&commands);

    Some(TocPath {
        segments,
        commands,
        width: SVG_WIDTH,
        height: max_y + SVG_BOTTOM_MARGIN,
        total_length,
    })
}

/// Vertical run down to the midpoint, a horizontal run across with rounded
/// corners when the indentation changes, then vertical again.
fn push_connection(commands: &mut Vec<PathCommand>, from: Point, to: Point) {
    if from.x == to.x {
        commands.push(PathCommand::LineTo { to });
        return;
    }

    let mid_y = (from.y + to.y) / 2.0;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let radius = CORNER_RADIUS.min(dx.abs() / 2.0).min(dy / 2.0).max(0.0);

    if radius == 0.0 {
        commands.push(PathCommand::LineTo {
            to: Point::new(from.x, mid_y),
        });
        commands.push(PathCommand::LineTo {
            to: Point::new(to.x, mid_y),
        });
        commands.push(PathCommand::LineTo { to });
        return;
    }

    let sx = dx.signum();
    commands.push(PathCommand::LineTo {
        to: Point::new(from.x, mid_y - radius),
    });
    commands.push(PathCommand::QuadTo {
        control: Point::new(from.x, mid_y),
        to: Point::new(from.x + sx * radius, mid_y),
    });
    commands.push(PathCommand::LineTo {
        to: Point::new(to.x - sx * radius, mid_y),
    });
    commands.push(PathCommand::QuadTo {
        control: Point::new(to.x, mid_y),
        to: Point::new(to.x, mid_y + radius),
    });
    commands.push(PathCommand::LineTo { to });
}

fn path_length(commands: &[PathCommand]) -> f64 {
    let mut length = 0.0;
    let mut cursor = Point::default();
    for command in commands {
        match *command {
            PathCommand::MoveTo { to } => cursor = to,
            PathCommand::LineTo { to } => {
                length += cursor.distance(to);
                cursor = to;
            }
            PathCommand::QuadTo { control, to } => {
                length += quad_length(cursor, control, to);
                cursor = to;
            }
        }
    }
    length
}

fn quad_length(p0: Point, p1: Point, p2: Point) -> f64 {
    let at = |t: f64| {
        let u = 1.0 - t;
        Point::new(
            u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
            u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
        )
    };
    let mut length = 0.0;
    let mut prev = p0;
    for i in 1..=CURVE_SAMPLES {
        let next = at(i as f64 / CURVE_SAMPLES as f64);
        length += prev.distance(next);
        prev = next;
    }
    length
}

impl TocPath {
    pub fn centers(&self) -> Vec<Point> {
        self.segments.iter().map(PathSegment::center).collect()
    }

    pub fn center(&self, index: usize) -> Option<Point> {
        self.segments.get(index).map(PathSegment::center)
    }

    /// Nearest drawn entry for `index`. Measurements can cover fewer entries than
    /// there are headings, in which case later headings map onto the last segment.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.segments.len().saturating_sub(1))
    }

    /// Fraction of the path to highlight when `index` is active.
    pub fn progress_for(&self, index: usize) -> f64 {
        let last = self.segments.len().saturating_sub(1);
        if last == 0 {
            return 0.0;
        }
        self.clamp_index(index) as f64 / last as f64
    }

    /// `stroke-dasharray` value that shows `progress` of the path.
    pub fn fill_dasharray(&self, progress: f64) -> String {
        format!(
            "{} {}",
            fmt_num(self.total_length * progress.clamp(0.0, 1.0)),
            fmt_num(self.total_length)
        )
    }

    /// SVG path data, e.g. `M5 10 L5 42`.
    pub fn d(&self) -> String {
        let mut out = String::new();
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = match *command {
                PathCommand::MoveTo { to } => write!(out, "M{} {}", fmt_num(to.x), fmt_num(to.y)),
                PathCommand::LineTo { to } => write!(out, "L{} {}", fmt_num(to.x), fmt_num(to.y)),
                PathCommand::QuadTo { control, to } => write!(
                    out,
                    "Q{} {} {} {}",
                    fmt_num(control.x),
                    fmt_num(control.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                ),
            };
        }
        out
    }
}

/// Compact number formatting: integers without a fraction, others to two places.
pub(crate) fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
