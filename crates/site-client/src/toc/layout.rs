use serde::Serialize;

/// Width of the drawing surface holding the path.
pub const SVG_WIDTH: f64 = 30.0;
/// Extra room below the last center so the end dot is not clipped.
pub const SVG_BOTTOM_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Horizontal position of the path line for a heading level: level 2 stays left,
/// deeper levels step right.
pub fn line_offset(level: u8) -> f64 {
    if level <= 2 {
        5.0
    } else {
        18.0
    }
}

/// Left padding of the entry text for a heading level.
pub fn item_indent(level: u8) -> f64 {
    match level {
        0..=2 => 24.0,
        3 => 36.0,
        _ => 48.0,
    }
}

/// Typography of the entry list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub line_height: f64,
    /// Padding above and below each entry, except above the first and below the last.
    pub item_padding: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            item_padding: 6.0,
        }
    }
}

impl LayoutMetrics {
    /// Distance between two consecutive entry centers.
    pub fn item_pitch(&self) -> f64 {
        self.line_height + 2.0 * self.item_padding
    }

    /// Centers `count` single-line entries would have. Used before real
    /// measurements exist and for server-side rendering.
    pub fn estimate_centers(&self, count: usize) -> Vec<f64> {
        let first = self.line_height / 2.0;
        (0..count)
            .map(|i| first + i as f64 * self.item_pitch())
            .collect()
    }

    /// Vertical span of entry `index` of `count` around its measured center.
    pub fn span(&self, center_y: f64, index: usize, count: usize) -> (f64, f64) {
        let half = self.line_height / 2.0;
        let above = if index == 0 { 0.0 } else { self.item_padding };
        let below = if index + 1 >= count { 0.0 } else { self.item_padding };
        (center_y - half - above, center_y + half + below)
    }
}
