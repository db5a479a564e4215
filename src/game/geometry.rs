//! Plane geometry helpers shared by the decision systems
//!
//! Headings are in degrees, measured with `atan2(dy, dx)` and normalized
//! to `[0, 360)`.

use serde::{Deserialize, Serialize};

/// A point or vector on the map. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from this point towards another
    pub fn heading_to(self, other: Point) -> f64 {
        heading_of(other.x - self.x, other.y - self.y)
    }

    /// Translate by a vector
    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Normalize any angle in degrees to `[0, 360)`
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Heading of a direction vector
pub fn heading_of(dx: f64, dy: f64) -> f64 {
    normalize_degrees(dy.atan2(dx).to_degrees())
}

/// Shortest distance from `p` to the segment `a`-`b`.
///
/// A segment with `a.x == b.x` is vertical and is measured on the y axis
/// directly; no slope is ever computed for it.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    if a.x == b.x {
        let (lo, hi) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
        let clamped_y = p.y.clamp(lo, hi);
        return p.distance(Point::new(a.x, clamped_y));
    }

    let slope = (b.y - a.y) / (b.x - a.x);
    let intercept = a.y - slope * a.x;

    // Foot of the perpendicular on the infinite line y = slope * x + intercept
    let foot_x = (p.x + slope * (p.y - intercept)) / (1.0 + slope * slope);
    let (lo, hi) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
    let clamped_x = foot_x.clamp(lo, hi);

    p.distance(Point::new(clamped_x, slope * clamped_x + intercept))
}
