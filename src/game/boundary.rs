//! Closing boundary tracking and avoidance

use super::geometry::Point;
use super::object::{GameObject, ObjectType};
use super::world::WorldState;

/// The shrinking arena edge. Corners are ordered top-left, bottom-left,
/// bottom-right, top-right.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingBoundary {
    pub corners: [Point; 4],
    /// Per-corner velocity, zero when the server did not send one
    pub velocities: [Point; 4],
}

impl ClosingBoundary {
    /// Read a closing boundary object; `None` for any other shape
    pub fn from_object(object: &GameObject) -> Option<Self> {
        if object.kind != ObjectType::ClosingBoundary {
            return None;
        }

        let corners: [Point; 4] = object.position.as_corners()?.try_into().ok()?;
        let velocities = object
            .velocity
            .as_ref()
            .and_then(|v| v.as_corners())
            .and_then(|v| <[Point; 4]>::try_from(v).ok())
            .unwrap_or([Point::ORIGIN; 4]);

        Some(Self { corners, velocities })
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    /// Strict interior test against the corner extremes
    pub fn contains(&self, p: Point) -> bool {
        let (min, max) = self.extremes();
        p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
    }

    /// True when the tank is within `margin` of the top-left or
    /// bottom-right corner on either axis
    pub fn is_near_edge(&self, tank: Point, margin: f64) -> bool {
        [self.top_left(), self.bottom_right()].into_iter().any(|corner| {
            (corner.x - tank.x).abs() < margin || (corner.y - tank.y).abs() < margin
        })
    }

    fn extremes(&self) -> (Point, Point) {
        self.corners.iter().fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(min, max), c| {
                (
                    Point::new(min.x.min(c.x), min.y.min(c.y)),
                    Point::new(max.x.max(c.x), max.y.max(c.y)),
                )
            },
        )
    }
}

/// Every well-formed closing boundary on the map, ordered by id
pub fn closing_boundaries(world: &WorldState) -> Vec<ClosingBoundary> {
    let mut found: Vec<_> = world
        .of_type(ObjectType::ClosingBoundary)
        .filter_map(|(id, obj)| ClosingBoundary::from_object(obj).map(|b| (id, b)))
        .collect();
    found.sort_by(|a, b| a.0.cmp(b.0));
    found.into_iter().map(|(_, b)| b).collect()
}

/// First boundary the tank is too close to, if any. Later boundaries are
/// not checked once one matches.
pub fn first_breach(
    boundaries: &[ClosingBoundary],
    tank: Point,
    margin: f64,
) -> Option<&ClosingBoundary> {
    boundaries.iter().find(|b| b.is_near_edge(tank, margin))
}
