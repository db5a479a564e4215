//! Map objects as reported by the game server

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Object type codes. The numeric values are fixed by the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ObjectType {
    Tank,
    Bullet,
    Wall,
    DestructibleWall,
    Boundary,
    ClosingBoundary,
    Powerup,
    /// A code this bot does not know about; stored but never acted on
    Unknown(u8),
}

impl ObjectType {
    /// Walls that block or rebound bullets
    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall | Self::DestructibleWall)
    }
}

impl From<u8> for ObjectType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Tank,
            2 => Self::Bullet,
            3 => Self::Wall,
            4 => Self::DestructibleWall,
            5 => Self::Boundary,
            6 => Self::ClosingBoundary,
            7 => Self::Powerup,
            other => Self::Unknown(other),
        }
    }
}

impl From<ObjectType> for u8 {
    fn from(kind: ObjectType) -> Self {
        match kind {
            ObjectType::Tank => 1,
            ObjectType::Bullet => 2,
            ObjectType::Wall => 3,
            ObjectType::DestructibleWall => 4,
            ObjectType::Boundary => 5,
            ObjectType::ClosingBoundary => 6,
            ObjectType::Powerup => 7,
            ObjectType::Unknown(code) => code,
        }
    }
}

/// Either a single point or an ordered list of corners (boundaries).
/// Used for both positions and velocities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coords {
    Point(Point),
    Corners(Vec<Point>),
}

impl Coords {
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            Self::Corners(_) => None,
        }
    }

    pub fn as_corners(&self) -> Option<&[Point]> {
        match self {
            Self::Point(_) => None,
            Self::Corners(corners) => Some(corners),
        }
    }

    /// Every point this value carries
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::Corners(corners) => corners,
        }
    }
}

/// A single object on the map. Fields the bot does not use are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub position: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Coords>,
}

impl GameObject {
    /// Position for point objects (tanks, bullets, powerups, walls)
    pub fn point(&self) -> Option<Point> {
        self.position.as_point()
    }

    /// Velocity for point objects; missing velocity is at rest
    pub fn point_velocity(&self) -> Point {
        self.velocity
            .as_ref()
            .and_then(Coords::as_point)
            .unwrap_or(Point::ORIGIN)
    }
}

#[cfg(test)]
impl GameObject {
    /// Point-positioned object at rest
    pub fn at(kind: ObjectType, position: Point) -> Self {
        Self {
            kind,
            position: Coords::Point(position),
            velocity: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Point) -> Self {
        self.velocity = Some(Coords::Point(velocity));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tank_with_extra_fields() {
        let obj: GameObject = serde_json::from_str(
            r#"{"type":1,"position":[10.0,20.0],"velocity":[0.0,-1.5],"hp":3,"powerup_levels":{}}"#,
        )
        .unwrap();
        assert_eq!(obj.kind, ObjectType::Tank);
        assert_eq!(obj.point(), Some(Point::new(10.0, 20.0)));
        assert_eq!(obj.point_velocity(), Point::new(0.0, -1.5));
    }

    #[test]
    fn parses_closing_boundary_corners() {
        let obj: GameObject = serde_json::from_str(
            r#"{"type":6,
                "position":[[2.5,997.5],[2.5,2.5],[1797.5,2.5],[1797.5,997.5]],
                "velocity":[[10.0,0.0],[0.0,10.0],[-10.0,0.0],[0.0,-10.0]]}"#,
        )
        .unwrap();
        assert_eq!(obj.kind, ObjectType::ClosingBoundary);
        let corners = obj.position.as_corners().unwrap();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[2], Point::new(1797.5, 2.5));
        assert!(obj.point().is_none());
        // Per-corner velocity is not a point velocity
        assert_eq!(obj.point_velocity(), Point::ORIGIN);
    }

    #[test]
    fn unknown_type_codes_are_kept() {
        let obj: GameObject =
            serde_json::from_str(r#"{"type":42,"position":[1,1],"powerup_type":"HEALTH"}"#).unwrap();
        assert_eq!(obj.kind, ObjectType::Unknown(42));
        assert_eq!(u8::from(obj.kind), 42);
    }

    #[test]
    fn codes_match_server_table() {
        for code in 1u8..=7 {
            assert_eq!(u8::from(ObjectType::from(code)), code);
            assert!(!matches!(ObjectType::from(code), ObjectType::Unknown(_)));
        }
        assert!(ObjectType::DestructibleWall.is_wall());
        assert!(!ObjectType::Boundary.is_wall());
    }
}
