//! Opportunity assessment - powerups worth driving to

use super::boundary::ClosingBoundary;
use super::geometry::Point;
use super::object::ObjectType;
use super::world::WorldState;

/// A powerup the tank could pick up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerupTarget {
    pub id: String,
    pub position: Point,
    pub distance: f64,
}

/// Nearest powerup to the tank, regardless of reachability
pub fn nearest_powerup(world: &WorldState, tank: Point) -> Option<PowerupTarget> {
    world
        .of_type(ObjectType::Powerup)
        .filter_map(|(id, obj)| {
            let position = obj.point()?;
            Some(PowerupTarget {
                id: id.to_string(),
                position,
                distance: position.distance(tank),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Nearest powerup, kept only if it sits inside the closing boundary.
/// Without a boundary the whole map is fair game.
pub fn reachable_powerup(
    world: &WorldState,
    tank: Point,
    boundary: Option<&ClosingBoundary>,
) -> Option<PowerupTarget> {
    let nearest = nearest_powerup(world, tank)?;
    match boundary {
        Some(b) if !b.contains(nearest.position) => None,
        _ => Some(nearest),
    }
}
