//! Engagement - aiming at the opponent, retreating and getting unstuck

use super::geometry::{distance_to_segment, normalize_degrees, Point};
use super::world::WorldState;

/// Walls closer than this to the line of fire are counted
pub const WALL_CLEARANCE: f64 = 18.0;

/// Heading from the tank to the opponent
pub fn engagement_angle(tank: Point, opponent: Point) -> f64 {
    tank.heading_to(opponent)
}

/// Heading directly away from the opponent
pub fn retreat_heading(engagement_angle: f64) -> f64 {
    normalize_degrees(engagement_angle + 180.0)
}

/// Opponent is close enough to back off
pub fn should_retreat(tank: Point, opponent: Point, retreat_distance: f64) -> bool {
    tank.distance(opponent) < retreat_distance
}

/// Tank has not moved appreciably since the previous turn
pub fn is_stuck(previous: Option<Point>, current: Point, stuck_distance: f64) -> bool {
    previous.is_some_and(|p| p.distance(current) < stuck_distance)
}

/// Number of walls sitting on the line of fire between tank and opponent
pub fn walls_in_line_of_fire(world: &WorldState, tank: Point, opponent: Point) -> usize {
    world
        .walls()
        .filter_map(|obj| obj.point())
        .filter(|&wall| distance_to_segment(wall, tank, opponent) < WALL_CLEARANCE)
        .count()
}
