//! Threat assessment - incoming bullets and the dodge heading

use rand::Rng;

use super::geometry::{heading_of, normalize_degrees, Point};
use super::object::ObjectType;
use super::world::WorldState;

/// Distances are clamped to this before weighting so a bullet sitting on
/// the tank gets the largest possible weight instead of dividing by zero.
pub const MIN_THREAT_DISTANCE: f64 = 1e-6;

/// A bullet judged to be closing on the tank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub position: Point,
    pub velocity: Point,
    /// Distance to the tank this turn
    pub distance: f64,
}

impl Threat {
    /// Travel heading of the bullet
    pub fn heading(&self) -> f64 {
        heading_of(self.velocity.x, self.velocity.y)
    }

    /// Closer bullets weigh more
    pub fn weight(&self) -> f64 {
        1.0 / self.distance.max(MIN_THREAT_DISTANCE)
    }
}

/// True when a bullet is not moving away from the tank over one velocity
/// step. Equal distances count as approaching.
pub fn is_approaching(bullet: Point, velocity: Point, tank: Point) -> bool {
    let now = bullet.distance(tank);
    let next = bullet.offset(velocity).distance(tank);
    next <= now
}

/// Per-axis proximity window check
pub fn within_window(bullet: Point, tank: Point, window: f64) -> bool {
    (bullet.x - tank.x).abs() < window && (bullet.y - tank.y).abs() < window
}

/// Collect every approaching bullet inside the window around the tank
pub fn assess_threats(world: &WorldState, tank: Point, window: f64) -> Vec<Threat> {
    world
        .of_type(ObjectType::Bullet)
        .filter_map(|(_, bullet)| {
            let position = bullet.point()?;
            let velocity = bullet.point_velocity();
            (within_window(position, tank, window) && is_approaching(position, velocity, tank))
                .then(|| Threat {
                    position,
                    velocity,
                    distance: position.distance(tank),
                })
        })
        .collect()
}

/// Heading to dodge along, or `None` without threats.
///
/// The inverse-distance weighted mean of the threat headings is taken as a
/// plain arithmetic mean. That is only close to the circular mean when all
/// headings sit on one side of the 0/360 seam.
/// The result is rotated by 90 or 180 degrees, chosen by `rng`.
pub fn dodge_heading<R: Rng>(threats: &[Threat], rng: &mut R) -> Option<f64> {
    if threats.is_empty() {
        return None;
    }

    let (weighted_sum, total_weight) = threats.iter().fold((0.0, 0.0), |(sum, total), t| {
        let w = t.weight();
        (sum + w * t.heading(), total + w)
    });
    let mean = weighted_sum / total_weight;

    let perpendicular = normalize_degrees(mean + 90.0);
    let heading = if rng.gen_bool(0.5) {
        perpendicular
    } else {
        normalize_degrees(perpendicular + 90.0)
    };
    Some(heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::object::GameObject;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn threat(position: Point, velocity: Point, tank: Point) -> Threat {
        Threat {
            position,
            velocity,
            distance: position.distance(tank),
        }
    }

    fn angle_eq(a: f64, b: f64) -> bool {
        let diff = normalize_degrees(a - b);
        diff < 1e-9 || 360.0 - diff < 1e-9
    }

    #[test]
    fn resting_bullets_count_as_approaching() {
        let tank = Point::new(50.0, 50.0);
        for bullet in [Point::new(40.0, 50.0), Point::new(50.0, 50.0), Point::new(-3.0, 77.0)] {
            assert!(is_approaching(bullet, Point::ORIGIN, tank));
        }
    }

    #[test]
    fn receding_bullets_are_not_threats() {
        let tank = Point::new(0.0, 0.0);
        assert!(is_approaching(Point::new(10.0, 0.0), Point::new(-1.0, 0.0), tank));
        assert!(!is_approaching(Point::new(10.0, 0.0), Point::new(1.0, 0.0), tank));
    }

    #[test]
    fn window_is_checked_on_both_axes() {
        let tank = Point::new(100.0, 100.0);
        assert!(within_window(Point::new(150.0, 60.0), tank, 100.0));
        assert!(!within_window(Point::new(150.0, 300.0), tank, 100.0));
        assert!(!within_window(Point::new(200.0, 100.0), tank, 100.0));
    }

    #[test]
    fn assess_collects_only_close_approaching_bullets() {
        let tank = Point::new(100.0, 100.0);
        let mut world = WorldState::new();
        world.upsert(
            "incoming",
            GameObject::at(ObjectType::Bullet, Point::new(60.0, 100.0))
                .with_velocity(Point::new(5.0, 0.0)),
        );
        world.upsert(
            "leaving",
            GameObject::at(ObjectType::Bullet, Point::new(140.0, 100.0))
                .with_velocity(Point::new(5.0, 0.0)),
        );
        world.upsert(
            "far",
            GameObject::at(ObjectType::Bullet, Point::new(600.0, 100.0))
                .with_velocity(Point::new(-5.0, 0.0)),
        );
        world.upsert(
            "not-a-bullet",
            GameObject::at(ObjectType::Unknown(12), Point::new(99.0, 100.0)),
        );

        let threats = assess_threats(&world, tank, 100.0);
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].position, Point::new(60.0, 100.0));
        assert_eq!(threats[0].distance, 40.0);
    }

    #[test]
    fn no_threats_means_no_dodge() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(dodge_heading(&[], &mut rng), None);
    }

    #[test]
    fn single_threat_dodges_perpendicular_or_reverse() {
        let tank = Point::new(0.0, 0.0);
        let cases = [
            (Point::new(-30.0, 0.0), Point::new(4.0, 0.0)),
            (Point::new(0.0, -30.0), Point::new(0.0, 4.0)),
            (Point::new(30.0, 30.0), Point::new(-1.0, -1.0)),
            (Point::new(20.0, 0.0), Point::new(-3.0, 0.0)),
        ];

        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for (position, velocity) in cases {
                let t = threat(position, velocity, tank);
                let h = t.heading();
                let dodge = dodge_heading(&[t], &mut rng).unwrap();
                assert!((0.0..360.0).contains(&dodge));
                assert!(
                    angle_eq(dodge, h + 90.0) || angle_eq(dodge, h + 180.0),
                    "heading {h} dodged to {dodge}"
                );
                assert!(!angle_eq(dodge, h));
            }
        }
    }

    #[test]
    fn both_dodge_offsets_occur() {
        let tank = Point::new(0.0, 0.0);
        let t = threat(Point::new(-30.0, 0.0), Point::new(4.0, 0.0), tank);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let results: Vec<f64> = (0..64)
            .map(|_| dodge_heading(&[t], &mut rng).unwrap())
            .collect();
        assert!(results.iter().any(|d| angle_eq(*d, 90.0)));
        assert!(results.iter().any(|d| angle_eq(*d, 180.0)));
    }

    #[test]
    fn dodge_is_deterministic_under_seed() {
        let tank = Point::new(0.0, 0.0);
        let threats = [
            threat(Point::new(-30.0, 5.0), Point::new(4.0, 0.5), tank),
            threat(Point::new(10.0, -40.0), Point::new(0.0, 3.0), tank),
        ];
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..16 {
            assert_eq!(dodge_heading(&threats, &mut a), dodge_heading(&threats, &mut b));
        }
    }

    #[test]
    fn closer_threat_dominates_the_mean() {
        let tank = Point::new(0.0, 0.0);
        // Heading 0 at distance 10, heading 90 at distance 90
        let near = threat(Point::new(-10.0, 0.0), Point::new(1.0, 0.0), tank);
        let far = threat(Point::new(0.0, -90.0), Point::new(0.0, 1.0), tank);
        // mean = (0.1 * 0 + (1/90) * 90) / (0.1 + 1/90) = 9.0
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dodge = dodge_heading(&[near, far], &mut rng).unwrap();
        assert!(angle_eq(dodge, 99.0) || angle_eq(dodge, 189.0), "got {dodge}");
    }

    #[test]
    fn coincident_bullet_gets_maximal_weight() {
        let tank = Point::new(10.0, 10.0);
        let on_top = threat(tank, Point::new(0.0, 2.0), tank);
        let other = threat(Point::new(-40.0, 10.0), Point::new(2.0, 0.0), tank);
        assert_eq!(on_top.distance, 0.0);
        assert!(on_top.weight().is_finite());

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let dodge = dodge_heading(&[on_top, other], &mut rng).unwrap();
        // The mean is pulled to within a hair of 90 degrees
        assert!(
            (dodge - 180.0).abs() < 1e-3 || (dodge - 270.0).abs() < 1e-3,
            "got {dodge}"
        );
    }
}
