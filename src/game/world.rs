//! Local model of every object currently on the map

use std::collections::HashMap;

use super::geometry::Point;
use super::object::{GameObject, ObjectType};
use crate::comms::protocol::TurnSnapshot;

/// Map extent derived from the boundary objects
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Every object currently known to exist, keyed by id
#[derive(Debug, Default)]
pub struct WorldState {
    objects: HashMap<String, GameObject>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one snapshot: deletions first, then updates
    pub fn apply(&mut self, snapshot: TurnSnapshot) {
        for id in &snapshot.deleted_objects {
            self.remove(id);
        }
        self.objects.extend(snapshot.updated_objects);
    }

    /// Remove an object; a missing id is a no-op
    pub fn remove(&mut self, id: &str) -> Option<GameObject> {
        self.objects.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Position of a point object, if present
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.get(id).and_then(GameObject::point)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects of one type
    pub fn of_type(&self, kind: ObjectType) -> impl Iterator<Item = (&str, &GameObject)> {
        self.objects
            .iter()
            .filter(move |(_, obj)| obj.kind == kind)
            .map(|(id, obj)| (id.as_str(), obj))
    }

    /// Plain and destructible walls
    pub fn walls(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values().filter(|obj| obj.kind.is_wall())
    }

    /// Map size: the biggest x and y among the static boundary's corners
    pub fn map_size(&self) -> Option<MapSize> {
        self.extent(ObjectType::Boundary)
    }

    /// Area spanned by the closing boundaries. Matches the map only until
    /// they start to shrink.
    pub fn closing_extent(&self) -> Option<MapSize> {
        self.extent(ObjectType::ClosingBoundary)
    }

    fn extent(&self, kind: ObjectType) -> Option<MapSize> {
        self.objects
            .values()
            .filter(|obj| obj.kind == kind)
            .flat_map(|obj| obj.position.points())
            .fold(None, |acc: Option<MapSize>, corner| {
                let size = acc.unwrap_or(MapSize {
                    width: f64::NEG_INFINITY,
                    height: f64::NEG_INFINITY,
                });
                Some(MapSize {
                    width: size.width.max(corner.x),
                    height: size.height.max(corner.y),
                })
            })
    }
}

#[cfg(test)]
impl WorldState {
    pub fn upsert(&mut self, id: impl Into<String>, object: GameObject) {
        self.objects.insert(id.into(), object);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::object::Coords;

    fn tank(x: f64, y: f64) -> GameObject {
        GameObject::at(ObjectType::Tank, Point::new(x, y))
    }

    fn snapshot(updated: Vec<(&str, GameObject)>, deleted: &[&str]) -> TurnSnapshot {
        TurnSnapshot {
            updated_objects: updated
                .into_iter()
                .map(|(id, obj)| (id.to_string(), obj))
                .collect(),
            deleted_objects: deleted.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn deleting_missing_id_leaves_state_unchanged() {
        let mut world = WorldState::new();
        world.upsert("tank-1", tank(1.0, 2.0));
        world.upsert("tank-2", tank(3.0, 4.0));

        world.apply(snapshot(vec![], &["bullet-99"]));

        assert_eq!(world.len(), 2);
        assert_eq!(world.position_of("tank-1"), Some(Point::new(1.0, 2.0)));
        assert_eq!(world.position_of("tank-2"), Some(Point::new(3.0, 4.0)));
        assert!(world.remove("bullet-99").is_none());
    }

    #[test]
    fn deletes_apply_before_updates() {
        let mut world = WorldState::new();
        world.upsert("bullet-1", GameObject::at(ObjectType::Bullet, Point::new(0.0, 0.0)));

        // Same id deleted and re-reported within one snapshot ends up present
        world.apply(snapshot(
            vec![("bullet-1", GameObject::at(ObjectType::Bullet, Point::new(5.0, 5.0)))],
            &["bullet-1"],
        ));
        assert_eq!(world.position_of("bullet-1"), Some(Point::new(5.0, 5.0)));

        world.apply(snapshot(vec![], &["bullet-1"]));
        assert!(!world.contains("bullet-1"));
        assert!(world.is_empty());
    }

    #[test]
    fn updates_overwrite_existing_objects() {
        let mut world = WorldState::new();
        world.upsert("tank-1", tank(1.0, 1.0));
        world.apply(snapshot(vec![("tank-1", tank(9.0, 9.0))], &[]));
        assert_eq!(world.position_of("tank-1"), Some(Point::new(9.0, 9.0)));
    }

    #[test]
    fn filters_by_type_and_keeps_unknown_objects() {
        let mut world = WorldState::new();
        world.upsert("tank-1", tank(1.0, 1.0));
        world.upsert("pu-1", GameObject::at(ObjectType::Powerup, Point::new(2.0, 2.0)));
        world.upsert("mystery", GameObject::at(ObjectType::Unknown(99), Point::new(3.0, 3.0)));

        let powerups: Vec<_> = world.of_type(ObjectType::Powerup).map(|(id, _)| id).collect();
        assert_eq!(powerups, vec!["pu-1"]);
        assert!(world.contains("mystery"));
    }

    fn boundary(kind: ObjectType, max_x: f64, max_y: f64) -> GameObject {
        GameObject {
            kind,
            position: Coords::Corners(vec![
                Point::new(0.0, max_y),
                Point::new(0.0, 0.0),
                Point::new(max_x, 0.0),
                Point::new(max_x, max_y),
            ]),
            velocity: None,
        }
    }

    #[test]
    fn map_size_uses_biggest_boundary_corner() {
        let mut world = WorldState::new();
        assert_eq!(world.map_size(), None);

        world.upsert("tank-1", tank(5000.0, 5000.0));
        world.upsert("boundary-1", boundary(ObjectType::Boundary, 1800.0, 1000.0));

        let size = world.map_size().unwrap();
        assert_eq!(size, MapSize { width: 1800.0, height: 1000.0 });
        assert_eq!(size.center(), Point::new(900.0, 500.0));
    }

    #[test]
    fn map_size_ignores_closing_boundaries() {
        let mut world = WorldState::new();
        world.upsert("closing_boundary-1", boundary(ObjectType::ClosingBoundary, 600.0, 400.0));
        assert_eq!(world.map_size(), None);
        assert_eq!(world.closing_extent(), Some(MapSize { width: 600.0, height: 400.0 }));

        world.upsert("boundary-1", boundary(ObjectType::Boundary, 1800.0, 1000.0));
        assert_eq!(world.map_size(), Some(MapSize { width: 1800.0, height: 1000.0 }));
    }
}
