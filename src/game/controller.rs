//! Per-turn decision making for our tank

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::boundary::{closing_boundaries, first_breach};
use super::engagement::{
    engagement_angle, is_stuck, retreat_heading, should_retreat, walls_in_line_of_fire,
};
use super::geometry::Point;
use super::opportunity::reachable_powerup;
use super::selection::{Candidate, CandidateKind, CandidateQueue};
use super::threat::{assess_threats, dodge_heading};
use super::world::{MapSize, WorldState};
use crate::comms::protocol::{Action, Identity, TurnSnapshot};
use crate::config::{Config, Tuning};

/// Everything considered for one turn, before selection
#[derive(Debug)]
pub struct TurnPlan {
    pub candidates: CandidateQueue,
    /// Heading to the opponent, when the opponent is known
    pub engagement_angle: Option<f64>,
    pub walls_in_line: usize,
}

impl TurnPlan {
    /// Pop the most urgent candidate and aim it at the opponent
    pub fn select(mut self) -> Decision {
        let considered = self.candidates.len();
        let chosen = self.candidates.pop();
        let kind = chosen.as_ref().map(|c| c.kind);
        let action = chosen
            .map(|c| c.action)
            .unwrap_or_default()
            .with_shoot(self.engagement_angle);

        Decision {
            action,
            chosen: kind,
            considered,
            walls_in_line: self.walls_in_line,
        }
    }
}

/// The action emitted for a turn and what produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub chosen: Option<CandidateKind>,
    /// Candidates queued before selection
    pub considered: usize,
    pub walls_in_line: usize,
}

/// Owns the world model and decides one action per turn
pub struct TurnController<G = ChaCha8Rng> {
    tank_id: String,
    enemy_id: String,
    world: WorldState,
    map: Option<MapSize>,
    /// Set once the map size comes from the static boundary
    map_settled: bool,
    tuning: Tuning,
    last_position: Option<Point>,
    rng: G,
}

impl TurnController<ChaCha8Rng> {
    /// Controller seeded from config, or from entropy without a seed
    pub fn from_config(identity: Identity, world: WorldState, config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(identity, world, config.tuning, rng)
    }
}

impl<G: Rng> TurnController<G> {
    pub fn new(identity: Identity, world: WorldState, tuning: Tuning, rng: G) -> Self {
        let static_size = world.map_size();
        let map_settled = static_size.is_some();
        let map = static_size.or_else(|| {
            let size = world.closing_extent();
            match size {
                Some(_) => warn!("No static boundary after setup, sizing map from closing one"),
                None => warn!("No boundary objects after setup, recentering on the origin"),
            }
            size
        });
        if let Some(size) = map {
            debug!(width = size.width, height = size.height, "Map size known");
        }

        Self {
            tank_id: identity.tank_id,
            enemy_id: identity.enemy_id,
            world,
            map,
            map_settled,
            tuning,
            last_position: None,
            rng,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Fold a snapshot into the world model. Only a static boundary can
    /// settle the map size after setup.
    pub fn apply(&mut self, snapshot: TurnSnapshot) {
        self.world.apply(snapshot);
        if !self.map_settled {
            if let Some(size) = self.world.map_size() {
                debug!(width = size.width, height = size.height, "Map size known");
                self.map = Some(size);
                self.map_settled = true;
            }
        }
    }

    /// Recentering target
    pub fn map_center(&self) -> Point {
        self.map.map(|m| m.center()).unwrap_or(Point::ORIGIN)
    }

    /// Build this turn's candidates and remember where the tank is.
    /// `None` when our own tank is not on the map.
    pub fn plan(&mut self) -> Option<TurnPlan> {
        let Some(tank) = self.world.position_of(&self.tank_id) else {
            warn!(tank_id = %self.tank_id, "Own tank missing from world state");
            return None;
        };
        let opponent = self.world.position_of(&self.enemy_id);
        if opponent.is_none() {
            warn!(enemy_id = %self.enemy_id, "Opponent missing from world state");
        }

        let center = self.map_center();
        let mut candidates = CandidateQueue::new();

        let boundaries = closing_boundaries(&self.world);
        if let Some(edge) = first_breach(&boundaries, tank, self.tuning.boundary_margin) {
            debug!(corner_velocities = ?edge.velocities, "Too close to the closing boundary");
            candidates.push(Candidate::new(
                CandidateKind::BoundaryAvoidance,
                Action::path_to(center),
            ));
        }

        let threats = assess_threats(&self.world, tank, self.tuning.bullet_window);
        if let Some(heading) = dodge_heading(&threats, &mut self.rng) {
            debug!(threats = threats.len(), heading, "Dodging bullets");
            candidates.push(Candidate::new(CandidateKind::Dodge, Action::moving(heading)));
        }

        if let Some(powerup) = reachable_powerup(&self.world, tank, boundaries.first()) {
            debug!(powerup_id = %powerup.id, distance = powerup.distance, "Powerup in reach");
            candidates.push(Candidate::new(
                CandidateKind::Powerup,
                Action::path_to(powerup.position),
            ));
        }

        if is_stuck(self.last_position, tank, self.tuning.stuck_distance) {
            candidates.push(Candidate::new(CandidateKind::Unstick, Action::path_to(center)));
        }
        self.last_position = Some(tank);

        let angle = opponent.map(|enemy| engagement_angle(tank, enemy));
        if let (Some(enemy), Some(angle)) = (opponent, angle) {
            if should_retreat(tank, enemy, self.tuning.retreat_distance) {
                candidates.push(Candidate::new(
                    CandidateKind::Retreat,
                    Action::moving(retreat_heading(angle)),
                ));
            }
        }

        candidates.push(Candidate::new(CandidateKind::Recenter, Action::path_to(center)));

        let walls_in_line = opponent
            .map(|enemy| walls_in_line_of_fire(&self.world, tank, enemy))
            .unwrap_or(0);

        Some(TurnPlan {
            candidates,
            engagement_angle: angle,
            walls_in_line,
        })
    }

    /// Decide this turn's action. Without our tank nothing changes.
    pub fn respond(&mut self) -> Decision {
        match self.plan() {
            Some(plan) => plan.select(),
            None => Decision {
                action: Action::idle(),
                chosen: None,
                considered: 0,
                walls_in_line: 0,
            },
        }
    }
}
