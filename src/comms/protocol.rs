//! Game channel message definitions
//! These are the wire types exchanged with the game server, one JSON
//! document per line.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::game::geometry::Point;
use crate::game::object::GameObject;

/// Bare-string control signals sent in place of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// All setup snapshots have been sent
    #[serde(rename = "END_INIT")]
    EndInit,
    /// The game is over
    #[serde(rename = "END")]
    End,
}

/// Any line read from the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InboundMsg {
    Signal(Signal),
    /// Payload shape depends on the session phase
    Message { message: serde_json::Value },
}

/// First message of a game: who we are and who we fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "your-tank-id")]
    pub tank_id: String,
    #[serde(rename = "enemy-tank-id")]
    pub enemy_id: String,
}

/// Objects changed since the previous message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Entries that do not decode are dropped one by one
    #[serde(default, deserialize_with = "lenient_objects")]
    pub updated_objects: HashMap<String, GameObject>,
    /// Absent during setup
    #[serde(default)]
    pub deleted_objects: Vec<String>,
}

fn lenient_objects<'de, D>(deserializer: D) -> Result<HashMap<String, GameObject>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(id, value)| match serde_json::from_value(value) {
            Ok(object) => Some((id, object)),
            Err(e) => {
                warn!(object_id = %id, error = %e, "Dropping undecodable object");
                None
            }
        })
        .collect())
}

/// Response for one turn. Unset fields mean "no change".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Drive along a path to this point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Point>,
    /// Drive in this heading (degrees)
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub r#move: Option<f64>,
    /// Fire in this heading (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoot: Option<f64>,
}

impl Action {
    /// Leave every intent unchanged
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn path_to(target: Point) -> Self {
        Self {
            path: Some(target),
            ..Self::default()
        }
    }

    pub fn moving(heading: f64) -> Self {
        Self {
            r#move: Some(heading),
            ..Self::default()
        }
    }

    pub fn with_shoot(mut self, heading: Option<f64>) -> Self {
        self.shoot = heading;
        self
    }
}
