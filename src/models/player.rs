//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match slots and lookups).
pub type PlayerId = Uuid;

/// A player entered in a bracket. Never changes after the bracket is built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// 1-based position in the roster (assignment order, not a ranking).
    pub seed: u32,
    /// Optional handicap shown next to the name; the engine does not use it.
    pub handicap: Option<i32>,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>, seed: u32, handicap: Option<i32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed,
            handicap,
        }
    }
}
