//! Bracket match and the two player slots it holds.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two player slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    /// Slot a winner lands in when advancing from the match at `position`:
    /// odd positions feed player1, even positions feed player2.
    pub fn for_feeder_position(position: u32) -> Self {
        if position % 2 == 1 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

/// A single match of the bracket, identified by (round, position).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based; round 1 is the first round.
    pub round: u32,
    /// 1-based index within the round. Persisted as `match_number`.
    pub position: u32,
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
    /// None if not yet played.
    pub winner: Option<PlayerId>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub is_completed: bool,
}

impl BracketMatch {
    /// An empty, pending match at the given place in the bracket.
    pub fn new(round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            player1: None,
            player2: None,
            winner: None,
            score1: None,
            score2: None,
            is_completed: false,
        }
    }

    pub fn with_players(round: u32, position: u32, player1: PlayerId, player2: PlayerId) -> Self {
        Self {
            player1: Some(player1),
            player2: Some(player2),
            ..Self::new(round, position)
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<PlayerId> {
        match slot {
            Slot::One => self.player1,
            Slot::Two => self.player2,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<PlayerId> {
        match slot {
            Slot::One => &mut self.player1,
            Slot::Two => &mut self.player2,
        }
    }

    /// Which slot `player` occupies, if any.
    pub fn slot_of(&self, player: PlayerId) -> Option<Slot> {
        if self.player1 == Some(player) {
            Some(Slot::One)
        } else if self.player2 == Some(player) {
            Some(Slot::Two)
        } else {
            None
        }
    }

    /// Position of the parent match in the next round (ceil(position / 2)).
    pub fn parent_position(&self) -> u32 {
        self.position.div_ceil(2)
    }

    /// True when the completion flag agrees with winner and scores.
    pub fn is_consistent(&self) -> bool {
        let decided = match (self.winner, self.score1, self.score2) {
            (Some(w), Some(s1), Some(s2)) => match self.slot_of(w) {
                Some(Slot::One) => s1 > s2,
                Some(Slot::Two) => s2 > s1,
                None => false,
            },
            _ => false,
        };
        if self.is_completed {
            decided
        } else {
            self.winner.is_none() && self.score1.is_none() && self.score2.is_none()
        }
    }
}
