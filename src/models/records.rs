//! Flat records exchanged with the storage collaborator.
//!
//! Every record rejects unknown fields on decode. `Tournament::from_records`
//! re-checks the bracket invariants, so a row set that was edited by hand or
//! written by a buggy store never turns into an in-memory tournament.

use crate::models::game::{BracketMatch, MatchId, Slot};
use crate::models::player::{Player, PlayerId};
use crate::models::tournament::{Tournament, TournamentError, TournamentId, TournamentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TournamentRecord {
    pub id: TournamentId,
    pub name: String,
    pub total_players: usize,
    pub status: TournamentStatus,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub tournament_id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub handicap: Option<i32>,
    pub seed_number: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchRecord {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: u32,
    pub match_number: u32,
    #[serde(default)]
    pub player1_id: Option<PlayerId>,
    #[serde(default)]
    pub player2_id: Option<PlayerId>,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    #[serde(default)]
    pub score_player1: Option<u32>,
    #[serde(default)]
    pub score_player2: Option<u32>,
    pub is_completed: bool,
}

/// One tournament with all of its rows.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TournamentRecords {
    pub tournament: TournamentRecord,
    pub players: Vec<PlayerRecord>,
    pub matches: Vec<MatchRecord>,
}

fn invalid(msg: impl Into<String>) -> TournamentError {
    TournamentError::InvalidRecord(msg.into())
}

impl Tournament {
    /// Flatten into storage rows. Match position becomes `match_number`.
    pub fn to_records(&self) -> TournamentRecords {
        TournamentRecords {
            tournament: TournamentRecord {
                id: self.id,
                name: self.name.clone(),
                total_players: self.total_players,
                status: self.status,
                owner_id: self.owner_id.clone(),
                created_at: self.created_at,
            },
            players: self
                .players
                .iter()
                .map(|p| PlayerRecord {
                    id: p.id,
                    tournament_id: self.id,
                    name: p.name.clone(),
                    handicap: p.handicap,
                    seed_number: p.seed,
                })
                .collect(),
            matches: self
                .matches
                .iter()
                .map(|m| MatchRecord {
                    id: m.id,
                    tournament_id: self.id,
                    round: m.round,
                    match_number: m.position,
                    player1_id: m.player1,
                    player2_id: m.player2,
                    winner_id: m.winner,
                    score_player1: m.score1,
                    score_player2: m.score2,
                    is_completed: m.is_completed,
                })
                .collect(),
        }
    }

    /// Rebuild a tournament from storage rows, checking every bracket invariant.
    pub fn from_records(records: TournamentRecords) -> Result<Self, TournamentError> {
        let TournamentRecords {
            tournament,
            players,
            matches,
        } = records;

        let n = tournament.total_players;
        if n < 2 || !n.is_power_of_two() {
            return Err(invalid(format!("total_players {} is not a power of two >= 2", n)));
        }
        if players.len() != n {
            return Err(invalid(format!("expected {} players, found {}", n, players.len())));
        }
        let total_rounds = n.trailing_zeros();

        let mut players: Vec<Player> = players
            .into_iter()
            .map(|p| {
                if p.tournament_id != tournament.id {
                    return Err(invalid(format!("player {} belongs to another tournament", p.id)));
                }
                Ok(Player {
                    id: p.id,
                    name: p.name,
                    seed: p.seed_number,
                    handicap: p.handicap,
                })
            })
            .collect::<Result<_, _>>()?;
        players.sort_by_key(|p| p.seed);
        let player_ids: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
        if player_ids.len() != n {
            return Err(invalid("duplicate player id"));
        }
        if players.iter().zip(1..).any(|(p, seed)| p.seed != seed) {
            return Err(invalid("seed numbers must be 1..total_players"));
        }

        if matches.len() != n - 1 {
            return Err(invalid(format!("expected {} matches, found {}", n - 1, matches.len())));
        }
        let mut seen = HashSet::new();
        let mut matches: Vec<BracketMatch> = matches
            .into_iter()
            .map(|m| {
                if m.tournament_id != tournament.id {
                    return Err(invalid(format!("match {} belongs to another tournament", m.id)));
                }
                if m.round == 0 || m.round > total_rounds {
                    return Err(invalid(format!("match {} has round {}", m.id, m.round)));
                }
                let in_round = (n >> m.round) as u32;
                if m.match_number == 0 || m.match_number > in_round {
                    return Err(invalid(format!(
                        "match {} has match_number {} (round {} has {})",
                        m.id, m.match_number, m.round, in_round
                    )));
                }
                if !seen.insert((m.round, m.match_number)) {
                    return Err(invalid(format!(
                        "duplicate match at round {}, match_number {}",
                        m.round, m.match_number
                    )));
                }
                for id in [m.player1_id, m.player2_id, m.winner_id].into_iter().flatten() {
                    if !player_ids.contains(&id) {
                        return Err(invalid(format!("match {} references unknown player {}", m.id, id)));
                    }
                }
                let bracket_match = BracketMatch {
                    id: m.id,
                    round: m.round,
                    position: m.match_number,
                    player1: m.player1_id,
                    player2: m.player2_id,
                    winner: m.winner_id,
                    score1: m.score_player1,
                    score2: m.score_player2,
                    is_completed: m.is_completed,
                };
                if !bracket_match.is_consistent() {
                    return Err(invalid(format!(
                        "match {} completion flag disagrees with winner and scores",
                        m.id
                    )));
                }
                Ok(bracket_match)
            })
            .collect::<Result<_, _>>()?;
        matches.sort_by_key(|m| (m.round, m.position));

        let by_place: HashMap<(u32, u32), &BracketMatch> =
            matches.iter().map(|m| ((m.round, m.position), m)).collect();
        for m in matches.iter().filter(|m| m.is_completed && m.round < total_rounds) {
            let advanced = by_place
                .get(&(m.round + 1, m.parent_position()))
                .and_then(|parent| parent.slot(Slot::for_feeder_position(m.position)));
            if advanced != m.winner {
                return Err(invalid(format!(
                    "winner of round {} match {} was not advanced",
                    m.round, m.position
                )));
            }
        }

        // Round 1 seats every player exactly once.
        let mut seated = HashSet::new();
        for m in matches.iter().filter(|m| m.round == 1) {
            for slot in [Slot::One, Slot::Two] {
                let player = m.slot(slot).ok_or_else(|| {
                    invalid(format!("round 1 match {} has an empty slot", m.position))
                })?;
                if !seated.insert(player) {
                    return Err(invalid(format!("player {} is seated twice in round 1", player)));
                }
            }
        }

        // Later slots only hold the winner of the match feeding them.
        for m in matches.iter().filter(|m| m.round > 1) {
            for (slot, feeder_position) in [(Slot::One, 2 * m.position - 1), (Slot::Two, 2 * m.position)] {
                let Some(player) = m.slot(slot) else {
                    continue;
                };
                let fed = by_place
                    .get(&(m.round - 1, feeder_position))
                    .filter(|feeder| feeder.is_completed)
                    .and_then(|feeder| feeder.winner);
                if fed != Some(player) {
                    return Err(invalid(format!(
                        "round {} match {} holds {} without a completed feeder match",
                        m.round, m.position, player
                    )));
                }
            }
        }

        Ok(Tournament {
            id: tournament.id,
            name: tournament.name,
            status: tournament.status,
            owner_id: tournament.owner_id,
            created_at: tournament.created_at,
            total_players: n,
            total_rounds,
            players,
            matches,
        })
    }
}
