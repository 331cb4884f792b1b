//! Bracket as shown to the UI: rounds grouped and named, player ids resolved.

use crate::models::game::{BracketMatch, MatchId};
use crate::models::player::Player;
use crate::models::tournament::{Tournament, TournamentId, TournamentStatus};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: u32,
    pub position: u32,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
    pub winner: Option<Player>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub is_completed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub round: u32,
    /// "Final", "Semi-Final", ... or "Round {n}".
    pub name: String,
    pub matches: Vec<MatchView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BracketView {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub total_players: usize,
    pub total_rounds: u32,
    pub rounds: Vec<RoundView>,
    /// None until the final is completed ("TBD").
    pub champion: Option<Player>,
}

impl BracketView {
    pub fn from_tournament(t: &Tournament) -> Self {
        let resolve = |id| t.player(id).cloned();
        let match_view = |m: &BracketMatch| MatchView {
            id: m.id,
            round: m.round,
            position: m.position,
            player1: m.player1.and_then(resolve),
            player2: m.player2.and_then(resolve),
            winner: m.winner.and_then(resolve),
            score1: m.score1,
            score2: m.score2,
            is_completed: m.is_completed,
        };
        let rounds = (1..=t.total_rounds)
            .map(|round| RoundView {
                round,
                name: t.round_name(round),
                matches: t.round_matches(round).into_iter().map(match_view).collect(),
            })
            .collect();
        Self {
            id: t.id,
            name: t.name.clone(),
            status: t.status,
            total_players: t.total_players,
            total_rounds: t.total_rounds,
            rounds,
            champion: t.champion().cloned(),
        }
    }
}
