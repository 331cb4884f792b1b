//! Bracket construction: every round is materialized up front.

use crate::models::{BracketMatch, Player, Tournament, TournamentError, TournamentStatus};
use chrono::Utc;
use uuid::Uuid;

/// Build the full single-elimination bracket for `players`.
///
/// 1. Player count must be a power of two and at least 2.
/// 2. Round r holds N / 2^r matches, positions 1.. in order.
/// 3. Round 1 pairs players in input order: position p gets players 2(p-1) and 2(p-1)+1.
/// 4. Later rounds start empty and are filled as results come in.
///
/// Players are never reordered here; shuffle before calling if a random draw is wanted.
pub fn build_bracket(
    name: impl Into<String>,
    players: Vec<Player>,
) -> Result<Tournament, TournamentError> {
    let n = players.len();
    if n < 2 || !n.is_power_of_two() {
        return Err(TournamentError::InvalidSize(n));
    }
    let total_rounds = n.trailing_zeros();

    let mut matches = Vec::with_capacity(n - 1);
    matches.extend(
        players
            .chunks_exact(2)
            .zip(1..)
            .map(|(pair, position)| BracketMatch::with_players(1, position, pair[0].id, pair[1].id)),
    );
    for round in 2..=total_rounds {
        let in_round = (n >> round) as u32;
        matches.extend((1..=in_round).map(|position| BracketMatch::new(round, position)));
    }

    let name = name.into();
    log::info!(
        "Built bracket '{}' with {} players, {} rounds, {} matches",
        name,
        n,
        total_rounds,
        matches.len()
    );

    Ok(Tournament {
        id: Uuid::new_v4(),
        name,
        status: TournamentStatus::Draft,
        owner_id: None,
        created_at: Utc::now(),
        total_players: n,
        total_rounds,
        players,
        matches,
    })
}
