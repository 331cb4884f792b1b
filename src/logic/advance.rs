//! Recording match results and moving winners into the next round.

use crate::models::{MatchId, PlayerId, Slot, Tournament, TournamentError, TournamentStatus};
use serde::Serialize;

/// Where the winner of a recorded match ended up.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Advancement {
    /// Winner placed into `slot` of the match at (round, position).
    Advanced { round: u32, position: u32, slot: Slot },
    /// The final was recorded; this player won the tournament.
    Champion { player_id: PlayerId },
}

fn to_score(score: i64) -> Result<u32, TournamentError> {
    u32::try_from(score).map_err(|_| TournamentError::InvalidScore(score))
}

/// Record the result of one match and advance its winner by one round.
///
/// Checked in order, each a distinct error: match exists, scores are
/// non-negative, winner occupies one of two filled slots, winner's score is
/// strictly higher, match not yet completed. A repeated submission is always
/// rejected, even when it matches the stored result.
///
/// Everything is validated before the first write, so on error the tournament
/// is left exactly as it was.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_id: PlayerId,
    score1: i64,
    score2: i64,
) -> Result<Advancement, TournamentError> {
    let idx = tournament
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let score1 = to_score(score1)?;
    let score2 = to_score(score2)?;

    let m = &tournament.matches[idx];
    if m.player1.is_none() || m.player2.is_none() {
        return Err(TournamentError::InvalidWinner(winner_id));
    }
    let (winner_score, opponent_score) = match m.slot_of(winner_id) {
        Some(Slot::One) => (score1, score2),
        Some(Slot::Two) => (score2, score1),
        None => return Err(TournamentError::InvalidWinner(winner_id)),
    };
    if winner_score <= opponent_score {
        return Err(TournamentError::ScoreWinnerMismatch {
            winner_score,
            opponent_score,
        });
    }
    if m.is_completed {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }

    let (round, position) = (m.round, m.position);
    let next = if round < tournament.total_rounds {
        let next_round = round + 1;
        let next_position = m.parent_position();
        let slot = Slot::for_feeder_position(position);
        let parent_idx = tournament
            .match_index_at(next_round, next_position)
            .ok_or_else(|| {
                TournamentError::BracketCorrupted(format!(
                    "no match at round {}, match {}",
                    next_round, next_position
                ))
            })?;
        match tournament.matches[parent_idx].slot(slot) {
            Some(existing) if existing != winner_id => {
                log::warn!(
                    "Refusing to overwrite round {} match {} {:?} slot ({} -> {})",
                    next_round,
                    next_position,
                    slot,
                    existing,
                    winner_id
                );
                return Err(TournamentError::SlotOccupied {
                    round: next_round,
                    position: next_position,
                });
            }
            _ => {}
        }
        Some((parent_idx, next_round, next_position, slot))
    } else {
        None
    };

    let m = &mut tournament.matches[idx];
    m.winner = Some(winner_id);
    m.score1 = Some(score1);
    m.score2 = Some(score2);
    m.is_completed = true;

    match next {
        Some((parent_idx, next_round, next_position, slot)) => {
            *tournament.matches[parent_idx].slot_mut(slot) = Some(winner_id);
            log::debug!(
                "Advanced winner {} from round {} match {} to round {} match {} ({:?})",
                winner_id,
                round,
                position,
                next_round,
                next_position,
                slot
            );
            Ok(Advancement::Advanced {
                round: next_round,
                position: next_position,
                slot,
            })
        }
        None => {
            tournament.status = TournamentStatus::Completed;
            log::info!("Tournament '{}' won by {}", tournament.name, winner_id);
            Ok(Advancement::Champion {
                player_id: winner_id,
            })
        }
    }
}
