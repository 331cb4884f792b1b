//! Status transitions: open a drafted bracket for results.

use crate::models::{Tournament, TournamentError, TournamentStatus};

/// Start the tournament: Draft -> Ongoing. Results are accepted only while Ongoing.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Draft {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::Ongoing;
    log::info!("Tournament '{}' started", tournament.name);
    Ok(())
}
