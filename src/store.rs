//! In-memory tournament store shared by request handlers.
//!
//! Every mutation runs under the write lock, so two submissions for the same
//! match (or for two sibling matches feeding the same parent) are applied one
//! after the other. The second submission for a match then sees it completed
//! and fails with `MatchAlreadyCompleted`.

use crate::logic::{record_result, start_tournament, Advancement};
use crate::models::{
    MatchId, PlayerId, Tournament, TournamentError, TournamentId, TournamentRecords,
    TournamentStatus, TournamentSummary,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Inbound result submission.
#[derive(Clone, Debug, Deserialize)]
pub struct ResultSubmission {
    pub match_id: MatchId,
    pub winner_id: PlayerId,
    pub score1: i64,
    pub score2: i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    NotFound(TournamentId),
    /// Caller is not the owner of the tournament.
    Forbidden,
    /// Lock poisoned by a panicking writer.
    Lock,
    Tournament(TournamentError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(_) => write!(f, "No tournament"),
            StoreError::Forbidden => write!(f, "Only the tournament owner may do this"),
            StoreError::Lock => write!(f, "lock error"),
            StoreError::Tournament(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TournamentError> for StoreError {
    fn from(e: TournamentError) -> Self {
        StoreError::Tournament(e)
    }
}

fn authorize(tournament: &Tournament, owner: Option<&str>) -> Result<(), StoreError> {
    match tournament.owner_id.as_deref() {
        Some(expected) if owner != Some(expected) => Err(StoreError::Forbidden),
        _ => Ok(()),
    }
}

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, TournamentEntry>>,
    inactivity_timeout: Duration,
}

impl TournamentStore {
    /// Tournaments untouched for `inactivity_timeout` are dropped by `cleanup_inactive`.
    pub fn new(inactivity_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            inactivity_timeout,
        }
    }

    /// Store whose timeout is given in hours. Huge values saturate instead of overflowing.
    pub fn with_ttl_hours(hours: u64) -> Self {
        Self::new(Duration::from_secs(hours.saturating_mul(60 * 60)))
    }

    pub fn inactivity_timeout(&self) -> Duration {
        self.inactivity_timeout
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let g = self.entries.read().map_err(|_| StoreError::Lock)?;
        Ok(g.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, StoreError> {
        let id = tournament.id;
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        g.insert(
            id,
            TournamentEntry {
                tournament,
                last_activity: Instant::now(),
            },
        );
        Ok(id)
    }

    /// Tournaments newest first. With `owner`, only that owner's tournaments;
    /// without, every tournament. Listing does not count as activity.
    pub fn list(&self, owner: Option<&str>) -> Result<Vec<TournamentSummary>, StoreError> {
        let g = self.entries.read().map_err(|_| StoreError::Lock)?;
        let mut summaries: Vec<_> = g
            .values()
            .map(|entry| &entry.tournament)
            .filter(|t| owner.is_none() || t.owner_id.as_deref() == owner)
            .map(Tournament::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    /// Run `f` on the tournament. Touching it refreshes last_activity.
    pub fn read<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&Tournament) -> T,
    ) -> Result<T, StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        let entry = g.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.last_activity = Instant::now();
        Ok(f(&entry.tournament))
    }

    pub fn get(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        self.read(id, Tournament::clone)
    }

    /// Storage rows of a tournament. Owner only, since the rows carry the owner id.
    pub fn records(
        &self,
        id: TournamentId,
        owner: Option<&str>,
    ) -> Result<TournamentRecords, StoreError> {
        self.update(id, owner, |t| Ok(t.to_records())).map(|(records, _)| records)
    }

    /// Apply an owner-only mutation under the write lock. Nothing is changed when `f` fails.
    fn update<T>(
        &self,
        id: TournamentId,
        owner: Option<&str>,
        f: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<(T, Tournament), StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        let entry = g.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.last_activity = Instant::now();
        authorize(&entry.tournament, owner)?;
        let out = f(&mut entry.tournament)?;
        Ok((out, entry.tournament.clone()))
    }

    pub fn start(&self, id: TournamentId, owner: Option<&str>) -> Result<Tournament, StoreError> {
        self.update(id, owner, start_tournament).map(|((), t)| t)
    }

    /// Record a result for an ongoing tournament on behalf of `owner`.
    pub fn submit_result(
        &self,
        id: TournamentId,
        owner: Option<&str>,
        submission: &ResultSubmission,
    ) -> Result<(Advancement, Tournament), StoreError> {
        self.update(id, owner, |t| {
            if t.status != TournamentStatus::Ongoing {
                return Err(TournamentError::InvalidState);
            }
            record_result(
                t,
                submission.match_id,
                submission.winner_id,
                submission.score1,
                submission.score2,
            )
        })
    }

    /// Remove tournaments inactive for longer than the timeout. Returns how many were removed.
    pub fn cleanup_inactive(&self) -> Result<usize, StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        let before = g.len();
        let timeout = self.inactivity_timeout;
        g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
        Ok(before - g.len())
    }
}
