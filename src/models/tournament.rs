//! Tournament, TournamentStatus and the engine error type.

use crate::models::game::{BracketMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Player count is below 2 or not a power of two.
    InvalidSize(usize),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// A score is negative or out of range.
    InvalidScore(i64),
    /// Winner is not one of the two occupants, or a slot is still empty.
    InvalidWinner(PlayerId),
    /// Declared winner's score is not strictly higher than the opponent's.
    ScoreWinnerMismatch { winner_score: u32, opponent_score: u32 },
    /// Result already recorded for this match.
    MatchAlreadyCompleted(MatchId),
    /// The next-round slot already holds a different player.
    SlotOccupied { round: u32, position: u32 },
    /// Parent match missing or bracket shape broken.
    BracketCorrupted(String),
    /// Tournament is not in a status that allows this action.
    InvalidState,
    /// Tournament name is empty after trimming.
    EmptyTournamentName,
    /// Player name is empty after trimming.
    EmptyPlayerName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    /// Roster import could not be read.
    InvalidRoster(String),
    /// Persisted records do not describe a valid bracket.
    InvalidRecord(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidSize(n) => {
                write!(f, "Player count must be a power of two and at least 2 (got {})", n)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidScore(s) => write!(f, "Invalid score {}", s),
            TournamentError::InvalidWinner(_) => {
                write!(f, "Winner must be one of the two players of a fully set match")
            }
            TournamentError::ScoreWinnerMismatch {
                winner_score,
                opponent_score,
            } => write!(
                f,
                "Winner's score ({}) must be higher than the opponent's ({})",
                winner_score, opponent_score
            ),
            TournamentError::MatchAlreadyCompleted(_) => write!(f, "Match is already completed"),
            TournamentError::SlotOccupied { round, position } => write!(
                f,
                "Next match (round {}, match {}) already has a different player in that slot",
                round, position
            ),
            TournamentError::BracketCorrupted(msg) => write!(f, "Bracket is corrupted: {}", msg),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EmptyTournamentName => write!(f, "Tournament name must not be empty"),
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named {} already exists", name)
            }
            TournamentError::InvalidRoster(msg) => write!(f, "Invalid roster: {}", msg),
            TournamentError::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Bracket built; results not accepted yet.
    #[default]
    Draft,
    /// Results are being recorded.
    Ongoing,
    /// Final played; champion known.
    Completed,
}

/// Full tournament state: players, every match of every round, and status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    /// Only this owner may start the tournament or submit results (when set).
    /// Never serialized: holding it is what proves ownership.
    #[serde(default, skip_serializing)]
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_players: usize,
    pub total_rounds: u32,
    /// Players in seed order.
    pub players: Vec<Player>,
    /// All matches, ordered by round then position.
    pub matches: Vec<BracketMatch>,
}

/// One line of a tournament listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub total_players: usize,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            id: self.id,
            name: self.name.clone(),
            total_players: self.total_players,
            status: self.status,
            created_at: self.created_at,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_at(&self, round: u32, position: u32) -> Option<&BracketMatch> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.position == position)
    }

    pub(crate) fn match_index_at(&self, round: u32, position: u32) -> Option<usize> {
        self.matches
            .iter()
            .position(|m| m.round == round && m.position == position)
    }

    /// Matches of one round, ordered by position.
    pub fn round_matches(&self, round: u32) -> Vec<&BracketMatch> {
        let mut matches: Vec<_> = self.matches.iter().filter(|m| m.round == round).collect();
        matches.sort_by_key(|m| m.position);
        matches
    }

    /// The single match of the last round.
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.match_at(self.total_rounds, 1)
    }

    /// Winner of the final once it is completed; None means "TBD".
    pub fn champion(&self) -> Option<&Player> {
        self.final_match()
            .filter(|m| m.is_completed)
            .and_then(|m| m.winner)
            .and_then(|id| self.player(id))
    }

    pub fn round_name(&self, round: u32) -> String {
        round_name(round, self.total_rounds)
    }
}

/// Display name of a round, counted back from the final.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match total_rounds.checked_sub(round) {
        Some(0) => "Final".to_string(),
        Some(1) => "Semi-Final".to_string(),
        Some(2) => "Quarter-Final".to_string(),
        Some(3) => "Round of 16".to_string(),
        Some(4) => "Round of 32".to_string(),
        Some(5) => "Round of 64".to_string(),
        _ => format!("Round {}", round),
    }
}
