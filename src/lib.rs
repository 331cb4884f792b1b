//! Single-elimination bracket organizer: library with models, bracket logic and store.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    build_bracket, create_tournament, parse_roster_csv, players_from_entries, record_result,
    shuffle_entries, start_tournament, Advancement, PlayerEntry,
};
pub use models::{
    round_name, BracketMatch, BracketView, MatchId, MatchRecord, MatchView, Player, PlayerId,
    PlayerRecord, RoundView, Slot, Tournament, TournamentError, TournamentId, TournamentRecord,
    TournamentRecords, TournamentStatus, TournamentSummary,
};
pub use store::{ResultSubmission, StoreError, TournamentStore};
