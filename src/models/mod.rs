//! Data structures for the bracket: players, matches, tournament, and the shapes
//! handed to storage and rendering collaborators.

mod game;
mod player;
mod records;
mod tournament;
mod view;

pub use game::{BracketMatch, MatchId, Slot};
pub use player::{Player, PlayerId};
pub use records::{MatchRecord, PlayerRecord, TournamentRecord, TournamentRecords};
pub use tournament::{
    round_name, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentSummary,
};
pub use view::{BracketView, MatchView, RoundView};
