//! Bracket business logic: construction, result recording, roster intake, lifecycle.

mod advance;
mod builder;
mod lifecycle;
mod roster;

pub use advance::{record_result, Advancement};
pub use builder::build_bracket;
pub use lifecycle::start_tournament;
pub use roster::{
    create_tournament, parse_roster_csv, players_from_entries, shuffle_entries, PlayerEntry,
};
