//! Roster intake: names and handicaps in, seeded players out.

use crate::logic::builder::build_bracket;
use crate::models::{Player, Tournament, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// One line of a roster before it becomes a player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    #[serde(default)]
    pub handicap: Option<i32>,
}

impl PlayerEntry {
    pub fn new(name: impl Into<String>, handicap: Option<i32>) -> Self {
        Self {
            name: name.into(),
            handicap,
        }
    }
}

/// Read a roster from CSV with a `name` column and an optional `handicap` column.
/// An empty handicap cell means no handicap.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<PlayerEntry>, TournamentError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut entries = Vec::new();
    for (line, row) in rdr.deserialize::<PlayerEntry>().enumerate() {
        // +2: header is line 1
        let entry =
            row.map_err(|e| TournamentError::InvalidRoster(format!("line {}: {}", line + 2, e)))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Shuffle the roster in place. Call before building for a random draw.
pub fn shuffle_entries<R: Rng + ?Sized>(entries: &mut [PlayerEntry], rng: &mut R) {
    entries.shuffle(rng);
}

/// Turn roster entries into players, seeding 1..N in the given order.
/// Names are trimmed and must be non-empty and unique (case-insensitive).
pub fn players_from_entries(entries: Vec<PlayerEntry>) -> Result<Vec<Player>, TournamentError> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .zip(1..)
        .map(|(entry, seed)| {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(TournamentError::EmptyPlayerName);
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(TournamentError::DuplicatePlayerName(name.to_string()));
            }
            Ok(Player::new(name, seed, entry.handicap))
        })
        .collect()
}

/// Seed players from `entries` and build their bracket.
pub fn create_tournament(
    name: impl Into<String>,
    entries: Vec<PlayerEntry>,
) -> Result<Tournament, TournamentError> {
    let name = name.into();
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyTournamentName);
    }
    let players = players_from_entries(entries)?;
    build_bracket(name, players)
}
