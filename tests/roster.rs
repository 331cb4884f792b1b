//! Integration tests for roster intake and tournament creation.

use bracket_tournament_web::{
    create_tournament, parse_roster_csv, players_from_entries, shuffle_entries, PlayerEntry,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn csv_roster_reads_names_and_optional_handicaps() {
    let csv = "name,handicap\nAnna, 2\nBert,\n Carl ,-1\nDora,0\n";
    let entries = parse_roster_csv(csv.as_bytes()).unwrap();
    assert_eq!(
        entries,
        vec![
            PlayerEntry::new("Anna", Some(2)),
            PlayerEntry::new("Bert", None),
            PlayerEntry::new("Carl", Some(-1)),
            PlayerEntry::new("Dora", Some(0)),
        ]
    );
}

#[test]
fn csv_roster_without_handicap_column() {
    let entries = parse_roster_csv("name\nAnna\nBert\n".as_bytes()).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.handicap.is_none()));
}

#[test]
fn csv_roster_with_bad_handicap_is_rejected() {
    let err = parse_roster_csv("name,handicap\nAnna,lots\n".as_bytes()).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidRoster(msg) if msg.contains("line 2")));
}

#[test]
fn players_are_seeded_in_roster_order() {
    let players = players_from_entries(vec![
        PlayerEntry::new(" Anna ", Some(1)),
        PlayerEntry::new("Bert", None),
    ])
    .unwrap();
    assert_eq!(players[0].name, "Anna");
    assert_eq!(players[0].seed, 1);
    assert_eq!(players[0].handicap, Some(1));
    assert_eq!(players[1].seed, 2);
    assert_ne!(players[0].id, players[1].id);
}

#[test]
fn empty_and_duplicate_names_are_rejected() {
    assert_eq!(
        players_from_entries(vec![PlayerEntry::new("  ", None)]),
        Err(TournamentError::EmptyPlayerName)
    );
    assert_eq!(
        players_from_entries(vec![PlayerEntry::new("Anna", None), PlayerEntry::new("ANNA", None)]),
        Err(TournamentError::DuplicatePlayerName("ANNA".to_string()))
    );
}

#[test]
fn create_tournament_builds_from_entries() {
    let entries: Vec<_> = ["A", "B", "C", "D"].iter().map(|n| PlayerEntry::new(*n, None)).collect();
    let t = create_tournament("  Cup ", entries).unwrap();
    assert_eq!(t.name, "Cup");
    assert_eq!(t.total_rounds, 2);
    let first = t.match_at(1, 1).unwrap();
    assert_eq!(first.player1, Some(t.players[0].id));
    assert_eq!(first.player2, Some(t.players[1].id));
}

#[test]
fn create_tournament_rejects_bad_input() {
    let three: Vec<_> = ["A", "B", "C"].iter().map(|n| PlayerEntry::new(*n, None)).collect();
    assert!(matches!(
        create_tournament("Cup", three),
        Err(TournamentError::InvalidSize(3))
    ));
    assert!(matches!(
        create_tournament("", vec![PlayerEntry::new("A", None), PlayerEntry::new("B", None)]),
        Err(TournamentError::EmptyTournamentName)
    ));
}

#[test]
fn shuffle_keeps_every_entry() {
    let mut entries: Vec<_> = (0..16).map(|i| PlayerEntry::new(format!("P{i}"), None)).collect();
    let original = entries.clone();
    shuffle_entries(&mut entries, &mut StdRng::seed_from_u64(7));
    let mut sorted = entries.clone();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let mut expected = original;
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(sorted, expected);
}
