//! Integration tests for the shared store: authorization, status, serialized submissions.

use bracket_tournament_web::{
    create_tournament, PlayerEntry, ResultSubmission, StoreError, Tournament, TournamentError,
    TournamentStatus, TournamentStore,
};
use std::sync::Arc;
use std::thread;
use chrono::{TimeZone, Utc};
use std::time::Duration;

fn tournament(n: usize, owner: Option<&str>) -> Tournament {
    let entries = (1..=n).map(|i| PlayerEntry::new(format!("P{i}"), None)).collect();
    let mut t = create_tournament("Cup", entries).unwrap();
    t.owner_id = owner.map(str::to_string);
    t
}

fn submission(t: &Tournament, round: u32, position: u32, slot_one_wins: bool) -> ResultSubmission {
    let m = t.match_at(round, position).unwrap();
    let (winner_id, score1, score2) = if slot_one_wins {
        (m.player1.unwrap(), 3, 1)
    } else {
        (m.player2.unwrap(), 1, 3)
    };
    ResultSubmission {
        match_id: m.id,
        winner_id,
        score1,
        score2,
    }
}

#[test]
fn results_require_an_ongoing_tournament() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let t = tournament(4, None);
    let sub = submission(&t, 1, 1, true);
    let id = store.insert(t).unwrap();

    assert_eq!(
        store.submit_result(id, None, &sub).unwrap_err(),
        StoreError::Tournament(TournamentError::InvalidState)
    );
    assert_eq!(store.start(id, None).unwrap().status, TournamentStatus::Ongoing);
    assert_eq!(
        store.start(id, None).unwrap_err(),
        StoreError::Tournament(TournamentError::InvalidState)
    );
    store.submit_result(id, None, &sub).unwrap();
}

#[test]
fn only_the_owner_may_act() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let t = tournament(4, Some("alice"));
    let sub = submission(&t, 1, 1, true);
    let id = store.insert(t).unwrap();

    assert_eq!(store.start(id, None).unwrap_err(), StoreError::Forbidden);
    assert_eq!(store.start(id, Some("bob")).unwrap_err(), StoreError::Forbidden);
    store.start(id, Some("alice")).unwrap();
    assert_eq!(store.submit_result(id, Some("bob"), &sub).unwrap_err(), StoreError::Forbidden);
    let (_, t) = store.submit_result(id, Some("alice"), &sub).unwrap();
    assert!(t.match_by_id(sub.match_id).unwrap().is_completed);
}

#[test]
fn unknown_tournament_is_not_found() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let id = uuid::Uuid::new_v4();
    assert_eq!(store.get(id).unwrap_err(), StoreError::NotFound(id));
}

#[test]
fn final_result_completes_and_locks_the_tournament() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let t = tournament(2, None);
    let sub = submission(&t, 1, 1, false);
    let id = store.insert(t).unwrap();
    store.start(id, None).unwrap();
    let (_, t) = store.submit_result(id, None, &sub).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.champion().map(|c| c.id), Some(sub.winner_id));
    assert_eq!(
        store.submit_result(id, None, &sub).unwrap_err(),
        StoreError::Tournament(TournamentError::InvalidState)
    );
}

#[test]
fn concurrent_submissions_for_one_match_succeed_once() {
    let store = Arc::new(TournamentStore::new(Duration::from_secs(3600)));
    let t = tournament(8, None);
    let sub = submission(&t, 1, 1, true);
    let id = store.insert(t).unwrap();
    store.start(id, None).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let sub = sub.clone();
            thread::spawn(move || store.submit_result(id, None, &sub).map(|_| ()))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert_eq!(
            r,
            &Err(StoreError::Tournament(TournamentError::MatchAlreadyCompleted(sub.match_id)))
        );
    }
}

#[test]
fn concurrent_siblings_fill_both_parent_slots() {
    let store = Arc::new(TournamentStore::new(Duration::from_secs(3600)));
    let t = tournament(8, None);
    let left = submission(&t, 1, 3, true);
    let right = submission(&t, 1, 4, false);
    let id = store.insert(t).unwrap();
    store.start(id, None).unwrap();

    let handles: Vec<_> = [left.clone(), right.clone()]
        .into_iter()
        .map(|sub| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.submit_result(id, None, &sub).map(|_| ()))
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    let t = store.get(id).unwrap();
    let parent = t.match_at(2, 2).unwrap();
    assert_eq!(parent.player1, Some(left.winner_id));
    assert_eq!(parent.player2, Some(right.winner_id));
}

#[test]
fn inactive_tournaments_are_cleaned_up() {
    let store = TournamentStore::new(Duration::ZERO);
    store.insert(tournament(4, None)).unwrap();
    store.insert(tournament(2, None)).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.cleanup_inactive().unwrap(), 2);
    assert!(store.is_empty().unwrap());

    let store = TournamentStore::new(Duration::from_secs(3600));
    store.insert(tournament(4, None)).unwrap();
    assert_eq!(store.cleanup_inactive().unwrap(), 0);
}

#[test]
fn serialized_tournament_does_not_reveal_the_owner() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let id = store.insert(tournament(4, Some("secret-owner"))).unwrap();
    let t = store.get(id).unwrap();
    assert_eq!(t.owner_id.as_deref(), Some("secret-owner"));
    let json = serde_json::to_string(&t).unwrap();
    assert!(!json.contains("secret-owner"));
    assert!(!json.contains("owner_id"));

    let decoded: Tournament = serde_json::from_str(&json).unwrap();
    assert!(decoded.owner_id.is_none());
}

#[test]
fn records_are_owner_only() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let id = store.insert(tournament(4, Some("alice"))).unwrap();
    assert_eq!(store.records(id, None).unwrap_err(), StoreError::Forbidden);
    assert_eq!(store.records(id, Some("bob")).unwrap_err(), StoreError::Forbidden);
    let records = store.records(id, Some("alice")).unwrap();
    assert_eq!(records.tournament.owner_id.as_deref(), Some("alice"));
    assert_eq!(records.matches.len(), 3);
}

#[test]
fn listing_is_newest_first_and_filters_by_owner() {
    let store = TournamentStore::new(Duration::from_secs(3600));
    let mut ids = Vec::new();
    for (day, owner) in [(1, Some("alice")), (3, Some("bob")), (2, Some("alice")), (4, None)] {
        let mut t = tournament(2, owner);
        t.name = format!("Day {day}");
        t.created_at = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        ids.push(store.insert(t).unwrap());
    }

    let all: Vec<String> = store.list(None).unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(all, ["Day 4", "Day 3", "Day 2", "Day 1"]);

    let alice = store.list(Some("alice")).unwrap();
    assert_eq!(alice.iter().map(|s| s.id).collect::<Vec<_>>(), vec![ids[2], ids[0]]);
    assert!(alice.iter().all(|s| s.total_players == 2 && s.status == TournamentStatus::Draft));

    assert!(store.list(Some("carol")).unwrap().is_empty());
}

#[test]
fn huge_ttl_saturates_instead_of_overflowing() {
    let store = TournamentStore::with_ttl_hours(u64::MAX);
    assert_eq!(store.inactivity_timeout(), Duration::from_secs(u64::MAX));
    assert_eq!(
        TournamentStore::with_ttl_hours(12).inactivity_timeout(),
        Duration::from_secs(12 * 3600)
    );
    store.insert(tournament(2, None)).unwrap();
    assert_eq!(store.cleanup_inactive().unwrap(), 0);
}
