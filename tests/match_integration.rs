//! Multi-round integration tests for whole matches.
//!
//! These tests verify that matches run to completion over generated maps,
//! that replays are byte-for-byte reproducible and that recorded streams
//! read back intact.
//!
//! Run with: cargo test --release match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs::File;
use std::io::{BufReader, BufWriter};

use paintfront::replay::read_json_lines;
use paintfront::scheduler::{IdleProvider, RoamingPainter};
use paintfront::tournament::{
    TournamentConfig, generate_map, generate_maps, run_match, run_match_recorded, run_series,
};
use paintfront::{Event, JsonLinesSink, MatchConfig, Team, VecSink, WinReason};

fn checked() -> MatchConfig {
    MatchConfig {
        check_invariants: true,
        ..MatchConfig::default()
    }
}

fn record_to_file(seed: u64, dir: &tempfile::TempDir, name: &str) -> Vec<u8> {
    let mut map = generate_map(seed, 30, 30).unwrap();
    map.rounds = 150;
    let path = dir.path().join(name);
    let sink = JsonLinesSink::new(BufWriter::new(File::create(&path).unwrap()));
    let (_, sink) =
        run_match_recorded(&map, RoamingPainter, RoamingPainter, sink, &checked()).unwrap();
    drop(sink.into_inner());
    std::fs::read(&path).unwrap()
}

#[test]
fn test_replay_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = record_to_file(2024, &dir, "first.jsonl");
    let second = record_to_file(2024, &dir, "second.jsonl");
    assert!(!first.is_empty());
    assert_eq!(first, second);

    let other = record_to_file(2025, &dir, "other.jsonl");
    assert_ne!(first, other);
}

#[test]
fn test_recorded_stream_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = record_to_file(7, &dir, "match.jsonl");
    let events = read_json_lines(BufReader::new(bytes.as_slice())).unwrap();

    assert!(matches!(events.first(), Some(Event::MatchHeader(_))));
    assert!(matches!(events.last(), Some(Event::MatchFooter(_))));
    let rounds: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            Event::Round(r) => Some(r.round),
            _ => None,
        })
        .collect();
    let expected: Vec<u32> = (1..=u32::try_from(rounds.len()).unwrap()).collect();
    assert_eq!(rounds, expected);

    // The same match into memory gives the same events.
    let mut map = generate_map(7, 30, 30).unwrap();
    map.rounds = 150;
    let (_, sink) =
        run_match_recorded(&map, RoamingPainter, RoamingPainter, VecSink::new(), &checked())
            .unwrap();
    assert_eq!(sink.into_events(), events);
}

#[test]
fn test_painter_beats_idle_team() {
    let mut map = generate_map(31, 30, 30).unwrap();
    map.rounds = 200;
    let result = run_match(&map, RoamingPainter, IdleProvider, &checked()).unwrap();
    assert_eq!(result.winner, Team::A);
    assert_ne!(result.reason, WinReason::CoinFlip);
    assert!(result.teams[0].painted_cells > result.teams[1].painted_cells);
}

#[test]
fn test_many_seeds_complete() {
    let maps = generate_maps(0, 12, 24, 24).unwrap();
    for mut map in maps {
        map.rounds = 60;
        let result = run_match(&map, RoamingPainter, RoamingPainter, &checked());
        assert!(result.is_ok(), "map {} failed: {:?}", map.name, result.err());
        assert!(result.unwrap().rounds <= 60);
    }
}

#[test]
fn test_series_tallies_wins() {
    let maps: Vec<_> = generate_maps(500, 6, 20, 20)
        .unwrap()
        .into_iter()
        .map(|mut m| {
            m.rounds = 80;
            m
        })
        .collect();
    let config = TournamentConfig {
        match_config: checked(),
        parallel: true,
    };
    let series = run_series(&maps, || (RoamingPainter, IdleProvider), &config).unwrap();
    assert_eq!(series.matches.len(), 6);
    assert_eq!(series.wins, [6, 0]);
    assert_eq!(series.winner, Some(Team::A));
    for (result, map) in series.matches.iter().zip(&maps) {
        assert_eq!(result.map_name, map.name);
        assert_eq!(result.seed, map.seed);
    }
}
