//! Benchmarks for running complete matches.
//!
//! This benchmarks the full round scheduler loop on generated maps.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use paintfront::MatchConfig;
use paintfront::game::MapSpec;
use paintfront::scheduler::RoamingPainter;
use paintfront::tournament::{TournamentConfig, generate_map, generate_maps, run_match, run_series};

fn short_map(seed: u64, size: i32, rounds: u32) -> MapSpec {
    let Ok(mut map) = generate_map(seed, size, size) else {
        panic!("map generation failed for seed {seed}");
    };
    map.rounds = rounds;
    map
}

fn bench_single_match(c: &mut Criterion) {
    let map = short_map(42, 40, 300);
    let config = MatchConfig::default();

    c.bench_function("single_match_40x40", |b| {
        b.iter(|| {
            let result = run_match(
                black_box(&map),
                RoamingPainter,
                RoamingPainter,
                black_box(&config),
            );
            black_box(result)
        });
    });
}

fn bench_checked_match(c: &mut Criterion) {
    // Same match with the per-round consistency check turned on
    let map = short_map(42, 40, 300);
    let config = MatchConfig {
        check_invariants: true,
        ..MatchConfig::default()
    };

    c.bench_function("checked_match_40x40", |b| {
        b.iter(|| {
            let result = run_match(
                black_box(&map),
                RoamingPainter,
                RoamingPainter,
                black_box(&config),
            );
            black_box(result)
        });
    });
}

fn bench_series(c: &mut Criterion) {
    let Ok(maps) = generate_maps(0, 8, 30, 30) else {
        panic!("map generation failed");
    };
    let maps: Vec<MapSpec> = maps
        .into_iter()
        .map(|mut m| {
            m.rounds = 200;
            m
        })
        .collect();

    for parallel in [false, true] {
        let config = TournamentConfig {
            parallel,
            ..TournamentConfig::default()
        };
        let name = if parallel { "8_matches_parallel" } else { "8_matches_sequential" };
        c.bench_function(name, |b| {
            b.iter(|| {
                let result = run_series(
                    black_box(&maps),
                    || (RoamingPainter, RoamingPainter),
                    black_box(&config),
                );
                black_box(result)
            });
        });
    }
}

criterion_group!(benches, bench_single_match, bench_checked_match, bench_series);
criterion_main!(benches);
