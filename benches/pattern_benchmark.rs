//! Benchmarks for the spatial hot paths: pattern matching, radius queries
//! and paint connectivity.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use paintfront::game::{Grid, Pattern, Symmetry, check_pattern};
use paintfront::{MapBuilder, MapLocation, Paint, PaintColor, Team, UnitType, World};

fn stamped_grid(symmetry: Symmetry) -> Grid {
    let Some(mut grid) = Grid::new(60, 60) else {
        panic!("grid");
    };
    for (loc, color) in Pattern::MONEY_TOWER.stamp(MapLocation::new(30, 30), symmetry) {
        grid.set_paint(loc, Paint::Team(Team::A, color));
    }
    grid
}

fn bench_check_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_pattern");
    // The matcher tries symmetries in order, so later ones cost more
    for symmetry in [Symmetry::Identity, Symmetry::Rot270, Symmetry::AntiTranspose] {
        let grid = stamped_grid(symmetry);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{symmetry:?}")),
            &grid,
            |b, grid| {
                b.iter(|| {
                    check_pattern(
                        black_box(grid),
                        Pattern::MONEY_TOWER,
                        Team::A,
                        black_box(MapLocation::new(30, 30)),
                    )
                });
            },
        );
    }
    let empty = stamped_grid(Symmetry::Identity);
    group.bench_function("miss", |b| {
        b.iter(|| {
            check_pattern(
                black_box(&empty),
                Pattern::MONEY_TOWER,
                Team::B,
                black_box(MapLocation::new(30, 30)),
            )
        });
    });
    group.finish();
}

fn bench_radius_query(c: &mut Criterion) {
    let Some(grid) = Grid::new(60, 60) else {
        panic!("grid");
    };
    let mut group = c.benchmark_group("locations_within_radius_squared");
    for radius_squared in [2u32, 9, 20, 34] {
        group.bench_with_input(
            BenchmarkId::from_parameter(radius_squared),
            &radius_squared,
            |b, &r| {
                b.iter(|| {
                    grid.locations_within_radius_squared(black_box(MapLocation::new(30, 30)), r)
                });
            },
        );
    }
    group.finish();
}

fn bench_paint_connectivity(c: &mut Criterion) {
    let spec = MapBuilder::new(60, 60)
        .tower(Team::A, UnitType::LevelOnePaintTower, 2, 2)
        .tower(Team::B, UnitType::LevelOnePaintTower, 57, 57)
        .build();
    let Ok(mut world) = World::new(&spec) else {
        panic!("world");
    };
    // Serpentine path: the search has to walk most of the board
    for y in (0..60).step_by(2) {
        for x in 0..60 {
            let _ = world.paint_cell(MapLocation::new(x, y), Paint::Team(Team::A, PaintColor::Primary));
        }
        let link = if (y / 2) % 2 == 0 { 59 } else { 0 };
        let _ = world.paint_cell(
            MapLocation::new(link, y + 1),
            Paint::Team(Team::A, PaintColor::Primary),
        );
    }

    c.bench_function("is_connected_by_paint_serpentine", |b| {
        b.iter(|| {
            world.is_connected_by_paint(
                Team::A,
                black_box(MapLocation::new(0, 0)),
                black_box(MapLocation::new(59, 58)),
            )
        });
    });
}

criterion_group!(benches, bench_check_pattern, bench_radius_query, bench_paint_connectivity);
criterion_main!(benches);
