#![no_main]

//! Pattern matcher fuzzer.
//!
//! Paints arbitrary cells around a center and compares `check_pattern`
//! against a direct evaluation of each of the eight symmetries.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use paintfront::game::{Grid, Pattern, Symmetry, check_pattern};
use paintfront::{MapLocation, Paint, PaintColor, Team};

/// Structured input for pattern fuzzing.
#[derive(Arbitrary, Debug)]
struct PatternInput {
    /// Template bits; only the low 25 are used.
    bits: u32,
    /// Paint codes for the 9x9 neighborhood, row-major.
    cells: [u8; 81],
    /// Make the center a ruin.
    ruin_center: bool,
}

fn paint_from(code: u8) -> Paint {
    match code % 5 {
        0 => Paint::Empty,
        1 => Paint::Team(Team::A, PaintColor::Primary),
        2 => Paint::Team(Team::A, PaintColor::Secondary),
        3 => Paint::Team(Team::B, PaintColor::Primary),
        _ => Paint::Team(Team::B, PaintColor::Secondary),
    }
}

fuzz_target!(|input: PatternInput| {
    let Some(mut grid) = Grid::new(9, 9) else {
        return;
    };
    let center = MapLocation::new(4, 4);
    for (i, &code) in input.cells.iter().enumerate() {
        let i = i32::try_from(i).unwrap_or(0);
        grid.set_paint(MapLocation::new(i % 9, i / 9), paint_from(code));
    }
    if input.ruin_center {
        grid.set_ruin(center, true);
    }
    let pattern = Pattern(input.bits & ((1 << 25) - 1));

    for team in [Team::A, Team::B] {
        let expected = Symmetry::ALL.iter().any(|&symmetry| {
            (-2..=2).all(|dx| {
                (-2..=2).all(|dy| {
                    if input.ruin_center && dx == 0 && dy == 0 {
                        return true;
                    }
                    let (sx, sy) = symmetry.apply(dx, dy);
                    grid.paint(center.translate(sx, sy)) == Paint::Team(team, pattern.color(dx, dy))
                })
            })
        });
        let first = check_pattern(&grid, pattern, team, center);
        assert_eq!(first, expected);
        assert_eq!(first, check_pattern(&grid, pattern, team, center));
    }
});
