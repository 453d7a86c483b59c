#![no_main]

//! Full round fuzzer.
//!
//! This fuzz target drives the world through whole rounds by hand:
//! 1. Begin the round (cooldowns, income, paint penalties)
//! 2. Let fuzzed units attempt fuzzed actions
//! 3. Collect income and sweep resource patterns
//! 4. Check for a winner
//!
//! After every action it checks that `can` agreed with `perform` and that
//! the world is still internally consistent.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use paintfront::game::invariants::check_invariants;
use paintfront::game::{Symmetry, UnitType};
use paintfront::{
    Action, Direction, MapBuilder, MapLocation, PaintColor, PerformError, Team, World,
};

/// A fuzzer-generated action, relative to the actor.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzAction {
    Move(u8),
    Build { kind: u8, dx: i32, dy: i32 },
    Mark { dx: i32, dy: i32, secondary: bool },
    MarkTower { kind: u8, dx: i32, dy: i32, symmetry: u8 },
    CompleteTower { kind: u8, dx: i32, dy: i32 },
    MarkResource { dx: i32, dy: i32, symmetry: u8 },
    CompleteResource { dx: i32, dy: i32 },
    Upgrade { dx: i32, dy: i32 },
    Attack { dx: i32, dy: i32, secondary: bool },
    AreaAttack,
    MopSwing(u8),
    Heal { dx: i32, dy: i32 },
    Transfer { dx: i32, dy: i32, amount: i16 },
    Message { dx: i32, dy: i32, content: u32 },
    Shared { index: u8, value: i32 },
}

/// Structured input for round fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    /// Map seed for the coin flip.
    seed: u64,
    /// Per-round list of (actor selector, action).
    rounds: Vec<Vec<(u8, FuzzAction)>>,
}

const ROBOTS: [UnitType; 3] = [UnitType::Soldier, UnitType::Splasher, UnitType::Mopper];
const TOWERS: [UnitType; 3] = [
    UnitType::LevelOnePaintTower,
    UnitType::LevelOneMoneyTower,
    UnitType::LevelOneDefenseTower,
];

/// Small offsets stay near the actor; large ones are passed through so
/// far-off and extreme targets get exercised too.
fn offset(origin: MapLocation, dx: i32, dy: i32) -> MapLocation {
    let shrink = |d: i32| if d.unsigned_abs() < 1 << 20 { d % 6 } else { d };
    origin.translate(shrink(dx), shrink(dy))
}

fn direction(d: u8) -> Direction {
    Direction::ALL[usize::from(d) % Direction::ALL.len()]
}

fn symmetry(s: u8) -> Symmetry {
    Symmetry::ALL[usize::from(s) % Symmetry::ALL.len()]
}

fn decode(action: &FuzzAction, origin: MapLocation) -> Action {
    match *action {
        FuzzAction::Move(d) => Action::Move(direction(d)),
        FuzzAction::Build { kind, dx, dy } => Action::BuildRobot {
            unit_type: ROBOTS[usize::from(kind) % ROBOTS.len()],
            location: offset(origin, dx, dy),
        },
        FuzzAction::Mark { dx, dy, secondary } => Action::Mark {
            location: offset(origin, dx, dy),
            color: PaintColor::from_secondary(secondary),
        },
        FuzzAction::MarkTower {
            kind,
            dx,
            dy,
            symmetry: s,
        } => Action::MarkTowerPattern {
            unit_type: TOWERS[usize::from(kind) % TOWERS.len()],
            location: offset(origin, dx, dy),
            symmetry: symmetry(s),
        },
        FuzzAction::CompleteTower { kind, dx, dy } => Action::CompleteTowerPattern {
            unit_type: TOWERS[usize::from(kind) % TOWERS.len()],
            location: offset(origin, dx, dy),
        },
        FuzzAction::MarkResource {
            dx,
            dy,
            symmetry: s,
        } => Action::MarkResourcePattern {
            location: offset(origin, dx, dy),
            symmetry: symmetry(s),
        },
        FuzzAction::CompleteResource { dx, dy } => Action::CompleteResourcePattern {
            location: offset(origin, dx, dy),
        },
        FuzzAction::Upgrade { dx, dy } => Action::UpgradeTower {
            location: offset(origin, dx, dy),
        },
        FuzzAction::Attack { dx, dy, secondary } => Action::Attack {
            target: Some(offset(origin, dx, dy)),
            color: PaintColor::from_secondary(secondary),
        },
        FuzzAction::AreaAttack => Action::Attack {
            target: None,
            color: PaintColor::Primary,
        },
        FuzzAction::MopSwing(d) => Action::MopSwing(direction(d)),
        FuzzAction::Heal { dx, dy } => Action::Heal {
            location: offset(origin, dx, dy),
        },
        FuzzAction::Transfer { dx, dy, amount } => Action::TransferPaint {
            location: offset(origin, dx, dy),
            amount: i32::from(amount),
        },
        FuzzAction::Message { dx, dy, content } => Action::SendMessage {
            location: offset(origin, dx, dy),
            content,
        },
        FuzzAction::Shared { index, value } => Action::WriteSharedArray {
            index: usize::from(index),
            value,
        },
    }
}

fuzz_target!(|input: RoundInput| {
    let spec = MapBuilder::new(20, 20)
        .seed(input.seed)
        .wall(9, 9)
        .wall(10, 10)
        .ruin(10, 4)
        .ruin(9, 15)
        .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
        .tower(Team::A, UnitType::LevelOneMoneyTower, 3, 10)
        .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
        .tower(Team::B, UnitType::LevelOneMoneyTower, 16, 9)
        .rounds(40)
        .build();
    let Ok(mut world) = World::new(&spec) else {
        return;
    };

    for round_actions in input.rounds.iter().take(40) {
        if world.begin_round().is_err() {
            panic!("begin_round failed");
        }
        for (selector, fuzz_action) in round_actions.iter().take(32) {
            if !world.is_running() {
                break;
            }
            let order = world.units().execution_order();
            if order.is_empty() {
                break;
            }
            let id = order[usize::from(*selector) % order.len()];
            let Some(origin) = world.unit(id).ok().and_then(|u| u.location()) else {
                continue;
            };
            let action = decode(fuzz_action, origin);
            let allowed = world.can(id, &action);
            match world.perform(id, &action) {
                Ok(()) => assert!(allowed, "performed {action:?} that can() refused"),
                Err(PerformError::Rejected(_)) => {
                    assert!(!allowed, "rejected {action:?} that can() allowed");
                }
                Err(PerformError::Fatal(e)) => panic!("fatal error on {action:?}: {e}"),
            }
            let violations = check_invariants(&world);
            assert!(violations.is_empty(), "after {action:?}: {violations:?}");
        }
        if world.collect_income().is_err() {
            panic!("collect_income failed");
        }
        world.sweep_resource_patterns();
        let _ = world.snapshot_teams();
        if let Err(e) = world.check_early_win() {
            panic!("early win check failed: {e}");
        }
        if world.is_running() && world.at_round_limit() {
            world.resolve_at_limit();
        }
        assert!(world.verify_area_tally().is_ok());
        if !world.is_running() {
            break;
        }
    }
});
