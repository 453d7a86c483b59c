//! World invariants - consistency checks that detect engine bugs.
//!
//! These never trigger in a correct engine. The scheduler runs them after
//! every round when `MatchConfig::check_invariants` is set, and the
//! property tests run them after every action.

use crate::game::{Team, World};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all world invariants.
///
/// Returns every violation found, or an empty list if the world is
/// consistent.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let grid = world.grid();
    let units = world.units();

    // Units and the occupancy layer agree in both directions.
    for unit in units.iter() {
        let Some(loc) = unit.location() else {
            violations.push(violation(format!("unit {} is not placed", unit.id())));
            continue;
        };
        if grid.occupant(loc) != Some(unit.id()) {
            violations.push(violation(format!(
                "unit {} at {loc} but the cell holds {:?}",
                unit.id(),
                grid.occupant(loc)
            )));
        }
        if grid.is_wall(loc) {
            violations.push(violation(format!("unit {} stands on a wall", unit.id())));
        }
        if unit.unit_type().is_tower() != grid.is_ruin(loc) {
            violations.push(violation(format!(
                "{:?} {} at {loc} where ruin = {}",
                unit.unit_type(),
                unit.id(),
                grid.is_ruin(loc)
            )));
        }

        let profile = unit.unit_type().profile();
        if unit.health() == 0 || unit.health() > profile.health {
            violations.push(violation(format!(
                "unit {} has health {} outside 1..={}",
                unit.id(),
                unit.health(),
                profile.health
            )));
        }
        if unit.paint() > profile.paint_capacity {
            violations.push(violation(format!(
                "unit {} holds {} paint over capacity {}",
                unit.id(),
                unit.paint(),
                profile.paint_capacity
            )));
        }
    }

    for (loc, cell) in grid.iter() {
        if let Some(id) = cell.occupant {
            match units.get(id) {
                Ok(unit) if unit.location() == Some(loc) => {}
                _ => violations.push(violation(format!("cell {loc} holds stale unit {id}"))),
            }
        }
    }

    // Ledger tallies follow the grid and the registry.
    if let Err(e) = world.verify_area_tally() {
        violations.push(violation(e.to_string()));
    }
    let ledger = world.ledger();
    for team in Team::ALL {
        let towers = units.count_towers(team);
        if towers != ledger.tower_count(team) {
            violations.push(violation(format!(
                "team {team} owns {towers} towers but the ledger has {}",
                ledger.tower_count(team)
            )));
        }
    }

    for site in world.resource_sites() {
        if !grid.on_map(site.center) {
            violations.push(violation(format!("resource site {} is off the map", site.center)));
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MapBuilder, MapLocation, Paint, PaintColor, UnitType};

    fn world() -> World {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .build();
        let mut world = World::new(&spec).unwrap();
        world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(6, 6), 100)
            .unwrap();
        world
            .paint_cell(MapLocation::new(7, 7), Paint::Team(Team::A, PaintColor::Primary))
            .unwrap();
        world
    }

    #[test]
    fn test_valid_world_passes() {
        let world = world();
        assert!(check_invariants(&world).is_empty());
        assert_invariants(&world);
    }

    #[test]
    fn test_detects_stale_occupant() {
        let mut world = world();
        world.grid.set_occupant(MapLocation::new(10, 10), Some(crate::game::UnitId(42)));
        let violations = check_invariants(&world);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("stale"));
    }

    #[test]
    fn test_detects_untracked_paint() {
        let mut world = world();
        world
            .grid
            .set_paint(MapLocation::new(8, 8), Paint::Team(Team::B, PaintColor::Primary));
        let violations = check_invariants(&world);
        assert!(violations.iter().any(|v| v.message.contains("ledger")));
    }

    #[test]
    fn test_detects_area_tally_drift() {
        let mut world = world();
        world.grid.set_paint(MapLocation::new(7, 7), Paint::Empty);
        let violations = check_invariants(&world);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("team A paints 0 cells but ledger has 1"));
        assert!(world.verify_area_tally().is_err());
    }

    #[test]
    fn test_detects_missing_occupancy() {
        let mut world = world();
        world.grid.set_occupant(MapLocation::new(6, 6), None);
        assert!(!check_invariants(&world).is_empty());
    }

    #[test]
    #[should_panic(expected = "invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_panics() {
        let mut world = world();
        world.grid.set_occupant(MapLocation::new(6, 6), None);
        assert_invariants(&world);
    }
}
