//! Unit registry: identity allocation, lookup and execution order.

use std::collections::BTreeMap;

use crate::game::{MapLocation, Team, Unit, UnitId, UnitType};

/// Why a unit lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No live unit has this id.
    NotFound(UnitId),
    /// The unit exists but has not been placed on the grid.
    NotPlaced(UnitId),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound(id) => write!(f, "unit {id} does not exist"),
            LookupError::NotPlaced(id) => write!(f, "unit {id} is not on the map"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Owns every live unit. Iteration is by ascending id, which is creation
/// order and therefore execution order.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitRegistry {
    /// Create an empty registry. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve a fresh id.
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a dormant unit and return its id.
    pub fn create(&mut self, team: Team, unit_type: UnitType) -> UnitId {
        let id = self.allocate_id();
        self.units.insert(id, Unit::new(id, team, unit_type));
        id
    }

    /// Record a unit's location. The caller keeps grid occupancy in step.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the unit does not exist.
    pub fn place(&mut self, id: UnitId, loc: MapLocation) -> Result<(), LookupError> {
        self.get_mut(id)?.set_location(Some(loc));
        Ok(())
    }

    /// Remove a unit, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the unit does not exist.
    pub fn remove(&mut self, id: UnitId) -> Result<Unit, LookupError> {
        self.units.remove(&id).ok_or(LookupError::NotFound(id))
    }

    /// Look up a live unit.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the unit does not exist.
    pub fn get(&self, id: UnitId) -> Result<&Unit, LookupError> {
        self.units.get(&id).ok_or(LookupError::NotFound(id))
    }

    /// Look up a live unit mutably.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the unit does not exist.
    pub fn get_mut(&mut self, id: UnitId) -> Result<&mut Unit, LookupError> {
        self.units.get_mut(&id).ok_or(LookupError::NotFound(id))
    }

    /// Location of a placed unit.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] or [`LookupError::NotPlaced`].
    pub fn location_of(&self, id: UnitId) -> Result<MapLocation, LookupError> {
        self.get(id)?.location().ok_or(LookupError::NotPlaced(id))
    }

    /// Whether the id was handed out but the unit no longer exists.
    #[must_use]
    pub fn was_retired(&self, id: UnitId) -> bool {
        id.0 > 0 && id.0 < self.next_id && !self.units.contains_key(&id)
    }

    /// Whether a live unit has this id.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Snapshot of live ids in execution order.
    #[must_use]
    pub fn execution_order(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    /// All live units in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    #[allow(dead_code)]
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    /// Live units of one team in execution order.
    pub fn iter_team(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.team() == team)
    }

    /// Number of live units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether there are no live units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of a team's units of a given type.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count_by_type(&self, team: Team, unit_type: UnitType) -> u32 {
        self.iter_team(team)
            .filter(|u| u.unit_type() == unit_type)
            .count() as u32
    }

    /// Number of a team's towers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count_towers(&self, team: Team) -> u32 {
        self.iter_team(team)
            .filter(|u| u.unit_type().is_tower())
            .count() as u32
    }

    /// Number of a team's robots.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count_robots(&self, team: Team) -> u32 {
        self.iter_team(team)
            .filter(|u| u.unit_type().is_robot())
            .count() as u32
    }

    /// Total paint held by a team's units.
    #[must_use]
    pub fn stored_paint(&self, team: Team) -> u64 {
        self.iter_team(team).map(|u| u64::from(u.paint())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_monotonic_and_never_reused() {
        let mut registry = UnitRegistry::new();
        let a = registry.create(Team::A, UnitType::Soldier);
        let b = registry.create(Team::B, UnitType::Mopper);
        assert_eq!(a, UnitId(1));
        assert_eq!(b, UnitId(2));
        registry.remove(a).unwrap();
        let c = registry.create(Team::A, UnitType::Splasher);
        assert_eq!(c, UnitId(3));
        assert!(registry.was_retired(a));
        assert!(!registry.was_retired(b));
        assert!(!registry.was_retired(UnitId(99)));
    }

    #[test]
    fn test_lookup_errors() {
        let mut registry = UnitRegistry::new();
        let id = registry.create(Team::A, UnitType::Soldier);
        assert_eq!(registry.location_of(id), Err(LookupError::NotPlaced(id)));
        registry.place(id, MapLocation::new(2, 3)).unwrap();
        assert_eq!(registry.location_of(id), Ok(MapLocation::new(2, 3)));
        assert_eq!(
            registry.get(UnitId(42)).err(),
            Some(LookupError::NotFound(UnitId(42)))
        );
    }

    #[test]
    fn test_counts_and_order() {
        let mut registry = UnitRegistry::new();
        registry.create(Team::B, UnitType::LevelOneMoneyTower);
        registry.create(Team::A, UnitType::Soldier);
        registry.create(Team::A, UnitType::Soldier);
        registry.create(Team::A, UnitType::LevelOnePaintTower);
        assert_eq!(registry.count_by_type(Team::A, UnitType::Soldier), 2);
        assert_eq!(registry.count_towers(Team::A), 1);
        assert_eq!(registry.count_robots(Team::A), 2);
        assert_eq!(registry.count_robots(Team::B), 0);
        assert_eq!(
            registry.execution_order(),
            vec![UnitId(1), UnitId(2), UnitId(3), UnitId(4)]
        );
    }
}
