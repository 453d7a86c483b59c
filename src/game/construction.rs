//! Building robots, marking and completing patterns, upgrading towers.

use tracing::debug;

use crate::error::{ActionError, GameResult};
use crate::game::constants::{
    BUILD_ROBOT_COOLDOWN, BUILD_ROBOT_RADIUS_SQUARED, BUILD_TOWER_RADIUS_SQUARED,
    MARK_PATTERN_PAINT_COST, MARK_RADIUS_SQUARED, MAX_NUMBER_OF_TOWERS,
    RESOURCE_PATTERN_RADIUS_SQUARED, UPGRADE_TOWER_RADIUS_SQUARED,
};
use crate::game::pattern::{check_pattern, is_valid_center};
use crate::game::{MapLocation, PaintColor, Pattern, Symmetry, Unit, UnitId, UnitType, World};
use crate::replay::ActionEvent;

fn require_robot(unit: &Unit) -> Result<(), ActionError> {
    if unit.unit_type().is_robot() {
        Ok(())
    } else {
        Err(ActionError::WrongUnitType(unit.unit_type()))
    }
}

fn require_paint(unit: &Unit, needed: u32) -> Result<(), ActionError> {
    if unit.paint() >= needed {
        Ok(())
    } else {
        Err(ActionError::InsufficientPaint {
            needed,
            available: unit.paint(),
        })
    }
}

impl World {
    fn require_money(&self, unit: &Unit, needed: u32) -> Result<(), ActionError> {
        if self.ledger.can_afford(unit.team(), needed) {
            Ok(())
        } else {
            Err(ActionError::InsufficientMoney {
                needed,
                available: self.ledger.money(unit.team()),
            })
        }
    }

    fn require_valid_center(&self, loc: MapLocation) -> Result<(), ActionError> {
        if is_valid_center(&self.grid, loc) {
            Ok(())
        } else {
            Err(ActionError::InvalidPatternCenter(loc))
        }
    }

    fn require_ruin(&self, loc: MapLocation) -> Result<(), ActionError> {
        if self.grid.is_ruin(loc) {
            Ok(())
        } else {
            Err(ActionError::NotARuin(loc))
        }
    }

    fn charge_money(&mut self, id: UnitId, cost: u32) -> GameResult<()> {
        let team = self.units.get(id)?.team();
        self.ledger.add_money(team, -i64::from(cost))?;
        Ok(())
    }

    pub(super) fn validate_build_robot(
        &self,
        unit: &Unit,
        at: MapLocation,
        unit_type: UnitType,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        self.check_reach(at, loc, BUILD_ROBOT_RADIUS_SQUARED)?;
        if !unit.is_action_ready() {
            return Err(ActionError::NotReady);
        }
        if !unit.unit_type().is_tower() {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        if !unit_type.is_robot() {
            return Err(ActionError::WrongUnitType(unit_type));
        }
        let profile = unit_type.profile();
        require_paint(unit, profile.paint_cost)?;
        self.require_money(unit, profile.money_cost)?;
        if self.grid.occupant(loc).is_some() {
            return Err(ActionError::Occupied(loc));
        }
        if !self.grid.is_passable(loc) {
            return Err(ActionError::Impassable(loc));
        }
        Ok(())
    }

    pub(super) fn apply_build_robot(
        &mut self,
        id: UnitId,
        unit_type: UnitType,
        loc: MapLocation,
    ) -> GameResult<()> {
        let profile = unit_type.profile();
        let tower = self.units.get_mut(id)?;
        tower.add_action_cooldown(BUILD_ROBOT_COOLDOWN);
        tower.remove_paint(profile.paint_cost);
        let team = tower.team();
        self.ledger.add_money(team, -i64::from(profile.money_cost))?;
        let built = self.spawn_unit(team, unit_type, loc, profile.paint_cost)?;
        self.push_event(ActionEvent::Build {
            unit: id,
            built,
            unit_type,
        });
        Ok(())
    }

    pub(super) fn validate_mark(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
        removing: bool,
    ) -> Result<(), ActionError> {
        require_robot(unit)?;
        self.check_reach(at, loc, MARK_RADIUS_SQUARED)?;
        if removing && self.grid.marker(loc, unit.team()).is_none() {
            return Err(ActionError::NoMarker(loc));
        }
        Ok(())
    }

    pub(super) fn apply_mark(
        &mut self,
        id: UnitId,
        loc: MapLocation,
        color: Option<PaintColor>,
    ) -> GameResult<()> {
        let team = self.units.get(id)?.team();
        self.grid.set_marker(loc, team, color);
        self.push_event(match color {
            Some(color) => ActionEvent::Mark {
                unit: id,
                location: loc,
                color,
            },
            None => ActionEvent::Unmark {
                unit: id,
                location: loc,
            },
        });
        Ok(())
    }

    pub(super) fn validate_mark_tower_pattern(
        &self,
        unit: &Unit,
        at: MapLocation,
        unit_type: UnitType,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        require_robot(unit)?;
        if !unit_type.is_tower() {
            return Err(ActionError::WrongUnitType(unit_type));
        }
        self.check_reach(at, loc, BUILD_TOWER_RADIUS_SQUARED)?;
        self.require_ruin(loc)?;
        self.require_valid_center(loc)?;
        require_paint(unit, MARK_PATTERN_PAINT_COST)
    }

    pub(super) fn validate_mark_resource_pattern(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        require_robot(unit)?;
        self.check_reach(at, loc, RESOURCE_PATTERN_RADIUS_SQUARED)?;
        self.require_valid_center(loc)?;
        require_paint(unit, MARK_PATTERN_PAINT_COST)
    }

    fn stamp_markers(
        &mut self,
        id: UnitId,
        pattern: Pattern,
        center: MapLocation,
        symmetry: Symmetry,
    ) -> GameResult<()> {
        let unit = self.units.get_mut(id)?;
        unit.remove_paint(MARK_PATTERN_PAINT_COST);
        let team = unit.team();
        for (loc, color) in pattern.stamp(center, symmetry) {
            self.grid.set_marker(loc, team, Some(color));
            self.push_event(ActionEvent::Mark {
                unit: id,
                location: loc,
                color,
            });
        }
        Ok(())
    }

    pub(super) fn apply_mark_tower_pattern(
        &mut self,
        id: UnitId,
        unit_type: UnitType,
        loc: MapLocation,
        symmetry: Symmetry,
    ) -> GameResult<()> {
        let Some(kind) = unit_type.tower_kind() else {
            return Err(crate::error::GameError::Invariant(format!(
                "{unit_type:?} has no tower template"
            )));
        };
        let pattern = self.patterns.tower(kind);
        self.stamp_markers(id, pattern, loc, symmetry)
    }

    pub(super) fn apply_mark_resource_pattern(
        &mut self,
        id: UnitId,
        loc: MapLocation,
        symmetry: Symmetry,
    ) -> GameResult<()> {
        let pattern = self.patterns.resource;
        self.stamp_markers(id, pattern, loc, symmetry)
    }

    pub(super) fn validate_complete_tower_pattern(
        &self,
        unit: &Unit,
        at: MapLocation,
        unit_type: UnitType,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        require_robot(unit)?;
        let Some(kind) = unit_type.tower_kind().filter(|_| unit_type.is_level_one_tower()) else {
            return Err(ActionError::WrongUnitType(unit_type));
        };
        self.check_reach(at, loc, BUILD_TOWER_RADIUS_SQUARED)?;
        if self.grid.occupant(loc).is_some() {
            return Err(ActionError::TowerAlreadyPresent(loc));
        }
        self.require_ruin(loc)?;
        self.require_valid_center(loc)?;
        if !check_pattern(&self.grid, self.patterns.tower(kind), unit.team(), loc) {
            return Err(ActionError::PatternMismatch);
        }
        if self.units.count_towers(unit.team()) >= MAX_NUMBER_OF_TOWERS {
            return Err(ActionError::TowerLimitReached);
        }
        self.require_money(unit, unit_type.profile().money_cost)
    }

    pub(super) fn apply_complete_tower_pattern(
        &mut self,
        id: UnitId,
        unit_type: UnitType,
        loc: MapLocation,
    ) -> GameResult<()> {
        self.charge_money(id, unit_type.profile().money_cost)?;
        let team = self.units.get(id)?.team();
        let built = self.spawn_unit(team, unit_type, loc, 0)?;
        debug!(unit = id.0, tower = built.0, ?unit_type, x = loc.x, y = loc.y, "tower built");
        self.push_event(ActionEvent::Build {
            unit: id,
            built,
            unit_type,
        });
        Ok(())
    }

    pub(super) fn validate_complete_resource_pattern(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        require_robot(unit)?;
        self.check_reach(at, loc, RESOURCE_PATTERN_RADIUS_SQUARED)?;
        self.require_valid_center(loc)?;
        if !check_pattern(&self.grid, self.patterns.resource, unit.team(), loc) {
            return Err(ActionError::PatternMismatch);
        }
        Ok(())
    }

    pub(super) fn apply_complete_resource_pattern(
        &mut self,
        id: UnitId,
        loc: MapLocation,
    ) -> GameResult<()> {
        let team = self.units.get(id)?.team();
        self.activate_resource_pattern(team, loc);
        self.push_event(ActionEvent::ResourcePatternCompleted {
            unit: id,
            center: loc,
        });
        Ok(())
    }

    pub(super) fn validate_upgrade(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        self.check_reach(at, loc, UPGRADE_TOWER_RADIUS_SQUARED)?;
        let target = self.unit_at(loc).ok_or(ActionError::NoUnitAtTarget(loc))?;
        if !target.unit_type().is_tower() {
            return Err(ActionError::WrongUnitType(target.unit_type()));
        }
        if target.team() != unit.team() {
            return Err(ActionError::WrongTeam);
        }
        let next = target.unit_type().next_level().ok_or(ActionError::NotUpgradable)?;
        self.require_money(unit, next.profile().money_cost)
    }

    pub(super) fn apply_upgrade(&mut self, id: UnitId, loc: MapLocation) -> GameResult<()> {
        let target_id = self.occupant_id(loc)?;
        let current = self.units.get(target_id)?.unit_type();
        let Some(next) = current.next_level() else {
            return Err(crate::error::GameError::Invariant(format!(
                "{current:?} cannot be upgraded"
            )));
        };
        self.charge_money(id, next.profile().money_cost)?;
        let tower = self.units.get_mut(target_id)?;
        let gained = next.profile().health - current.profile().health;
        tower.set_unit_type(next);
        tower.set_health(tower.health() + gained);
        self.push_event(ActionEvent::Upgrade {
            unit: id,
            target: target_id,
            new_type: next,
        });
        Ok(())
    }
}
