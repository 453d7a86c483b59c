//! Attacks and mop swings.

use crate::error::{ActionError, GameResult};
use crate::game::constants::{
    MOP_SWING_COOLDOWN, MOP_SWING_PAINT_DRAIN, MOPPER_PAINT_STEAL, SPLASH_OVERWRITE_RADIUS_SQUARED,
    SPLASH_RADIUS_SQUARED,
};
use crate::game::{Direction, MapLocation, Paint, PaintColor, Team, Unit, UnitId, UnitType, World};
use crate::replay::ActionEvent;

/// Cells hit by a mop swing from `origin`: three wide, two deep.
#[must_use]
pub fn mop_swing_cells(origin: MapLocation, dir: Direction) -> Vec<MapLocation> {
    let (px, py) = (dir.dy(), dir.dx());
    let mut cells = Vec::with_capacity(6);
    for step in 1..=2 {
        let center = origin.translate(dir.dx() * step, dir.dy() * step);
        cells.push(center.translate(-px, -py));
        cells.push(center);
        cells.push(center.translate(px, py));
    }
    cells
}

impl World {
    /// Enemy of `team` standing at `loc`, filtered by kind.
    fn enemy_at(&self, loc: MapLocation, team: Team, towers: bool) -> Option<UnitId> {
        self.unit_at(loc)
            .filter(|u| u.team() != team && u.unit_type().is_tower() == towers)
            .map(Unit::id)
    }

    pub(super) fn validate_attack(
        &self,
        unit: &Unit,
        at: MapLocation,
        target: Option<MapLocation>,
    ) -> Result<(), ActionError> {
        let profile = unit.unit_type().profile();
        if !unit.is_action_ready() {
            return Err(ActionError::NotReady);
        }
        if unit.unit_type().is_tower() {
            let Some(target) = target else {
                return if unit.has_area_attacked() {
                    Err(ActionError::AlreadyAttacked)
                } else {
                    Ok(())
                };
            };
            if unit.has_single_attacked() {
                return Err(ActionError::AlreadyAttacked);
            }
            return self.check_reach(at, target, profile.action_radius_squared);
        }

        let Some(target) = target else {
            return Err(ActionError::InvalidArgument("area attack is tower-only"));
        };
        self.check_reach(at, target, profile.action_radius_squared)?;
        if unit.paint() < profile.attack_cost {
            return Err(ActionError::InsufficientPaint {
                needed: profile.attack_cost,
                available: unit.paint(),
            });
        }
        Ok(())
    }

    pub(super) fn apply_attack(
        &mut self,
        id: UnitId,
        target: Option<MapLocation>,
        color: PaintColor,
    ) -> GameResult<()> {
        let unit = self.units.get_mut(id)?;
        let unit_type = unit.unit_type();
        let team = unit.team();
        let profile = unit_type.profile();
        unit.remove_paint(profile.attack_cost);
        unit.add_action_cooldown(profile.action_cooldown);
        self.push_event(ActionEvent::Attack { unit: id, target });

        match (unit_type, target) {
            (UnitType::Soldier, Some(target)) => self.soldier_attack(team, target, color),
            (UnitType::Splasher, Some(target)) => self.splasher_attack(team, target, color),
            (UnitType::Mopper, Some(target)) => self.mopper_attack(id, team, target),
            (_, Some(target)) => {
                self.units.get_mut(id)?.mark_single_attacked();
                match self.enemy_at(target, team, false) {
                    Some(victim) => {
                        self.damage_unit(victim, profile.attack_strength.unwrap_or(0))
                    }
                    None => Ok(()),
                }
            }
            (_, None) => {
                let tower = self.units.get_mut(id)?;
                tower.mark_area_attacked();
                let Some(origin) = tower.location() else {
                    return Ok(());
                };
                let victims: Vec<UnitId> = self
                    .grid
                    .locations_within_radius_squared(origin, profile.action_radius_squared)
                    .into_iter()
                    .filter_map(|loc| self.enemy_at(loc, team, false))
                    .collect();
                let strength = profile.aoe_attack_strength.unwrap_or(0);
                for victim in victims {
                    self.damage_unit(victim, strength)?;
                }
                Ok(())
            }
        }
    }

    fn soldier_attack(&mut self, team: Team, target: MapLocation, color: PaintColor) -> GameResult<()> {
        if let Some(tower) = self.enemy_at(target, team, true) {
            let strength = UnitType::Soldier.profile().attack_strength.unwrap_or(0);
            return self.damage_unit(tower, strength);
        }
        if !self.grid.paint(target).is_enemy_of(team) {
            self.paint_cell(target, Paint::Team(team, color))?;
        }
        Ok(())
    }

    fn splasher_attack(&mut self, team: Team, target: MapLocation, color: PaintColor) -> GameResult<()> {
        let strength = UnitType::Splasher.profile().aoe_attack_strength.unwrap_or(0);
        for loc in self
            .grid
            .locations_within_radius_squared(target, SPLASH_RADIUS_SQUARED)
        {
            if let Some(tower) = self.enemy_at(loc, team, true) {
                self.damage_unit(tower, strength)?;
            }
            let enemy_paint = self.grid.paint(loc).is_enemy_of(team);
            if !enemy_paint
                || target.distance_squared_to(loc) <= SPLASH_OVERWRITE_RADIUS_SQUARED
            {
                self.paint_cell(loc, Paint::Team(team, color))?;
            }
        }
        Ok(())
    }

    fn mopper_attack(&mut self, id: UnitId, team: Team, target: MapLocation) -> GameResult<()> {
        if self.grid.paint(target).is_enemy_of(team) {
            self.paint_cell(target, Paint::Empty)?;
        }
        let Some(victim) = self.enemy_at(target, team, false) else {
            return Ok(());
        };
        let drained = self.units.get_mut(victim)?.remove_paint(MOPPER_PAINT_STEAL);
        self.units.get_mut(id)?.add_paint(drained / 2);
        self.push_event(ActionEvent::Mop {
            unit: id,
            target: victim,
            amount: drained,
        });
        Ok(())
    }

    pub(super) fn validate_mop_swing(unit: &Unit, dir: Direction) -> Result<(), ActionError> {
        if unit.unit_type() != UnitType::Mopper {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        if !dir.is_cardinal() {
            return Err(ActionError::InvalidArgument("mop swing needs a cardinal direction"));
        }
        if !unit.is_action_ready() {
            return Err(ActionError::NotReady);
        }
        Ok(())
    }

    pub(super) fn apply_mop_swing(&mut self, id: UnitId, dir: Direction) -> GameResult<()> {
        let unit = self.units.get_mut(id)?;
        unit.add_action_cooldown(MOP_SWING_COOLDOWN);
        let team = unit.team();
        let origin = self.units.location_of(id)?;
        self.push_event(ActionEvent::MopSwing {
            unit: id,
            direction: dir,
        });
        for loc in mop_swing_cells(origin, dir) {
            if let Some(victim) = self.enemy_at(loc, team, false) {
                self.units.get_mut(victim)?.remove_paint(MOP_SWING_PAINT_DRAIN);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, MapBuilder};

    struct Arena {
        world: World,
        tower_a: UnitId,
        tower_b: UnitId,
    }

    fn arena() -> Arena {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOneDefenseTower, 8, 3)
            .build();
        let world = World::new(&spec).unwrap();
        let tower_a = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        let tower_b = world.grid().occupant(MapLocation::new(8, 3)).unwrap();
        Arena {
            world,
            tower_a,
            tower_b,
        }
    }

    fn attack(target: MapLocation) -> Action {
        Action::Attack {
            target: Some(target),
            color: PaintColor::Primary,
        }
    }

    #[test]
    fn test_soldier_paints_and_pays() {
        let mut a = arena();
        let soldier = a
            .world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(10, 10), 200)
            .unwrap();
        let target = MapLocation::new(12, 12);
        a.world.perform(soldier, &attack(target)).unwrap();
        assert_eq!(a.world.grid().paint(target), Paint::Team(Team::A, PaintColor::Primary));
        let unit = a.world.unit(soldier).unwrap();
        assert_eq!(unit.paint(), 195);
        assert_eq!(unit.action_cooldown(), 10);
        assert_eq!(a.world.ledger().painted_cells(Team::A), 1);
    }

    #[test]
    fn test_soldier_does_not_overwrite_enemy_paint() {
        let mut a = arena();
        let soldier = a
            .world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(10, 10), 200)
            .unwrap();
        let target = MapLocation::new(11, 10);
        let enemy = Paint::Team(Team::B, PaintColor::Secondary);
        a.world.paint_cell(target, enemy).unwrap();
        a.world.perform(soldier, &attack(target)).unwrap();
        assert_eq!(a.world.grid().paint(target), enemy);
    }

    #[test]
    fn test_soldier_damages_enemy_tower() {
        let mut a = arena();
        let soldier = a
            .world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(8, 6), 200)
            .unwrap();
        a.world.perform(soldier, &attack(MapLocation::new(8, 3))).unwrap();
        assert_eq!(a.world.unit(a.tower_b).unwrap().health(), 2500 - 20);
    }

    #[test]
    fn test_splasher_overwrite_radius() {
        let mut a = arena();
        let splasher = a
            .world
            .spawn_unit(Team::A, UnitType::Splasher, MapLocation::new(12, 12), 300)
            .unwrap();
        let target = MapLocation::new(12, 14);
        let near = MapLocation::new(13, 15);
        let far = MapLocation::new(12, 16);
        let enemy = Paint::Team(Team::B, PaintColor::Primary);
        a.world.paint_cell(near, enemy).unwrap();
        a.world.paint_cell(far, enemy).unwrap();
        a.world
            .perform(splasher, &Action::Attack {
                target: Some(target),
                color: PaintColor::Secondary,
            })
            .unwrap();
        let ours = Paint::Team(Team::A, PaintColor::Secondary);
        assert_eq!(a.world.grid().paint(near), ours);
        assert_eq!(a.world.grid().paint(far), enemy);
        assert_eq!(a.world.grid().paint(MapLocation::new(14, 14)), ours);
        assert_eq!(a.world.ledger().painted_cells(Team::A), 12);
        assert_eq!(a.world.unit(splasher).unwrap().paint(), 250);
    }

    #[test]
    fn test_mopper_cleans_and_steals() {
        let mut a = arena();
        let mopper = a
            .world
            .spawn_unit(Team::A, UnitType::Mopper, MapLocation::new(10, 10), 20)
            .unwrap();
        let target = MapLocation::new(11, 10);
        let enemy = a
            .world
            .spawn_unit(Team::B, UnitType::Soldier, target, 100)
            .unwrap();
        a.world
            .paint_cell(target, Paint::Team(Team::B, PaintColor::Primary))
            .unwrap();
        a.world.perform(mopper, &attack(target)).unwrap();
        assert_eq!(a.world.grid().paint(target), Paint::Empty);
        assert_eq!(a.world.unit(enemy).unwrap().paint(), 90);
        assert_eq!(a.world.unit(mopper).unwrap().paint(), 25);
        assert_eq!(a.world.ledger().painted_cells(Team::B), 0);
    }

    #[test]
    fn test_tower_attack_uses_action_cooldown() {
        let mut a = arena();
        let enemy = a
            .world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(8, 5), 100)
            .unwrap();
        a.world.perform(a.tower_b, &attack(MapLocation::new(8, 5))).unwrap();
        assert_eq!(a.world.unit(enemy).unwrap().health(), 250 - 60);
        let tower = a.world.unit(a.tower_b).unwrap();
        assert!(tower.has_single_attacked());
        assert_eq!(tower.action_cooldown(), 10);

        let area = Action::Attack {
            target: None,
            color: PaintColor::Primary,
        };
        assert_eq!(a.world.validate(a.tower_b, &area), Err(ActionError::NotReady));
        assert_eq!(
            a.world.validate(a.tower_b, &attack(MapLocation::new(8, 5))),
            Err(ActionError::NotReady)
        );

        a.world.begin_round().unwrap();
        a.world.perform(a.tower_b, &area).unwrap();
        assert_eq!(a.world.unit(enemy).unwrap().health(), 250 - 60 - 30);
        assert!(a.world.unit(a.tower_b).unwrap().has_area_attacked());
        assert_eq!(a.world.validate(a.tower_b, &area), Err(ActionError::NotReady));
    }

    #[test]
    fn test_tower_cannot_attack_after_building() {
        let mut a = arena();
        a.world.begin_round().unwrap();
        a.world
            .perform(a.tower_a, &Action::BuildRobot {
                unit_type: UnitType::Soldier,
                location: MapLocation::new(4, 4),
            })
            .unwrap();
        let area = Action::Attack {
            target: None,
            color: PaintColor::Primary,
        };
        assert_eq!(a.world.validate(a.tower_a, &area), Err(ActionError::NotReady));
        assert_eq!(
            a.world.validate(a.tower_a, &attack(MapLocation::new(5, 5))),
            Err(ActionError::NotReady)
        );
    }

    #[test]
    fn test_robot_cannot_area_attack() {
        let mut a = arena();
        let soldier = a
            .world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(10, 10), 100)
            .unwrap();
        let area = Action::Attack {
            target: None,
            color: PaintColor::Primary,
        };
        assert!(matches!(
            a.world.validate(soldier, &area),
            Err(ActionError::InvalidArgument(_))
        ));
        assert!(a.world.can(a.tower_a, &area));
    }

    #[test]
    fn test_mop_swing() {
        let mut a = arena();
        let mopper = a
            .world
            .spawn_unit(Team::A, UnitType::Mopper, MapLocation::new(10, 10), 50)
            .unwrap();
        let hit = a
            .world
            .spawn_unit(Team::B, UnitType::Soldier, MapLocation::new(11, 12), 100)
            .unwrap();
        let missed = a
            .world
            .spawn_unit(Team::B, UnitType::Soldier, MapLocation::new(10, 13), 100)
            .unwrap();
        assert!(matches!(
            a.world.validate(mopper, &Action::MopSwing(Direction::NorthEast)),
            Err(ActionError::InvalidArgument(_))
        ));
        a.world.perform(mopper, &Action::MopSwing(Direction::North)).unwrap();
        assert_eq!(a.world.unit(hit).unwrap().paint(), 95);
        assert_eq!(a.world.unit(missed).unwrap().paint(), 100);
        assert_eq!(a.world.unit(mopper).unwrap().action_cooldown(), MOP_SWING_COOLDOWN);
    }

    #[test]
    fn test_swing_cells() {
        let cells = mop_swing_cells(MapLocation::new(5, 5), Direction::East);
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&MapLocation::new(6, 4)));
        assert!(cells.contains(&MapLocation::new(7, 6)));
        assert!(!cells.contains(&MapLocation::new(5, 6)));
    }
}
