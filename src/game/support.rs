//! Healing and paint transfers between allies.

use crate::error::{ActionError, GameResult};
use crate::game::constants::{
    HEAL_AMOUNT, HEAL_COOLDOWN, HEAL_PAINT_COST, HEAL_RADIUS_SQUARED, PAINT_TRANSFER_COOLDOWN,
    PAINT_TRANSFER_RADIUS_SQUARED,
};
use crate::game::{MapLocation, Unit, UnitId, UnitType, World};
use crate::replay::ActionEvent;

impl World {
    /// Unit standing at `loc`, or the matching rejection.
    fn target_at(&self, loc: MapLocation) -> Result<&Unit, ActionError> {
        self.unit_at(loc).ok_or(ActionError::NoUnitAtTarget(loc))
    }

    pub(super) fn validate_heal(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        if !unit.unit_type().is_robot() {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        self.check_reach(at, loc, HEAL_RADIUS_SQUARED)?;
        if !unit.is_action_ready() {
            return Err(ActionError::NotReady);
        }
        let target = self.target_at(loc)?;
        if target.team() != unit.team() {
            return Err(ActionError::WrongTeam);
        }
        if !target.unit_type().is_robot() {
            return Err(ActionError::WrongUnitType(target.unit_type()));
        }
        if target.id() == unit.id() {
            return Err(ActionError::InvalidArgument("a robot cannot heal itself"));
        }
        if target.health() >= target.unit_type().profile().health {
            return Err(ActionError::InvalidArgument("target is at full health"));
        }
        if unit.paint() < HEAL_PAINT_COST {
            return Err(ActionError::InsufficientPaint {
                needed: HEAL_PAINT_COST,
                available: unit.paint(),
            });
        }
        Ok(())
    }

    pub(super) fn apply_heal(&mut self, id: UnitId, loc: MapLocation) -> GameResult<()> {
        let target = self.occupant_id(loc)?;
        let amount = self.units.get_mut(target)?.heal(HEAL_AMOUNT);
        let healer = self.units.get_mut(id)?;
        healer.remove_paint(HEAL_PAINT_COST);
        healer.add_action_cooldown(HEAL_COOLDOWN);
        self.push_event(ActionEvent::Heal {
            unit: id,
            target,
            amount,
        });
        Ok(())
    }

    pub(super) fn validate_transfer(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
        amount: i32,
    ) -> Result<(), ActionError> {
        self.check_reach(at, loc, PAINT_TRANSFER_RADIUS_SQUARED)?;
        if !unit.is_action_ready() {
            return Err(ActionError::NotReady);
        }
        let target = self.target_at(loc)?;
        if target.id() == unit.id() {
            return Err(ActionError::InvalidArgument("cannot transfer paint to itself"));
        }
        if amount == 0 {
            return Err(ActionError::InvalidArgument("transfer amount is zero"));
        }
        if target.team() != unit.team() {
            return Err(ActionError::WrongTeam);
        }
        if unit.unit_type().is_tower() {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        if amount > 0 && unit.unit_type() != UnitType::Mopper {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        if amount < 0 && !target.unit_type().is_tower() {
            return Err(ActionError::WrongUnitType(target.unit_type()));
        }

        let (giver, receiver) = if amount > 0 {
            (unit, target)
        } else {
            (target, unit)
        };
        let moved = amount.unsigned_abs();
        if giver.paint() < moved {
            return Err(ActionError::InsufficientPaint {
                needed: moved,
                available: giver.paint(),
            });
        }
        if receiver.paint_room() < moved {
            return Err(ActionError::CapacityExceeded);
        }
        Ok(())
    }

    pub(super) fn apply_transfer(
        &mut self,
        id: UnitId,
        loc: MapLocation,
        amount: i32,
    ) -> GameResult<()> {
        let target = self.occupant_id(loc)?;
        let (giver, receiver) = if amount > 0 { (id, target) } else { (target, id) };
        let moved = self.units.get_mut(giver)?.remove_paint(amount.unsigned_abs());
        self.units.get_mut(receiver)?.add_paint(moved);
        self.units.get_mut(id)?.add_action_cooldown(PAINT_TRANSFER_COOLDOWN);
        self.push_event(ActionEvent::Transfer {
            unit: id,
            target,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, MapBuilder, Team};

    fn world() -> (World, UnitId) {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .build();
        let world = World::new(&spec).unwrap();
        let tower = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        (world, tower)
    }

    #[test]
    fn test_heal_ally() {
        let (mut world, _) = world();
        let healer = world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(8, 8), 50)
            .unwrap();
        let patient = world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(9, 9), 50)
            .unwrap();
        let heal = Action::Heal {
            location: MapLocation::new(9, 9),
        };
        assert!(matches!(
            world.validate(healer, &heal),
            Err(ActionError::InvalidArgument(_))
        ));
        world.damage_unit(patient, 100).unwrap();
        world.perform(healer, &heal).unwrap();
        assert_eq!(world.unit(patient).unwrap().health(), 230);
        let healer = world.unit(healer).unwrap();
        assert_eq!(healer.paint(), 40);
        assert_eq!(healer.action_cooldown(), HEAL_COOLDOWN);
    }

    #[test]
    fn test_heal_rejects_enemy_and_self() {
        let (mut world, _) = world();
        let healer = world
            .spawn_unit(Team::A, UnitType::Mopper, MapLocation::new(8, 8), 50)
            .unwrap();
        let enemy = world
            .spawn_unit(Team::B, UnitType::Soldier, MapLocation::new(8, 9), 50)
            .unwrap();
        world.damage_unit(enemy, 10).unwrap();
        assert_eq!(
            world.validate(healer, &Action::Heal {
                location: MapLocation::new(8, 9)
            }),
            Err(ActionError::WrongTeam)
        );
        assert!(matches!(
            world.validate(healer, &Action::Heal {
                location: MapLocation::new(8, 8)
            }),
            Err(ActionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_robot_takes_from_tower() {
        let (mut world, tower) = world();
        let soldier = world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(4, 4), 10)
            .unwrap();
        world
            .perform(soldier, &Action::TransferPaint {
                location: MapLocation::new(3, 3),
                amount: -100,
            })
            .unwrap();
        assert_eq!(world.unit(soldier).unwrap().paint(), 110);
        assert_eq!(world.unit(tower).unwrap().paint(), 400);
        assert_eq!(
            world.unit(soldier).unwrap().action_cooldown(),
            PAINT_TRANSFER_COOLDOWN
        );
    }

    #[test]
    fn test_transfer_rules() {
        let (mut world, _) = world();
        let soldier = world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(4, 4), 150)
            .unwrap();
        let mopper = world
            .spawn_unit(Team::A, UnitType::Mopper, MapLocation::new(5, 4), 60)
            .unwrap();
        let give = |location, amount| Action::TransferPaint { location, amount };

        assert_eq!(
            world.validate(soldier, &give(MapLocation::new(5, 4), 10)),
            Err(ActionError::WrongUnitType(UnitType::Soldier))
        );
        assert_eq!(
            world.validate(soldier, &give(MapLocation::new(5, 4), -10)),
            Err(ActionError::WrongUnitType(UnitType::Mopper))
        );
        assert_eq!(
            world.validate(mopper, &give(MapLocation::new(4, 4), 60)),
            Err(ActionError::CapacityExceeded)
        );
        assert_eq!(
            world.validate(mopper, &give(MapLocation::new(4, 4), 70)),
            Err(ActionError::InsufficientPaint {
                needed: 70,
                available: 60
            })
        );
        assert!(matches!(
            world.validate(mopper, &give(MapLocation::new(4, 4), 0)),
            Err(ActionError::InvalidArgument(_))
        ));

        world.perform(mopper, &give(MapLocation::new(4, 4), 50)).unwrap();
        assert_eq!(world.unit(soldier).unwrap().paint(), 200);
        assert_eq!(world.unit(mopper).unwrap().paint(), 10);
    }

    #[test]
    fn test_tower_cannot_transfer() {
        let (mut world, tower) = world();
        world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(4, 4), 10)
            .unwrap();
        assert_eq!(
            world.validate(tower, &Action::TransferPaint {
                location: MapLocation::new(4, 4),
                amount: 10,
            }),
            Err(ActionError::WrongUnitType(UnitType::LevelOnePaintTower))
        );
    }
}
