//! Robot movement.

use crate::error::{ActionError, GameResult};
use crate::game::constants::{
    LOW_PAINT_PENALTY_INTERCEPT, LOW_PAINT_PENALTY_SLOPE, LOW_PAINT_THRESHOLD_PERCENT,
    MOVEMENT_COOLDOWN, PENALTY_ENEMY_TERRITORY, PENALTY_NEUTRAL_TERRITORY,
};
use crate::game::{Direction, MapLocation, Paint, Unit, UnitId, World};
use crate::replay::ActionEvent;

/// Cooldown a move adds, scaled up when the robot is low on paint.
#[must_use]
pub fn movement_cooldown_for(unit: &Unit) -> u32 {
    let percent = unit.paint_percent();
    if percent >= LOW_PAINT_THRESHOLD_PERCENT {
        return MOVEMENT_COOLDOWN;
    }
    let penalty = LOW_PAINT_PENALTY_INTERCEPT.saturating_sub(LOW_PAINT_PENALTY_SLOPE * percent);
    MOVEMENT_COOLDOWN * (100 + penalty) / 100
}

impl World {
    pub(super) fn validate_move(
        &self,
        unit: &Unit,
        at: MapLocation,
        dir: Direction,
    ) -> Result<(), ActionError> {
        if !unit.unit_type().is_robot() {
            return Err(ActionError::WrongUnitType(unit.unit_type()));
        }
        if !unit.is_movement_ready() {
            return Err(ActionError::NotReady);
        }
        if dir == Direction::Center {
            return Err(ActionError::InvalidArgument("cannot move to the center"));
        }
        let to = at.add(dir);
        if !self.grid.on_map(to) {
            return Err(ActionError::OffMap(to));
        }
        if self.grid.occupant(to).is_some() {
            return Err(ActionError::Occupied(to));
        }
        if !self.grid.is_passable(to) {
            return Err(ActionError::Impassable(to));
        }
        Ok(())
    }

    pub(super) fn apply_move(&mut self, id: UnitId, dir: Direction) -> GameResult<()> {
        let from = self.units.location_of(id)?;
        let to = from.add(dir);
        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(id));
        self.units.place(id, to)?;

        let paint = self.grid.paint(to);
        let unit = self.units.get_mut(id)?;
        let cooldown = movement_cooldown_for(unit);
        unit.add_movement_cooldown(cooldown);
        let team = unit.team();
        match paint {
            Paint::Empty => {
                unit.remove_paint(PENALTY_NEUTRAL_TERRITORY);
            }
            p if p.is_enemy_of(team) => {
                unit.remove_paint(PENALTY_ENEMY_TERRITORY);
            }
            Paint::Team(..) => {}
        }
        self.push_event(ActionEvent::Move {
            unit: id,
            from,
            to,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PerformError;
    use crate::game::{Action, MapBuilder, PaintColor, Team, UnitType};

    fn setup(paint: u32) -> (World, UnitId) {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .wall(8, 9)
            .build();
        let mut world = World::new(&spec).unwrap();
        let id = world
            .spawn_unit(Team::A, UnitType::Soldier, MapLocation::new(8, 8), paint)
            .unwrap();
        world.take_events();
        (world, id)
    }

    #[test]
    fn test_move_postconditions() {
        let (mut world, id) = setup(200);
        world.perform(id, &Action::Move(Direction::East)).unwrap();
        let to = MapLocation::new(9, 8);
        assert_eq!(world.unit(id).unwrap().location(), Some(to));
        assert_eq!(world.grid().occupant(to), Some(id));
        assert_eq!(world.grid().occupant(MapLocation::new(8, 8)), None);
        assert_eq!(world.unit(id).unwrap().movement_cooldown(), MOVEMENT_COOLDOWN);
        assert_eq!(world.unit(id).unwrap().paint(), 199);
    }

    #[test]
    fn test_move_blocked() {
        let (mut world, id) = setup(200);
        assert_eq!(
            world.validate(id, &Action::Move(Direction::North)),
            Err(ActionError::Impassable(MapLocation::new(8, 9)))
        );
        world.perform(id, &Action::Move(Direction::South)).unwrap();
        assert!(matches!(
            world.perform(id, &Action::Move(Direction::South)),
            Err(PerformError::Rejected(ActionError::NotReady))
        ));
    }

    #[test]
    fn test_move_onto_own_and_enemy_paint() {
        let (mut world, id) = setup(200);
        world
            .paint_cell(MapLocation::new(7, 8), Paint::Team(Team::A, PaintColor::Primary))
            .unwrap();
        world
            .paint_cell(MapLocation::new(6, 8), Paint::Team(Team::B, PaintColor::Primary))
            .unwrap();
        world.perform(id, &Action::Move(Direction::West)).unwrap();
        assert_eq!(world.unit(id).unwrap().paint(), 200);
        world.begin_round().unwrap();
        world.perform(id, &Action::Move(Direction::West)).unwrap();
        assert_eq!(world.unit(id).unwrap().paint(), 198);
    }

    #[test]
    fn test_low_paint_cooldown() {
        let (world, id) = setup(0);
        assert_eq!(movement_cooldown_for(world.unit(id).unwrap()), 20);
        let (world, id) = setup(50);
        assert_eq!(movement_cooldown_for(world.unit(id).unwrap()), 15);
        let (world, id) = setup(100);
        assert_eq!(movement_cooldown_for(world.unit(id).unwrap()), MOVEMENT_COOLDOWN);
    }

    #[test]
    fn test_tower_cannot_move() {
        let (world, _) = setup(200);
        let tower = world.grid().occupant(MapLocation::new(3, 3)).unwrap();
        assert_eq!(
            world.validate(tower, &Action::Move(Direction::North)),
            Err(ActionError::WrongUnitType(UnitType::LevelOnePaintTower))
        );
    }
}
