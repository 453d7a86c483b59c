//! Messages between robots and towers, and the team shared array.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, GameError, GameResult};
use crate::game::constants::{
    MAX_MESSAGES_SENT_ROBOT, MAX_MESSAGES_SENT_TOWER, MAX_SHARED_ARRAY_VALUE,
    MESSAGE_RADIUS_SQUARED, SHARED_ARRAY_LENGTH,
};
use crate::game::{Direction, MapLocation, Team, Unit, UnitId, World};
use crate::replay::ActionEvent;

/// A delivered 4-byte message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Payload.
    pub content: u32,
    /// Sending unit.
    pub sender: UnitId,
    /// Round it was sent.
    pub round: u32,
}

/// Messages a unit may send per round.
#[must_use]
pub const fn message_quota(unit: &Unit) -> u32 {
    if unit.unit_type().is_robot() {
        MAX_MESSAGES_SENT_ROBOT
    } else {
        MAX_MESSAGES_SENT_TOWER
    }
}

impl World {
    /// Whether `from` and `to` are joined by a chain of `team`'s paint,
    /// stepping between the eight neighbours of each cell. The two endpoints
    /// themselves need not be painted.
    #[must_use]
    pub fn is_connected_by_paint(&self, team: Team, from: MapLocation, to: MapLocation) -> bool {
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.grid.cells().len()];
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = current.add(dir);
                if next == to {
                    return true;
                }
                let Some(idx) = self.grid.index(next) else {
                    continue;
                };
                if visited[idx] || !self.grid.paint(next).is_owned_by(team) {
                    continue;
                }
                visited[idx] = true;
                queue.push_back(next);
            }
        }
        false
    }

    pub(super) fn validate_message(
        &self,
        unit: &Unit,
        at: MapLocation,
        loc: MapLocation,
    ) -> Result<(), ActionError> {
        self.check_reach(at, loc, MESSAGE_RADIUS_SQUARED)?;
        let target = self.unit_at(loc).ok_or(ActionError::NoUnitAtTarget(loc))?;
        if target.team() != unit.team() {
            return Err(ActionError::WrongTeam);
        }
        if unit.unit_type().is_robot() == target.unit_type().is_robot() {
            return Err(ActionError::WrongUnitType(target.unit_type()));
        }
        if unit.messages_sent() >= message_quota(unit) {
            return Err(ActionError::QuotaExhausted);
        }
        if !self.is_connected_by_paint(unit.team(), at, loc) {
            return Err(ActionError::NotConnected);
        }
        Ok(())
    }

    pub(super) fn apply_message(
        &mut self,
        id: UnitId,
        loc: MapLocation,
        content: u32,
    ) -> GameResult<()> {
        let target = self.occupant_id(loc)?;
        self.units.get_mut(id)?.count_message_sent();
        let round = self.round;
        self.units.get_mut(target)?.receive(Message {
            content,
            sender: id,
            round,
        });
        self.push_event(ActionEvent::Message {
            unit: id,
            target,
            content,
        });
        Ok(())
    }

    pub(super) fn validate_shared_write(index: usize, value: i32) -> Result<(), ActionError> {
        if index >= SHARED_ARRAY_LENGTH {
            return Err(ActionError::InvalidArgument("shared array index out of range"));
        }
        if !(0..=MAX_SHARED_ARRAY_VALUE).contains(&value) {
            return Err(ActionError::InvalidArgument("shared array value out of range"));
        }
        Ok(())
    }

    pub(super) fn apply_shared_write(
        &mut self,
        id: UnitId,
        index: usize,
        value: i32,
    ) -> GameResult<()> {
        let team = self.units.get(id)?.team();
        self.ledger.write_shared(team, index, value)?;
        let value = u16::try_from(value)
            .map_err(|_| GameError::Invariant(format!("shared value {value} stored")))?;
        self.push_event(ActionEvent::SharedArrayWrite {
            unit: id,
            index,
            value,
        });
        Ok(())
    }
}
