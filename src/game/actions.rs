//! The action set and its validate-then-apply entry points.
//!
//! Every check runs before any mutation; a rejected action leaves the world
//! untouched and emits nothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ActionError, GameResult, PerformError};
use crate::game::{Direction, MapLocation, PaintColor, Symmetry, Unit, UnitId, UnitType, World};
use crate::replay::ActionEvent;

/// Something a unit can attempt during its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step one cell.
    Move(Direction),
    /// Tower builds a robot nearby.
    BuildRobot {
        /// Robot type.
        unit_type: UnitType,
        /// Where it appears.
        location: MapLocation,
    },
    /// Place one of the team's markers.
    Mark {
        /// Cell.
        location: MapLocation,
        /// Marker color.
        color: PaintColor,
    },
    /// Remove one of the team's markers.
    RemoveMark {
        /// Cell.
        location: MapLocation,
    },
    /// Mark the full tower template around a ruin.
    MarkTowerPattern {
        /// Tower whose template to use.
        unit_type: UnitType,
        /// Ruin at the center.
        location: MapLocation,
        /// Orientation.
        symmetry: Symmetry,
    },
    /// Mark the full resource template.
    MarkResourcePattern {
        /// Center.
        location: MapLocation,
        /// Orientation.
        symmetry: Symmetry,
    },
    /// Turn a finished tower pattern into a tower.
    CompleteTowerPattern {
        /// Level-one tower type.
        unit_type: UnitType,
        /// Ruin at the center.
        location: MapLocation,
    },
    /// Activate a finished resource pattern.
    CompleteResourcePattern {
        /// Center.
        location: MapLocation,
    },
    /// Raise an allied tower one level.
    UpgradeTower {
        /// Tower location.
        location: MapLocation,
    },
    /// Attack a cell, or area attack for towers when `target` is `None`.
    Attack {
        /// Target cell.
        target: Option<MapLocation>,
        /// Shade for painting attacks.
        color: PaintColor,
    },
    /// Mopper sweep.
    MopSwing(Direction),
    /// Restore health to an allied robot.
    Heal {
        /// Ally location.
        location: MapLocation,
    },
    /// Move paint; positive gives, negative takes.
    TransferPaint {
        /// Counterpart location.
        location: MapLocation,
        /// Signed amount.
        amount: i32,
    },
    /// Deliver a 4-byte message.
    SendMessage {
        /// Receiver location.
        location: MapLocation,
        /// Payload.
        content: u32,
    },
    /// Write the team's shared array.
    WriteSharedArray {
        /// Slot.
        index: usize,
        /// Value in `0..=65535`.
        value: i32,
    },
    /// Concede the match.
    Resign,
}

impl World {
    /// Common prefix of every check: the actor exists, is placed, and the
    /// match is still running.
    pub(super) fn actor(&self, id: UnitId) -> Result<(&Unit, MapLocation), ActionError> {
        let unit = self.units.get(id).map_err(|_| ActionError::UnknownUnit(id))?;
        let location = unit.location().ok_or(ActionError::NotSpawned(id))?;
        if !self.is_running() {
            return Err(ActionError::MatchOver);
        }
        Ok((unit, location))
    }

    /// Distance then on-map check for a targeted action.
    pub(super) fn check_reach(
        &self,
        from: MapLocation,
        target: MapLocation,
        radius_squared: u32,
    ) -> Result<(), ActionError> {
        let distance_squared = from.distance_squared_to(target);
        if distance_squared > radius_squared {
            return Err(ActionError::OutOfRange {
                distance_squared,
                radius_squared,
            });
        }
        if !self.grid.on_map(target) {
            return Err(ActionError::OffMap(target));
        }
        Ok(())
    }

    /// Check an action without applying it.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate(&self, id: UnitId, action: &Action) -> Result<(), ActionError> {
        let (unit, at) = self.actor(id)?;
        match *action {
            Action::Move(dir) => self.validate_move(unit, at, dir),
            Action::BuildRobot {
                unit_type,
                location,
            } => self.validate_build_robot(unit, at, unit_type, location),
            Action::Mark { location, .. } => self.validate_mark(unit, at, location, false),
            Action::RemoveMark { location } => self.validate_mark(unit, at, location, true),
            Action::MarkTowerPattern {
                unit_type,
                location,
                ..
            } => self.validate_mark_tower_pattern(unit, at, unit_type, location),
            Action::MarkResourcePattern { location, .. } => {
                self.validate_mark_resource_pattern(unit, at, location)
            }
            Action::CompleteTowerPattern {
                unit_type,
                location,
            } => self.validate_complete_tower_pattern(unit, at, unit_type, location),
            Action::CompleteResourcePattern { location } => {
                self.validate_complete_resource_pattern(unit, at, location)
            }
            Action::UpgradeTower { location } => self.validate_upgrade(unit, at, location),
            Action::Attack { target, .. } => self.validate_attack(unit, at, target),
            Action::MopSwing(dir) => Self::validate_mop_swing(unit, dir),
            Action::Heal { location } => self.validate_heal(unit, at, location),
            Action::TransferPaint { location, amount } => {
                self.validate_transfer(unit, at, location, amount)
            }
            Action::SendMessage { location, .. } => self.validate_message(unit, at, location),
            Action::WriteSharedArray { index, value } => Self::validate_shared_write(index, value),
            Action::Resign => Ok(()),
        }
    }

    /// Whether [`World::perform`] would accept the action.
    #[must_use]
    pub fn can(&self, id: UnitId, action: &Action) -> bool {
        self.validate(id, action).is_ok()
    }

    /// Validate and apply an action.
    ///
    /// # Errors
    ///
    /// [`PerformError::Rejected`] if validation fails (nothing changed);
    /// [`PerformError::Fatal`] if applying hit an inconsistency.
    pub fn perform(&mut self, id: UnitId, action: &Action) -> Result<(), PerformError> {
        if let Err(reason) = self.validate(id, action) {
            debug!(unit = id.0, ?action, %reason, "action rejected");
            return Err(PerformError::Rejected(reason));
        }
        self.apply(id, action)?;
        Ok(())
    }

    fn apply(&mut self, id: UnitId, action: &Action) -> GameResult<()> {
        match *action {
            Action::Move(dir) => self.apply_move(id, dir),
            Action::BuildRobot {
                unit_type,
                location,
            } => self.apply_build_robot(id, unit_type, location),
            Action::Mark { location, color } => self.apply_mark(id, location, Some(color)),
            Action::RemoveMark { location } => self.apply_mark(id, location, None),
            Action::MarkTowerPattern {
                unit_type,
                location,
                symmetry,
            } => self.apply_mark_tower_pattern(id, unit_type, location, symmetry),
            Action::MarkResourcePattern { location, symmetry } => {
                self.apply_mark_resource_pattern(id, location, symmetry)
            }
            Action::CompleteTowerPattern {
                unit_type,
                location,
            } => self.apply_complete_tower_pattern(id, unit_type, location),
            Action::CompleteResourcePattern { location } => {
                self.apply_complete_resource_pattern(id, location)
            }
            Action::UpgradeTower { location } => self.apply_upgrade(id, location),
            Action::Attack { target, color } => self.apply_attack(id, target, color),
            Action::MopSwing(dir) => self.apply_mop_swing(id, dir),
            Action::Heal { location } => self.apply_heal(id, location),
            Action::TransferPaint { location, amount } => {
                self.apply_transfer(id, location, amount)
            }
            Action::SendMessage { location, content } => {
                self.apply_message(id, location, content)
            }
            Action::WriteSharedArray { index, value } => {
                self.apply_shared_write(id, index, value)
            }
            Action::Resign => self.apply_resign(id),
        }
    }

    fn apply_resign(&mut self, id: UnitId) -> GameResult<()> {
        let team = self.units.get(id)?.team();
        let own: Vec<UnitId> = self.units.iter_team(team).map(Unit::id).collect();
        for unit in own {
            self.destroy_unit(unit)?;
        }
        self.push_event(ActionEvent::Resign { team });
        self.declare_winner(team.opponent(), crate::game::WinReason::Resignation);
        Ok(())
    }
}
