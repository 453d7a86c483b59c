//! Error types for the game engine.
//!
//! Two tiers: [`ActionError`] explains why a single unit action was refused
//! and never ends the match; [`GameError`] is fatal to the match it came from.

use std::fmt;

use crate::game::{LedgerError, LookupError, MapError, MapLocation, UnitId, UnitType};
use crate::replay::SinkError;

/// Why an action was rejected. A rejected action changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// The acting unit does not exist.
    UnknownUnit(UnitId),
    /// The acting unit is not on the map.
    NotSpawned(UnitId),
    /// The relevant cooldown is at or above the limit.
    NotReady,
    /// Target is farther than the action allows.
    OutOfRange {
        /// Squared distance to the target.
        distance_squared: u32,
        /// Squared reach of the action.
        radius_squared: u32,
    },
    /// Target location is off the map.
    OffMap(MapLocation),
    /// Another unit stands on the target.
    Occupied(MapLocation),
    /// Target is a wall or a ruin.
    Impassable(MapLocation),
    /// The unit type involved cannot do this.
    WrongUnitType(UnitType),
    /// Target belongs to the other team.
    WrongTeam,
    /// No unit at the target location.
    NoUnitAtTarget(MapLocation),
    /// Not enough paint.
    InsufficientPaint {
        /// Paint required.
        needed: u32,
        /// Paint held.
        available: u32,
    },
    /// Not enough team money.
    InsufficientMoney {
        /// Money required.
        needed: u32,
        /// Money held.
        available: u32,
    },
    /// Receiver cannot hold the paint.
    CapacityExceeded,
    /// Target is not a ruin.
    NotARuin(MapLocation),
    /// Target is too close to the edge for a 5x5 pattern.
    InvalidPatternCenter(MapLocation),
    /// The painted cells do not form the pattern.
    PatternMismatch,
    /// A tower already stands on the ruin.
    TowerAlreadyPresent(MapLocation),
    /// The team owns the maximum number of towers.
    TowerLimitReached,
    /// The tower is at its top level.
    NotUpgradable,
    /// No marker of the team at the target.
    NoMarker(MapLocation),
    /// The message quota for this round is used up.
    QuotaExhausted,
    /// No painted path between sender and receiver.
    NotConnected,
    /// The tower already made this kind of attack this round.
    AlreadyAttacked,
    /// An argument is malformed.
    InvalidArgument(&'static str),
    /// The match has already been decided.
    MatchOver,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownUnit(id) => write!(f, "unit {id} does not exist"),
            ActionError::NotSpawned(id) => write!(f, "unit {id} is not on the map"),
            ActionError::NotReady => write!(f, "cooldown not ready"),
            ActionError::OutOfRange {
                distance_squared,
                radius_squared,
            } => write!(
                f,
                "target at distance² {distance_squared} exceeds reach {radius_squared}"
            ),
            ActionError::OffMap(loc) => write!(f, "{loc} is off the map"),
            ActionError::Occupied(loc) => write!(f, "{loc} is occupied"),
            ActionError::Impassable(loc) => write!(f, "{loc} is not passable"),
            ActionError::WrongUnitType(ty) => write!(f, "{ty:?} cannot do that"),
            ActionError::WrongTeam => write!(f, "target belongs to the wrong team"),
            ActionError::NoUnitAtTarget(loc) => write!(f, "no unit at {loc}"),
            ActionError::InsufficientPaint { needed, available } => {
                write!(f, "need {needed} paint, have {available}")
            }
            ActionError::InsufficientMoney { needed, available } => {
                write!(f, "need {needed} money, have {available}")
            }
            ActionError::CapacityExceeded => write!(f, "receiver paint capacity exceeded"),
            ActionError::NotARuin(loc) => write!(f, "{loc} is not a ruin"),
            ActionError::InvalidPatternCenter(loc) => {
                write!(f, "{loc} is too close to the edge for a pattern")
            }
            ActionError::PatternMismatch => write!(f, "pattern not complete"),
            ActionError::TowerAlreadyPresent(loc) => write!(f, "a tower already stands at {loc}"),
            ActionError::TowerLimitReached => write!(f, "tower limit reached"),
            ActionError::NotUpgradable => write!(f, "tower cannot be upgraded"),
            ActionError::NoMarker(loc) => write!(f, "no marker at {loc}"),
            ActionError::QuotaExhausted => write!(f, "message quota exhausted"),
            ActionError::NotConnected => write!(f, "no painted path to the receiver"),
            ActionError::AlreadyAttacked => write!(f, "already attacked this round"),
            ActionError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            ActionError::MatchOver => write!(f, "match is over"),
        }
    }
}

impl std::error::Error for ActionError {}

/// An error that aborts the match.
#[derive(Debug)]
pub enum GameError {
    /// The ledger refused a mutation that validation had allowed.
    Ledger(LedgerError),
    /// The invariant checker found inconsistent state.
    Invariant(String),
    /// A unit that must exist was missing.
    UnknownUnit(LookupError),
    /// The event sink failed.
    Sink(SinkError),
    /// The map could not be loaded.
    Map(MapError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Ledger(e) => write!(f, "ledger error: {e}"),
            GameError::Invariant(msg) => write!(f, "invariant violated: {msg}"),
            GameError::UnknownUnit(e) => write!(f, "lookup failed: {e}"),
            GameError::Sink(e) => write!(f, "event sink failed: {e}"),
            GameError::Map(e) => write!(f, "bad map: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Ledger(e) => Some(e),
            GameError::UnknownUnit(e) => Some(e),
            GameError::Sink(e) => Some(e),
            GameError::Map(e) => Some(e),
            GameError::Invariant(_) => None,
        }
    }
}

impl From<LedgerError> for GameError {
    fn from(e: LedgerError) -> Self {
        GameError::Ledger(e)
    }
}

impl From<LookupError> for GameError {
    fn from(e: LookupError) -> Self {
        GameError::UnknownUnit(e)
    }
}

impl From<SinkError> for GameError {
    fn from(e: SinkError) -> Self {
        GameError::Sink(e)
    }
}

impl From<MapError> for GameError {
    fn from(e: MapError) -> Self {
        GameError::Map(e)
    }
}

/// Outcome of a failed [`World::perform`](crate::game::World::perform).
#[derive(Debug)]
pub enum PerformError {
    /// The action was refused; nothing changed.
    Rejected(ActionError),
    /// Applying the action hit a fatal error.
    Fatal(GameError),
}

impl fmt::Display for PerformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformError::Rejected(e) => write!(f, "rejected: {e}"),
            PerformError::Fatal(e) => write!(f, "fatal: {e}"),
        }
    }
}

impl std::error::Error for PerformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PerformError::Rejected(e) => Some(e),
            PerformError::Fatal(e) => Some(e),
        }
    }
}

impl From<ActionError> for PerformError {
    fn from(e: ActionError) -> Self {
        PerformError::Rejected(e)
    }
}

impl From<GameError> for PerformError {
    fn from(e: GameError) -> Self {
        PerformError::Fatal(e)
    }
}

impl From<LedgerError> for PerformError {
    fn from(e: LedgerError) -> Self {
        PerformError::Fatal(GameError::Ledger(e))
    }
}

impl From<LookupError> for PerformError {
    fn from(e: LookupError) -> Self {
        PerformError::Fatal(GameError::UnknownUnit(e))
    }
}

/// Result type for fatal game operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::InsufficientPaint {
            needed: 5,
            available: 2,
        };
        assert_eq!(err.to_string(), "need 5 paint, have 2");
        assert_eq!(ActionError::MatchOver.to_string(), "match is over");
    }

    #[test]
    fn test_game_error_source() {
        let err = GameError::from(LookupError::NotFound(UnitId(3)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&GameError::Invariant(String::new())).is_none());
    }
}
