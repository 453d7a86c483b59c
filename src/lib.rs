// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! paintfront: a deterministic two-team paint territory game engine for
//! programming competitions.
//!
//! The engine owns the authoritative world, advances it one round at a time,
//! validates every action a unit attempts, applies its effects, resolves the
//! winner and emits a replay event stream. Unit decisions come from an
//! external [`DecisionProvider`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Tournament Runner            │
//! ├─────────────────────────────────────┤
//! │   Round Scheduler  →  Event Sink    │
//! ├─────────────────────────────────────┤
//! │   World (grid, units, ledger)       │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod replay;
pub mod scheduler;
pub mod tournament;

pub use error::{ActionError, GameError, GameResult, PerformError};

// Re-export key types at crate root for convenience
pub use game::{
    Action, Direction, MapBuilder, MapLocation, MapSpec, Paint, PaintColor, Team, UnitId,
    UnitType, WinReason, World,
};
pub use replay::{Event, EventSink, JsonLinesSink, NullSink, VecSink};
pub use scheduler::{Decision, DecisionProvider, Match, MatchConfig, RoundOutcome, UnitView};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let spec = MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .build();
        let world = World::new(&spec).unwrap();
        assert_eq!(world.units().len(), 2);
        let debug = format!("{:?}", Action::Move(Direction::North));
        assert!(debug.contains("North"));
    }
}
