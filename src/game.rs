//! Game layer for paintfront.
//!
//! Implements the paint rules on top of a fixed grid:
//! - Grid of cells with walls, ruins, paint and markers
//! - Units (robots and towers) kept in an id-ordered registry
//! - Team ledger (money, painted area, shared array, towers)
//! - Action validation and effects
//! - 5x5 construction patterns under eight symmetries
//! - Win resolution and tie-breaks

pub mod constants;
pub mod invariants;
pub mod rng;

mod actions;
mod combat;
mod construction;
mod location;
mod map;
mod map_spec;
mod messaging;
mod movement;
mod paint;
mod pattern;
mod registry;
mod support;
mod team;
mod unit;
mod unit_type;
mod win;
mod world;

pub use actions::Action;
pub use combat::mop_swing_cells;
pub use location::{Direction, MapLocation};
pub use map::{Cell, Grid};
pub use map_spec::{InitialTower, MapBuilder, MapError, MapSpec};
pub use messaging::{Message, message_quota};
pub use movement::movement_cooldown_for;
pub use paint::{Paint, PaintColor, PaintType};
pub use pattern::{Pattern, PatternSet, Symmetry, check_pattern, is_valid_center};
pub use registry::{LookupError, UnitRegistry};
pub use team::{LedgerError, Team, TeamLedger, TeamSnapshot};
pub use unit::{Unit, UnitId};
pub use unit_type::{TowerKind, UnitProfile, UnitType};
pub use win::WinReason;
pub use world::{Outcome, PatternSite, World};
