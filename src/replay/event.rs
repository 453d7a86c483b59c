//! Replay event model.

use serde::{Deserialize, Serialize};

use crate::game::{
    Direction, MapLocation, Paint, PaintColor, PatternSet, Team, TeamSnapshot, UnitId, UnitType,
    WinReason,
};

/// One entry in the replay stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    /// Emitted once before the first round.
    MatchHeader(MatchHeader),
    /// Emitted once per completed round.
    Round(RoundRecord),
    /// Emitted once after the last round.
    MatchFooter(MatchFooter),
}

/// Static map data and the units present at the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHeader {
    /// Map name.
    pub map_name: String,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
    /// Map seed.
    pub seed: u64,
    /// Round limit.
    pub rounds: u32,
    /// Wall cells.
    pub walls: Vec<MapLocation>,
    /// Ruin cells.
    pub ruins: Vec<MapLocation>,
    /// Templates in force.
    pub patterns: PatternSet,
    /// Units present before round 1.
    pub spawns: Vec<SpawnRecord>,
}

/// A unit entering the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    /// New unit.
    pub unit: UnitId,
    /// Owner.
    pub team: Team,
    /// Type.
    pub unit_type: UnitType,
    /// Where it appeared.
    pub location: MapLocation,
    /// Starting health.
    pub health: u32,
    /// Starting paint.
    pub paint: u32,
}

/// Everything that happened in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number, starting at 1.
    pub round: u32,
    /// End-of-round team state.
    pub teams: [TeamSnapshot; 2],
    /// Events not attributable to one unit's turn.
    pub round_events: Vec<ActionEvent>,
    /// Per-unit turns in execution order.
    pub turns: Vec<TurnRecord>,
    /// Units destroyed this round, in order of death.
    pub died: Vec<UnitId>,
}

/// One unit's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Acting unit.
    pub unit: UnitId,
    /// Effects of its actions, in order.
    pub actions: Vec<ActionEvent>,
    /// Health after the turn.
    pub health: u32,
    /// Paint after the turn.
    pub paint: u32,
    /// Movement cooldown after the turn.
    pub movement_cooldown: u32,
    /// Action cooldown after the turn.
    pub action_cooldown: u32,
    /// Execution cost reported for the turn.
    pub execution_cost: u32,
    /// Location after the turn; `None` if the unit died.
    pub location: Option<MapLocation>,
}

/// Execution totals for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamProfile {
    /// Sum of execution costs over the match.
    pub total_execution_cost: u64,
    /// Units destroyed for terminating abnormally.
    pub faulted_units: u32,
}

/// Final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFooter {
    /// Winning team.
    pub winner: Team,
    /// How the match was decided.
    pub reason: WinReason,
    /// Rounds played.
    pub rounds: u32,
    /// Per-team execution profile, indexed by [`Team::index`].
    pub profiles: [TeamProfile; 2],
}

/// A single observable effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionEvent {
    /// A robot moved.
    Move {
        /// Mover.
        unit: UnitId,
        /// Origin.
        from: MapLocation,
        /// Destination.
        to: MapLocation,
    },
    /// A unit lost health.
    Damage {
        /// Damaged unit.
        target: UnitId,
        /// Health removed.
        amount: u32,
    },
    /// A cell was painted.
    Paint {
        /// Cell.
        location: MapLocation,
        /// New paint.
        paint: Paint,
    },
    /// A cell's paint was removed.
    Unpaint {
        /// Cell.
        location: MapLocation,
    },
    /// A unit attacked; `target` is `None` for a tower area attack.
    Attack {
        /// Attacker.
        unit: UnitId,
        /// Target cell.
        target: Option<MapLocation>,
    },
    /// A mopper drained an enemy robot.
    Mop {
        /// Mopper.
        unit: UnitId,
        /// Drained robot.
        target: UnitId,
        /// Paint removed.
        amount: u32,
    },
    /// A mopper swung.
    MopSwing {
        /// Mopper.
        unit: UnitId,
        /// Swing direction.
        direction: Direction,
    },
    /// A robot healed an ally.
    Heal {
        /// Healer.
        unit: UnitId,
        /// Healed robot.
        target: UnitId,
        /// Health restored.
        amount: u32,
    },
    /// A unit built another.
    Build {
        /// Builder.
        unit: UnitId,
        /// Built unit.
        built: UnitId,
        /// Built type.
        unit_type: UnitType,
    },
    /// A unit appeared.
    Spawn(SpawnRecord),
    /// Paint moved between two units; positive means `unit` gave.
    Transfer {
        /// Initiator.
        unit: UnitId,
        /// Counterpart.
        target: UnitId,
        /// Signed amount.
        amount: i32,
    },
    /// A message was delivered.
    Message {
        /// Sender.
        unit: UnitId,
        /// Receiver.
        target: UnitId,
        /// Payload.
        content: u32,
    },
    /// A tower was upgraded.
    Upgrade {
        /// Initiator.
        unit: UnitId,
        /// Upgraded tower.
        target: UnitId,
        /// Type after the upgrade.
        new_type: UnitType,
    },
    /// A marker was placed.
    Mark {
        /// Marking robot.
        unit: UnitId,
        /// Cell.
        location: MapLocation,
        /// Marker color.
        color: PaintColor,
    },
    /// A marker was removed.
    Unmark {
        /// Robot.
        unit: UnitId,
        /// Cell.
        location: MapLocation,
    },
    /// A resource pattern became active.
    ResourcePatternCompleted {
        /// Completing robot.
        unit: UnitId,
        /// Pattern center.
        center: MapLocation,
    },
    /// An active resource pattern stopped matching.
    ResourcePatternLost {
        /// Former owner.
        team: Team,
        /// Pattern center.
        center: MapLocation,
    },
    /// A shared array slot was written.
    SharedArrayWrite {
        /// Writer.
        unit: UnitId,
        /// Slot.
        index: usize,
        /// Value.
        value: u16,
    },
    /// A team resigned.
    Resign {
        /// Resigning team.
        team: Team,
    },
    /// A unit's decision step terminated abnormally and the unit was removed.
    DieException {
        /// Removed unit.
        unit: UnitId,
    },
    /// Debug text attached to a unit.
    IndicatorString {
        /// Annotated unit.
        unit: UnitId,
        /// Text, at most 64 characters.
        text: String,
    },
    /// Debug dot.
    IndicatorDot {
        /// Annotated unit.
        unit: UnitId,
        /// Cell.
        location: MapLocation,
        /// RGB color.
        color: [u8; 3],
    },
    /// Debug line.
    IndicatorLine {
        /// Annotated unit.
        unit: UnitId,
        /// Start.
        from: MapLocation,
        /// End.
        to: MapLocation,
        /// RGB color.
        color: [u8; 3],
    },
}
