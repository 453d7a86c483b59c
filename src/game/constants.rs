//! Fixed game constants.
//!
//! Radii are squared Euclidean distances. Cooldowns are in cooldown units;
//! a unit may act while its counter is below [`COOLDOWN_LIMIT`] and every
//! round removes [`COOLDOWNS_PER_TURN`] units.

// Map

/// Minimum map width and height.
pub const MAP_MIN_SIZE: i32 = 20;
/// Maximum map width and height.
pub const MAP_MAX_SIZE: i32 = 60;
/// Minimum squared distance between two ruins.
pub const MIN_RUIN_SPACING_SQUARED: u32 = 25;
/// Seed used when a map does not provide one.
pub const GAME_DEFAULT_SEED: u64 = 6370;
/// Upper bound on the round limit of a map.
pub const GAME_MAX_NUMBER_OF_ROUNDS: u32 = 2000;

// Execution

/// Execution cost a unit may report in one round; larger reports are clamped.
pub const EXECUTION_BUDGET: u32 = 25_000;
/// Execution cost charged to a unit whose decision step faulted.
pub const EXCEPTION_EXECUTION_PENALTY: u32 = 500;
/// Maximum length of an indicator string, in characters.
pub const INDICATOR_STRING_MAX_LENGTH: usize = 64;

// Team

/// Number of slots in each team's shared array.
pub const SHARED_ARRAY_LENGTH: usize = 64;
/// Largest value a shared array slot may hold.
pub const MAX_SHARED_ARRAY_VALUE: i32 = (1 << 16) - 1;
/// Percentage of paintable cells a team must own to win outright.
pub const PAINT_PERCENT_TO_WIN: u32 = 70;
/// Maximum number of towers a team may own.
pub const MAX_NUMBER_OF_TOWERS: u32 = 25;
/// Money granted to each team on the first round.
pub const INITIAL_MONEY: u32 = 400;
/// Money every team earns at the end of each round.
pub const PASSIVE_MONEY_INCREASE: u32 = 10;
/// Extra money per round for every active resource pattern.
pub const RESOURCE_PATTERN_MONEY_BONUS: u32 = 3;
/// Interval, in rounds, between global upgrade points.
pub const GLOBAL_UPGRADE_ROUNDS: u32 = 600;
/// Paint held by towers placed at match start.
pub const INITIAL_TOWER_PAINT: u32 = 500;

// Patterns

/// Side length of a construction pattern.
pub const PATTERN_SIZE: i32 = 5;
/// Paint spent to mark a tower or resource pattern.
pub const MARK_PATTERN_PAINT_COST: u32 = 5;

// Radii

/// How far a unit can sense.
pub const VISION_RADIUS_SQUARED: u32 = 20;
/// How far from itself a tower may place a new robot.
pub const BUILD_ROBOT_RADIUS_SQUARED: u32 = 4;
/// How far a robot may reach to mark or complete a tower pattern.
pub const BUILD_TOWER_RADIUS_SQUARED: u32 = 2;
/// How far a robot may reach to mark or complete a resource pattern.
pub const RESOURCE_PATTERN_RADIUS_SQUARED: u32 = 2;
/// How far a robot may reach to place or remove a marker.
pub const MARK_RADIUS_SQUARED: u32 = 2;
/// How far a unit may reach to upgrade a tower.
pub const UPGRADE_TOWER_RADIUS_SQUARED: u32 = 2;
/// How far paint may be transferred.
pub const PAINT_TRANSFER_RADIUS_SQUARED: u32 = 2;
/// How far a robot may heal.
pub const HEAL_RADIUS_SQUARED: u32 = 4;
/// How far a message may travel.
pub const MESSAGE_RADIUS_SQUARED: u32 = 20;
/// Area painted around a splasher's target.
pub const SPLASH_RADIUS_SQUARED: u32 = 4;
/// Inner splash area where enemy paint is overwritten.
pub const SPLASH_OVERWRITE_RADIUS_SQUARED: u32 = 2;

// Cooldowns

/// A unit may act only while the relevant cooldown is below this.
pub const COOLDOWN_LIMIT: u32 = 10;
/// Cooldown removed from every unit at the start of each round.
pub const COOLDOWNS_PER_TURN: u32 = 10;
/// Movement cooldown added by one step.
pub const MOVEMENT_COOLDOWN: u32 = 10;
/// Paint percentage below which movement becomes slower.
pub const LOW_PAINT_THRESHOLD_PERCENT: u32 = 50;
/// Extra movement cooldown percentage at zero paint.
pub const LOW_PAINT_PENALTY_INTERCEPT: u32 = 100;
/// Extra movement cooldown percentage removed per percent of paint held.
pub const LOW_PAINT_PENALTY_SLOPE: u32 = 2;
/// Action cooldown added by building a robot.
pub const BUILD_ROBOT_COOLDOWN: u32 = 10;
/// Action cooldown added by transferring paint.
pub const PAINT_TRANSFER_COOLDOWN: u32 = 10;
/// Action cooldown added by healing.
pub const HEAL_COOLDOWN: u32 = 30;
/// Action cooldown added by a mop swing.
pub const MOP_SWING_COOLDOWN: u32 = 20;

// Effects

/// Paint lost when stepping onto unpainted ground.
pub const PENALTY_NEUTRAL_TERRITORY: u32 = 1;
/// Paint lost when stepping onto, or starting a round on, enemy paint.
pub const PENALTY_ENEMY_TERRITORY: u32 = 2;
/// Damage taken each round by a robot with no paint left.
pub const NO_PAINT_DAMAGE: u32 = 20;
/// Health restored by one heal.
pub const HEAL_AMOUNT: u32 = 80;
/// Paint spent by one heal.
pub const HEAL_PAINT_COST: u32 = 10;
/// Paint drained from each enemy robot hit by a mop swing.
pub const MOP_SWING_PAINT_DRAIN: u32 = 5;
/// Paint drained from an enemy robot by a mopper attack; the mopper keeps half.
pub const MOPPER_PAINT_STEAL: u32 = 10;

// Messaging

/// Payload size of a message in bytes.
pub const MAX_MESSAGE_BYTES: usize = 4;
/// Number of rounds a message stays readable, counting the round it was sent.
pub const MESSAGE_ROUND_DURATION: u32 = 5;
/// Messages a robot may send per round.
pub const MAX_MESSAGES_SENT_ROBOT: u32 = 1;
/// Messages a tower may send per round.
pub const MAX_MESSAGES_SENT_TOWER: u32 = 20;
