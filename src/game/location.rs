//! Map locations and compass directions.

use serde::{Deserialize, Serialize};

/// A cell position. Coordinates may be off the map; use
/// [`Grid::on_map`](crate::game::Grid::on_map) before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapLocation {
    /// Column.
    pub x: i32,
    /// Row; north is increasing `y`.
    pub y: i32,
}

impl MapLocation {
    /// Create a new location.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another location, saturating at
    /// `u32::MAX` for far-apart coordinates.
    #[must_use]
    pub fn distance_squared_to(self, other: Self) -> u32 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        u32::try_from(dx * dx + dy * dy).unwrap_or(u32::MAX)
    }

    /// Whether `other` lies within the given squared radius.
    #[must_use]
    pub fn is_within_distance_squared(self, other: Self, radius_squared: u32) -> bool {
        self.distance_squared_to(other) <= radius_squared
    }

    /// The neighbouring location in `dir`.
    #[must_use]
    pub const fn add(self, dir: Direction) -> Self {
        self.translate(dir.dx(), dir.dy())
    }

    /// Shift by an arbitrary offset.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The compass direction that best approximates the way to `target`.
    #[must_use]
    pub const fn direction_to(self, target: Self) -> Direction {
        Direction::from_delta(
            target.x.saturating_sub(self.x).signum(),
            target.y.saturating_sub(self.y).signum(),
        )
    }
}

impl std::fmt::Display for MapLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass directions, or no movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// +y.
    North,
    /// +x, +y.
    NorthEast,
    /// +x.
    East,
    /// +x, -y.
    SouthEast,
    /// -y.
    South,
    /// -x, -y.
    SouthWest,
    /// -x.
    West,
    /// -x, +y.
    NorthWest,
    /// No offset.
    Center,
}

impl Direction {
    /// The eight directions a unit can step in, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four axis-aligned directions.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Horizontal component.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::NorthEast | Direction::East | Direction::SouthEast => 1,
            Direction::SouthWest | Direction::West | Direction::NorthWest => -1,
            Direction::North | Direction::South | Direction::Center => 0,
        }
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(self) -> i32 {
        match self {
            Direction::North | Direction::NorthEast | Direction::NorthWest => 1,
            Direction::South | Direction::SouthEast | Direction::SouthWest => -1,
            Direction::East | Direction::West | Direction::Center => 0,
        }
    }

    /// Direction for a unit offset; anything else maps to `Center`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx, dy) {
            (0, 1) => Direction::North,
            (1, 1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, -1) => Direction::SouthEast,
            (0, -1) => Direction::South,
            (-1, -1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, 1) => Direction::NorthWest,
            _ => Direction::Center,
        }
    }

    /// Whether this is north, east, south or west.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// The reverse direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_delta(-self.dx(), -self.dy())
    }

    /// Rotate 45 degrees counter-clockwise.
    #[must_use]
    pub const fn rotate_left(self) -> Self {
        match self {
            Direction::North => Direction::NorthWest,
            Direction::NorthWest => Direction::West,
            Direction::West => Direction::SouthWest,
            Direction::SouthWest => Direction::South,
            Direction::South => Direction::SouthEast,
            Direction::SouthEast => Direction::East,
            Direction::East => Direction::NorthEast,
            Direction::NorthEast => Direction::North,
            Direction::Center => Direction::Center,
        }
    }

    /// Rotate 45 degrees clockwise.
    #[must_use]
    pub const fn rotate_right(self) -> Self {
        match self {
            Direction::North => Direction::NorthEast,
            Direction::NorthEast => Direction::East,
            Direction::East => Direction::SouthEast,
            Direction::SouthEast => Direction::South,
            Direction::South => Direction::SouthWest,
            Direction::SouthWest => Direction::West,
            Direction::West => Direction::NorthWest,
            Direction::NorthWest => Direction::North,
            Direction::Center => Direction::Center,
        }
    }
}
