//! Map descriptions as produced by a map loader.

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    GAME_DEFAULT_SEED, GAME_MAX_NUMBER_OF_ROUNDS, MAP_MAX_SIZE, MAP_MIN_SIZE,
    MIN_RUIN_SPACING_SQUARED,
};
use crate::game::{MapLocation, PatternSet, Team, UnitType};

/// A tower present when the match starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialTower {
    /// Owner.
    pub team: Team,
    /// Tower type.
    pub unit_type: UnitType,
    /// Ruin the tower stands on.
    pub location: MapLocation,
}

/// A complete map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSpec {
    /// Display name.
    pub name: String,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
    /// Seed for the coin-flip tie-break.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Round limit.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Wall cells.
    #[serde(default)]
    pub walls: Vec<MapLocation>,
    /// Ruin cells.
    #[serde(default)]
    pub ruins: Vec<MapLocation>,
    /// Towers placed at the start.
    #[serde(default)]
    pub towers: Vec<InitialTower>,
    /// Templates in force.
    #[serde(default)]
    pub patterns: PatternSet,
}

const fn default_seed() -> u64 {
    GAME_DEFAULT_SEED
}

const fn default_rounds() -> u32 {
    GAME_MAX_NUMBER_OF_ROUNDS
}

/// Why a map was rejected.
#[derive(Debug)]
pub enum MapError {
    /// Width or height outside the allowed range.
    BadDimensions {
        /// Width given.
        width: i32,
        /// Height given.
        height: i32,
    },
    /// Round limit outside `1..=2000`.
    BadRoundLimit(u32),
    /// A listed location is off the map.
    OffMap(MapLocation),
    /// A cell is both wall and ruin.
    WallOnRuin(MapLocation),
    /// Two ruins are too close.
    RuinsTooClose(MapLocation, MapLocation),
    /// An initial tower is not on a ruin.
    TowerNotOnRuin(MapLocation),
    /// Two towers share a ruin.
    DuplicateTower(MapLocation),
    /// An initial unit is not a tower.
    NotATower(UnitType),
    /// JSON could not be parsed.
    Parse(serde_json::Error),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::BadDimensions { width, height } => write!(
                f,
                "map size {width}x{height} outside {MAP_MIN_SIZE}..={MAP_MAX_SIZE}"
            ),
            MapError::BadRoundLimit(rounds) => write!(f, "round limit {rounds} out of range"),
            MapError::OffMap(loc) => write!(f, "location {loc} is off the map"),
            MapError::WallOnRuin(loc) => write!(f, "wall and ruin overlap at {loc}"),
            MapError::RuinsTooClose(a, b) => write!(f, "ruins at {a} and {b} are too close"),
            MapError::TowerNotOnRuin(loc) => write!(f, "tower at {loc} is not on a ruin"),
            MapError::DuplicateTower(loc) => write!(f, "two towers at {loc}"),
            MapError::NotATower(ty) => write!(f, "initial unit {ty:?} is not a tower"),
            MapError::Parse(e) => write!(f, "invalid map json: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl MapSpec {
    /// Parse a map from JSON. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        serde_json::from_str(json).map_err(MapError::Parse)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, MapError> {
        serde_json::to_string(self).map_err(MapError::Parse)
    }

    /// Check dimensions, round limit, ruin spacing and tower placement.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), MapError> {
        let size_ok = |v: i32| (MAP_MIN_SIZE..=MAP_MAX_SIZE).contains(&v);
        if !size_ok(self.width) || !size_ok(self.height) {
            return Err(MapError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(1..=GAME_MAX_NUMBER_OF_ROUNDS).contains(&self.rounds) {
            return Err(MapError::BadRoundLimit(self.rounds));
        }
        let on_map =
            |loc: MapLocation| loc.x >= 0 && loc.y >= 0 && loc.x < self.width && loc.y < self.height;
        for &loc in self.walls.iter().chain(&self.ruins) {
            if !on_map(loc) {
                return Err(MapError::OffMap(loc));
            }
        }
        if let Some(&loc) = self.walls.iter().find(|w| self.ruins.contains(w)) {
            return Err(MapError::WallOnRuin(loc));
        }
        for (i, &a) in self.ruins.iter().enumerate() {
            if let Some(&b) = self.ruins[i + 1..]
                .iter()
                .find(|&&b| a.distance_squared_to(b) < MIN_RUIN_SPACING_SQUARED)
            {
                return Err(MapError::RuinsTooClose(a, b));
            }
        }
        for (i, tower) in self.towers.iter().enumerate() {
            if !tower.unit_type.is_tower() {
                return Err(MapError::NotATower(tower.unit_type));
            }
            if !self.ruins.contains(&tower.location) {
                return Err(MapError::TowerNotOnRuin(tower.location));
            }
            if self.towers[..i].iter().any(|t| t.location == tower.location) {
                return Err(MapError::DuplicateTower(tower.location));
            }
        }
        Ok(())
    }
}

/// Incremental construction of a [`MapSpec`].
#[derive(Debug, Clone)]
pub struct MapBuilder {
    spec: MapSpec,
}

impl MapBuilder {
    /// Start an empty map.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            spec: MapSpec {
                name: String::from("custom"),
                width,
                height,
                seed: GAME_DEFAULT_SEED,
                rounds: GAME_MAX_NUMBER_OF_ROUNDS,
                walls: Vec::new(),
                ruins: Vec::new(),
                towers: Vec::new(),
                patterns: PatternSet::default(),
            },
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.spec.name = name.to_string();
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.spec.seed = seed;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub const fn rounds(mut self, rounds: u32) -> Self {
        self.spec.rounds = rounds;
        self
    }

    /// Add a wall.
    #[must_use]
    pub fn wall(mut self, x: i32, y: i32) -> Self {
        self.spec.walls.push(MapLocation::new(x, y));
        self
    }

    /// Add a ruin.
    #[must_use]
    pub fn ruin(mut self, x: i32, y: i32) -> Self {
        self.spec.ruins.push(MapLocation::new(x, y));
        self
    }

    /// Add a starting tower and the ruin beneath it.
    #[must_use]
    pub fn tower(mut self, team: Team, unit_type: UnitType, x: i32, y: i32) -> Self {
        let location = MapLocation::new(x, y);
        if !self.spec.ruins.contains(&location) {
            self.spec.ruins.push(location);
        }
        self.spec.towers.push(InitialTower {
            team,
            unit_type,
            location,
        });
        self
    }

    /// Override the templates.
    #[must_use]
    pub const fn patterns(mut self, patterns: PatternSet) -> Self {
        self.spec.patterns = patterns;
        self
    }

    /// Finish without validating.
    #[must_use]
    pub fn build(self) -> MapSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MapBuilder {
        MapBuilder::new(20, 20)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
    }

    #[test]
    fn test_valid_map() {
        assert!(base().build().validate().is_ok());
    }

    #[test]
    fn test_bad_dimensions() {
        let spec = MapBuilder::new(19, 30).build();
        assert!(matches!(spec.validate(), Err(MapError::BadDimensions { .. })));
        let spec = MapBuilder::new(20, 61).build();
        assert!(matches!(spec.validate(), Err(MapError::BadDimensions { .. })));
    }

    #[test]
    fn test_bad_rounds() {
        let spec = base().rounds(0).build();
        assert!(matches!(spec.validate(), Err(MapError::BadRoundLimit(0))));
        let spec = base().rounds(2001).build();
        assert!(matches!(spec.validate(), Err(MapError::BadRoundLimit(2001))));
    }

    #[test]
    fn test_ruin_spacing() {
        let spec = base().ruin(6, 5).build();
        assert!(matches!(spec.validate(), Err(MapError::RuinsTooClose(..))));
        let spec = base().ruin(8, 3).build();
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_tower_must_be_on_ruin() {
        let mut spec = base().build();
        spec.towers[0].location = MapLocation::new(10, 10);
        assert!(matches!(spec.validate(), Err(MapError::TowerNotOnRuin(_))));
        let mut spec = base().build();
        spec.towers[0].unit_type = UnitType::Soldier;
        assert!(matches!(spec.validate(), Err(MapError::NotATower(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let spec = base().name("duel").seed(9).build();
        let json = spec.to_json_string().unwrap();
        assert_eq!(MapSpec::from_json_str(&json).unwrap(), spec);
    }

    #[test]
    fn test_json_defaults() {
        let spec = MapSpec::from_json_str(r#"{"name":"tiny","width":20,"height":20}"#).unwrap();
        assert_eq!(spec.seed, GAME_DEFAULT_SEED);
        assert_eq!(spec.rounds, GAME_MAX_NUMBER_OF_ROUNDS);
        assert_eq!(spec.patterns, PatternSet::default());
        assert!(MapSpec::from_json_str("{").is_err());
    }
}
