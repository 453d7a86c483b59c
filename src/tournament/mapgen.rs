//! Deterministic map generation for tournaments, tests and benchmarks.
//!
//! Generated maps are symmetric under a 180-degree rotation so neither team
//! starts with an advantage.

use crate::game::constants::{
    GAME_MAX_NUMBER_OF_ROUNDS, MAP_MAX_SIZE, MAP_MIN_SIZE, MIN_RUIN_SPACING_SQUARED,
};
use crate::game::rng::Rng;
use crate::game::{InitialTower, MapBuilder, MapLocation, MapSpec, Team, UnitType};

/// Ruin pairs attempted per map.
const RUIN_PAIRS: u32 = 4;
/// Placement attempts before giving up on a ruin pair.
const RUIN_ATTEMPTS: u32 = 200;
/// Walls stay this far (squared) from every ruin.
const WALL_CLEARANCE_SQUARED: u32 = 8;

/// Error type for map generation.
#[derive(Debug, Clone)]
pub struct MapGenError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for MapGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Map generation error: {}", self.reason)
    }
}

impl std::error::Error for MapGenError {}

/// Generate a symmetric map.
///
/// Each team starts with a level-one paint tower and a level-one money
/// tower on ruins; the remaining ruins are free to build on.
///
/// # Arguments
///
/// * `seed` - Random seed for deterministic generation; also the map seed
/// * `width` - Map width in cells
/// * `height` - Map height in cells
///
/// # Errors
///
/// Returns an error if dimensions are invalid or the ruins cannot be placed.
pub fn generate_map(seed: u64, width: i32, height: i32) -> Result<MapSpec, MapGenError> {
    let size_ok = |v: i32| (MAP_MIN_SIZE..=MAP_MAX_SIZE).contains(&v);
    if !size_ok(width) || !size_ok(height) {
        return Err(MapGenError {
            reason: format!("Invalid map dimensions {width}x{height}"),
        });
    }

    let mut rng = Rng::new(seed);
    let mirror = |loc: MapLocation| MapLocation::new(width - 1 - loc.x, height - 1 - loc.y);

    let ruins = place_ruins(&mut rng, width, height, mirror)?;
    let walls = place_walls(&mut rng, width, height, &ruins, mirror);

    // Ruins come in (own, mirrored) pairs; the first two pairs are home bases.
    let mut towers = Vec::with_capacity(4);
    for (pair, unit_type) in [UnitType::LevelOnePaintTower, UnitType::LevelOneMoneyTower]
        .into_iter()
        .enumerate()
    {
        let own = ruins[pair * 2];
        towers.push(InitialTower {
            team: Team::A,
            unit_type,
            location: own,
        });
        towers.push(InitialTower {
            team: Team::B,
            unit_type,
            location: mirror(own),
        });
    }

    let mut builder = MapBuilder::new(width, height)
        .name(&format!("generated-{seed}"))
        .seed(seed)
        .rounds(GAME_MAX_NUMBER_OF_ROUNDS);
    for ruin in &ruins {
        builder = builder.ruin(ruin.x, ruin.y);
    }
    for wall in &walls {
        builder = builder.wall(wall.x, wall.y);
    }
    for tower in &towers {
        builder = builder.tower(tower.team, tower.unit_type, tower.location.x, tower.location.y);
    }
    let spec = builder.build();
    spec.validate().map_err(|e| MapGenError {
        reason: e.to_string(),
    })?;
    Ok(spec)
}

/// Random location at least two cells from every edge, in team A's half.
fn random_home_cell(rng: &mut Rng, width: i32, height: i32) -> MapLocation {
    let span = |v: i32| u32::try_from(v - 4).unwrap_or(1);
    let x = 2 + i32::try_from(rng.next_u32(span(width))).unwrap_or(0);
    let half_height = (height / 2 - 2).max(1);
    let y = 2 + i32::try_from(rng.next_u32(span(half_height + 4))).unwrap_or(0);
    MapLocation::new(x, y)
}

fn place_ruins(
    rng: &mut Rng,
    width: i32,
    height: i32,
    mirror: impl Fn(MapLocation) -> MapLocation,
) -> Result<Vec<MapLocation>, MapGenError> {
    let mut ruins: Vec<MapLocation> = Vec::new();
    for pair in 0..RUIN_PAIRS {
        let spaced = |loc: MapLocation, ruins: &[MapLocation]| {
            ruins
                .iter()
                .all(|r| r.distance_squared_to(loc) >= MIN_RUIN_SPACING_SQUARED)
        };
        let found = (0..RUIN_ATTEMPTS)
            .map(|_| random_home_cell(rng, width, height))
            .find(|&loc| {
                let twin = mirror(loc);
                loc.distance_squared_to(twin) >= MIN_RUIN_SPACING_SQUARED
                    && spaced(loc, &ruins)
                    && spaced(twin, &ruins)
            });
        match found {
            Some(loc) => {
                ruins.push(loc);
                ruins.push(mirror(loc));
            }
            // The two home-base pairs are required; extra ruins are optional.
            None if pair < 2 => {
                return Err(MapGenError {
                    reason: format!("Failed to place ruin pair {pair}"),
                });
            }
            None => break,
        }
    }
    Ok(ruins)
}

/// Scatter short wall segments, mirrored, away from the ruins.
fn place_walls(
    rng: &mut Rng,
    width: i32,
    height: i32,
    ruins: &[MapLocation],
    mirror: impl Fn(MapLocation) -> MapLocation,
) -> Vec<MapLocation> {
    let mut walls = Vec::new();
    let segments = u32::try_from(width * height / 80).unwrap_or(0);
    for _ in 0..segments {
        let start = MapLocation::new(
            i32::try_from(rng.next_u32(u32::try_from(width).unwrap_or(1))).unwrap_or(0),
            i32::try_from(rng.next_u32(u32::try_from(height).unwrap_or(1))).unwrap_or(0),
        );
        let horizontal = rng.next_bool();
        let length = 2 + rng.next_u32(3);
        for step in 0..i32::try_from(length).unwrap_or(0) {
            let cell = if horizontal {
                start.translate(step, 0)
            } else {
                start.translate(0, step)
            };
            for loc in [cell, mirror(cell)] {
                let on_map = loc.x >= 0 && loc.y >= 0 && loc.x < width && loc.y < height;
                let clear = ruins
                    .iter()
                    .all(|r| r.distance_squared_to(loc) > WALL_CLEARANCE_SQUARED);
                if on_map && clear && !walls.contains(&loc) {
                    walls.push(loc);
                }
            }
        }
    }
    walls
}
