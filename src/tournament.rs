//! Tournament runner for paintfront matches.
//!
//! Provides a pure function interface: `(map, providers) -> MatchResult`
//!
//! The tournament runner handles:
//! - Building the world from a map
//! - Running a match to completion through the round scheduler
//! - Series of matches over many maps, in parallel with rayon
//! - Deterministic map generation

mod mapgen;

pub use mapgen::{MapGenError, generate_map};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GameError;
use crate::game::{MapSpec, Team, TeamSnapshot, WinReason, World};
use crate::replay::{EventSink, NullSink, TeamProfile};
use crate::scheduler::{DecisionProvider, Match, MatchConfig, TeamProviders};

/// Configuration for a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Settings applied to every match.
    pub match_config: MatchConfig,
    /// Run matches on the rayon thread pool.
    pub parallel: bool,
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Map played.
    pub map_name: String,
    /// Map seed.
    pub seed: u64,
    /// Winning team.
    pub winner: Team,
    /// Deciding rule.
    pub reason: WinReason,
    /// Rounds played.
    pub rounds: u32,
    /// Execution totals per team.
    pub profiles: [TeamProfile; 2],
    /// Team state at the end of the match.
    pub teams: [TeamSnapshot; 2],
}

/// Result of a series of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesResult {
    /// One result per map, in map order.
    pub matches: Vec<MatchResult>,
    /// Matches won by each team.
    pub wins: [u32; 2],
    /// Team with more wins, `None` on a tie.
    pub winner: Option<Team>,
}

/// Error type for tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    /// A series needs at least one map.
    NoMaps,
    /// Map generation failed.
    MapGeneration(MapGenError),
    /// A match aborted.
    Match {
        /// Map being played.
        map: String,
        /// Error details.
        error: GameError,
    },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMaps => write!(f, "Series has no maps"),
            Self::MapGeneration(e) => write!(f, "Map generation failed: {e}"),
            Self::Match { map, error } => write!(f, "Match on map {map} aborted: {error}"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoMaps => None,
            Self::MapGeneration(e) => Some(e),
            Self::Match { error, .. } => Some(error),
        }
    }
}

impl From<MapGenError> for TournamentError {
    fn from(e: MapGenError) -> Self {
        Self::MapGeneration(e)
    }
}

/// Run a complete match on `map`, discarding the event stream.
///
/// # Determinism
///
/// Given the same map and deterministic providers, this function always
/// produces the same `MatchResult`.
///
/// # Errors
///
/// Returns [`TournamentError::Match`] if the map is invalid or the match
/// aborts.
pub fn run_match<A, B>(
    map: &MapSpec,
    team_a: A,
    team_b: B,
    config: &MatchConfig,
) -> Result<MatchResult, TournamentError>
where
    A: DecisionProvider,
    B: DecisionProvider,
{
    run_match_recorded(map, team_a, team_b, NullSink, config).map(|(result, _)| result)
}

/// Run a complete match on `map`, writing every event to `sink`.
///
/// # Errors
///
/// Returns [`TournamentError::Match`] if the map is invalid, the match
/// aborts or the sink fails.
pub fn run_match_recorded<A, B, S>(
    map: &MapSpec,
    team_a: A,
    team_b: B,
    sink: S,
    config: &MatchConfig,
) -> Result<(MatchResult, S), TournamentError>
where
    A: DecisionProvider,
    B: DecisionProvider,
    S: EventSink,
{
    let fail = |error: GameError| TournamentError::Match {
        map: map.name.clone(),
        error,
    };
    let world = World::new(map).map_err(fail)?;
    let providers = TeamProviders::new(team_a, team_b);
    let mut game = Match::new(world, providers, sink, *config);
    let outcome = game.run_to_end().map_err(fail)?;
    let profiles = game.profiles();
    let (mut world, _, sink) = game.into_parts();

    let result = MatchResult {
        map_name: map.name.clone(),
        seed: map.seed,
        winner: outcome.winner,
        reason: outcome.reason,
        rounds: world.round(),
        profiles,
        teams: world.snapshot_teams(),
    };
    Ok((result, sink))
}

/// Run one match per map with fresh providers from `factory`.
///
/// Results come back in map order whether or not the matches ran in
/// parallel.
///
/// # Errors
///
/// Returns [`TournamentError::NoMaps`] for an empty series, or the first
/// failing match in map order.
pub fn run_series<F, A, B>(
    maps: &[MapSpec],
    factory: F,
    config: &TournamentConfig,
) -> Result<SeriesResult, TournamentError>
where
    F: Fn() -> (A, B) + Sync,
    A: DecisionProvider,
    B: DecisionProvider,
{
    if maps.is_empty() {
        return Err(TournamentError::NoMaps);
    }
    let play = |map: &MapSpec| {
        let (team_a, team_b) = factory();
        run_match(map, team_a, team_b, &config.match_config)
    };
    let matches: Vec<MatchResult> = if config.parallel {
        maps.par_iter().map(play).collect::<Result<_, _>>()?
    } else {
        maps.iter().map(play).collect::<Result<_, _>>()?
    };

    let mut wins = [0u32; 2];
    for result in &matches {
        wins[result.winner.index()] += 1;
    }
    let winner = match wins[0].cmp(&wins[1]) {
        std::cmp::Ordering::Greater => Some(Team::A),
        std::cmp::Ordering::Less => Some(Team::B),
        std::cmp::Ordering::Equal => None,
    };
    info!(maps = maps.len(), wins_a = wins[0], wins_b = wins[1], "series finished");
    Ok(SeriesResult {
        matches,
        wins,
        winner,
    })
}

/// Generate `count` maps from consecutive seeds starting at `first_seed`.
///
/// # Errors
///
/// Returns the first generation failure.
pub fn generate_maps(
    first_seed: u64,
    count: usize,
    width: i32,
    height: i32,
) -> Result<Vec<MapSpec>, TournamentError> {
    (first_seed..)
        .take(count)
        .map(|seed| generate_map(seed, width, height).map_err(TournamentError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, MapBuilder, UnitType};
    use crate::scheduler::{Decision, FnProvider, IdleProvider, RoamingPainter, UnitView};

    fn small_map(rounds: u32) -> MapSpec {
        MapBuilder::new(20, 20)
            .name("small")
            .rounds(rounds)
            .tower(Team::A, UnitType::LevelOnePaintTower, 3, 3)
            .tower(Team::B, UnitType::LevelOnePaintTower, 16, 16)
            .build()
    }

    #[test]
    fn test_tournament_error_display() {
        let err = TournamentError::NoMaps;
        assert!(err.to_string().contains("no maps"));
        let err = TournamentError::MapGeneration(MapGenError {
            reason: "boom".into(),
        });
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_resignation_match() {
        let resign = FnProvider(|_: &UnitView<'_>| Decision::action(Action::Resign));
        let result = run_match(&small_map(100), IdleProvider, resign, &MatchConfig::default())
            .unwrap();
        assert_eq!(result.winner, Team::A);
        assert_eq!(result.reason, WinReason::Resignation);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.map_name, "small");
    }

    #[test]
    fn test_invalid_map_is_an_error() {
        let mut map = small_map(10);
        map.width = 5;
        let err = run_match(&map, IdleProvider, IdleProvider, &MatchConfig::default());
        assert!(matches!(err, Err(TournamentError::Match { .. })));
    }

    #[test]
    fn test_series_order_independent_of_parallelism() {
        let maps = generate_maps(100, 4, 24, 24).unwrap();
        let maps: Vec<MapSpec> = maps
            .into_iter()
            .map(|mut m| {
                m.rounds = 40;
                m
            })
            .collect();
        let sequential = run_series(&maps, || (RoamingPainter, IdleProvider), &TournamentConfig {
            parallel: false,
            ..TournamentConfig::default()
        })
        .unwrap();
        let parallel = run_series(&maps, || (RoamingPainter, IdleProvider), &TournamentConfig {
            parallel: true,
            ..TournamentConfig::default()
        })
        .unwrap();
        assert_eq!(sequential, parallel);
        let names: Vec<&str> = parallel.matches.iter().map(|m| m.map_name.as_str()).collect();
        assert_eq!(names, vec![
            "generated-100",
            "generated-101",
            "generated-102",
            "generated-103"
        ]);
        assert_eq!(parallel.wins[0] + parallel.wins[1], 4);
    }

    #[test]
    fn test_empty_series() {
        let result = run_series(&[], || (IdleProvider, IdleProvider), &TournamentConfig::default());
        assert!(matches!(result, Err(TournamentError::NoMaps)));
    }
}
