//! The authoritative match state.
//!
//! `World` owns the grid, the unit registry and the team ledger, and is the
//! only place where they are mutated together. Effects append
//! [`ActionEvent`]s to an internal buffer that the scheduler drains after
//! every turn.

use tracing::{debug, trace};

use crate::error::{GameError, GameResult};
use crate::game::constants::{
    GLOBAL_UPGRADE_ROUNDS, INITIAL_MONEY, INITIAL_TOWER_PAINT, NO_PAINT_DAMAGE,
    PASSIVE_MONEY_INCREASE, PENALTY_ENEMY_TERRITORY, RESOURCE_PATTERN_MONEY_BONUS,
};
use crate::game::pattern::check_pattern;
use crate::game::rng::Rng;
use crate::game::{
    Grid, MapLocation, MapSpec, Paint, PatternSet, Team, TeamLedger, TeamSnapshot, Unit, UnitId,
    UnitRegistry, UnitType, WinReason,
};
use crate::replay::{ActionEvent, MatchHeader, SpawnRecord};

/// An active resource pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSite {
    /// Pattern center.
    pub center: MapLocation,
    /// Owning team.
    pub team: Team,
}

/// How a finished match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Winning team.
    pub winner: Team,
    /// Deciding rule.
    pub reason: WinReason,
}

/// Complete state of one match.
#[derive(Debug, Clone)]
pub struct World {
    pub(super) grid: Grid,
    pub(super) units: UnitRegistry,
    pub(super) ledger: TeamLedger,
    pub(super) patterns: PatternSet,
    pub(super) resource_sites: Vec<PatternSite>,
    pub(super) round: u32,
    pub(super) max_rounds: u32,
    pub(super) seed: u64,
    pub(super) rng: Rng,
    pub(super) outcome: Option<Outcome>,
    map_name: String,
    initial_spawns: Vec<SpawnRecord>,
    events: Vec<ActionEvent>,
    died: Vec<UnitId>,
}

impl World {
    /// Build the starting state from a validated map.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Map`] if the map fails validation.
    pub fn new(spec: &MapSpec) -> GameResult<Self> {
        spec.validate()?;
        let mut grid = Grid::new(spec.width, spec.height)
            .ok_or_else(|| GameError::Invariant(String::from("empty grid")))?;
        for &wall in &spec.walls {
            grid.set_wall(wall, true);
        }
        for &ruin in &spec.ruins {
            grid.set_ruin(ruin, true);
        }
        let ledger = TeamLedger::new(grid.paintable_cells());

        let mut world = Self {
            grid,
            units: UnitRegistry::new(),
            ledger,
            patterns: spec.patterns,
            resource_sites: Vec::new(),
            round: 0,
            max_rounds: spec.rounds,
            seed: spec.seed,
            rng: Rng::new(spec.seed),
            outcome: None,
            map_name: spec.name.clone(),
            initial_spawns: Vec::new(),
            events: Vec::new(),
            died: Vec::new(),
        };
        for tower in &spec.towers {
            world.spawn_unit(tower.team, tower.unit_type, tower.location, INITIAL_TOWER_PAINT)?;
        }
        // Starting towers belong in the header, not in round 1.
        world.initial_spawns = world
            .events
            .drain(..)
            .filter_map(|event| match event {
                ActionEvent::Spawn(record) => Some(record),
                _ => None,
            })
            .collect();
        Ok(world)
    }

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The unit registry.
    #[must_use]
    pub const fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// The team ledger.
    #[must_use]
    pub const fn ledger(&self) -> &TeamLedger {
        &self.ledger
    }

    /// Templates in force.
    #[must_use]
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Active resource patterns in completion order.
    #[must_use]
    pub fn resource_sites(&self) -> &[PatternSite] {
        &self.resource_sites
    }

    /// Number of active resource patterns owned by `team`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn resource_pattern_count(&self, team: Team) -> u32 {
        self.resource_sites.iter().filter(|s| s.team == team).count() as u32
    }

    /// Current round; 0 before the first round starts.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Round limit.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Map seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Map name.
    #[must_use]
    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    /// Result, once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether more rounds will be played.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    /// Look up a unit.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`](crate::game::LookupError) if it does not exist.
    pub fn unit(&self, id: UnitId) -> Result<&Unit, crate::game::LookupError> {
        self.units.get(id)
    }

    /// The unit standing at a location.
    #[must_use]
    pub fn unit_at(&self, loc: MapLocation) -> Option<&Unit> {
        self.grid
            .occupant(loc)
            .and_then(|id| self.units.get(id).ok())
    }

    /// Static map data and starting units.
    #[must_use]
    pub fn header(&self) -> MatchHeader {
        let mut walls = Vec::new();
        let mut ruins = Vec::new();
        for (loc, cell) in self.grid.iter() {
            if cell.wall {
                walls.push(loc);
            }
            if cell.ruin {
                ruins.push(loc);
            }
        }
        MatchHeader {
            map_name: self.map_name.clone(),
            width: self.grid.width(),
            height: self.grid.height(),
            seed: self.seed,
            rounds: self.max_rounds,
            walls,
            ruins,
            patterns: self.patterns,
            spawns: self.initial_spawns.clone(),
        }
    }

    /// Id of the unit at `loc` during apply, where validation already
    /// proved it is there.
    pub(crate) fn occupant_id(&self, loc: MapLocation) -> GameResult<UnitId> {
        self.grid
            .occupant(loc)
            .ok_or_else(|| GameError::Invariant(format!("no unit at {loc}")))
    }

    pub(crate) fn push_event(&mut self, event: ActionEvent) {
        self.events.push(event);
    }

    /// Drain buffered effect events.
    pub(crate) fn take_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain ids destroyed since the last call.
    pub(crate) fn take_died(&mut self) -> Vec<UnitId> {
        std::mem::take(&mut self.died)
    }

    /// Paint a cell, keeping the team tallies in step. Walls and ruins are
    /// left untouched. Emits `Paint` or `Unpaint` when the paint changes.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if a tally would go negative.
    pub fn paint_cell(&mut self, loc: MapLocation, paint: Paint) -> GameResult<()> {
        if !self.grid.is_paintable(loc) {
            return Ok(());
        }
        let Some(previous) = self.grid.set_paint(loc, paint) else {
            return Ok(());
        };
        if previous == paint {
            return Ok(());
        }
        if let Some(team) = previous.owner() {
            self.ledger.add_painted_count(team, -1)?;
        }
        if let Some(team) = paint.owner() {
            self.ledger.add_painted_count(team, 1)?;
        }
        self.push_event(match paint {
            Paint::Empty => ActionEvent::Unpaint { location: loc },
            Paint::Team(..) => ActionEvent::Paint {
                location: loc,
                paint,
            },
        });
        Ok(())
    }

    /// Create a unit at `loc` holding `paint` and emit `Spawn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is off the map or already occupied.
    pub(crate) fn spawn_unit(
        &mut self,
        team: Team,
        unit_type: UnitType,
        loc: MapLocation,
        paint: u32,
    ) -> GameResult<UnitId> {
        if !self.grid.on_map(loc) || self.grid.occupant(loc).is_some() {
            return Err(GameError::Invariant(format!("cannot spawn at {loc}")));
        }
        let id = self.units.create(team, unit_type);
        self.units.place(id, loc)?;
        self.grid.set_occupant(loc, Some(id));
        let unit = self.units.get_mut(id)?;
        unit.add_paint(paint);
        let record = SpawnRecord {
            unit: id,
            team,
            unit_type,
            location: loc,
            health: unit.health(),
            paint: unit.paint(),
        };
        if unit_type.is_tower() {
            self.ledger.add_tower(team);
        }
        trace!(unit = id.0, ?team, ?unit_type, x = loc.x, y = loc.y, "spawned");
        self.push_event(ActionEvent::Spawn(record));
        Ok(id)
    }

    /// Remove a unit from the match.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownUnit`] if the unit does not exist.
    pub(crate) fn destroy_unit(&mut self, id: UnitId) -> GameResult<()> {
        let unit = self.units.remove(id)?;
        if let Some(loc) = unit.location() {
            self.grid.set_occupant(loc, None);
        }
        if unit.unit_type().is_tower() {
            self.ledger.remove_tower(unit.team());
        }
        debug!(unit = id.0, team = ?unit.team(), unit_type = ?unit.unit_type(), "unit destroyed");
        self.died.push(id);
        Ok(())
    }

    /// Deal damage, destroying the unit at zero health. Emits `Damage`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownUnit`] if the unit does not exist.
    pub(crate) fn damage_unit(&mut self, id: UnitId, amount: u32) -> GameResult<()> {
        let unit = self.units.get_mut(id)?;
        let dealt = unit.take_damage(amount);
        let dead = unit.health() == 0;
        self.push_event(ActionEvent::Damage {
            target: id,
            amount: dealt,
        });
        if dead {
            self.destroy_unit(id)?;
        }
        Ok(())
    }

    /// Record the execution cost a decision step reported.
    pub(crate) fn set_execution_cost(&mut self, id: UnitId, cost: u32) -> GameResult<()> {
        self.units.get_mut(id)?.set_execution_cost(cost);
        Ok(())
    }

    /// Attach a debug indicator string to a unit.
    pub(crate) fn set_indicator(&mut self, id: UnitId, text: &str) -> GameResult<String> {
        let unit = self.units.get_mut(id)?;
        unit.set_indicator(text);
        Ok(unit.indicator().to_string())
    }

    /// Beginning-of-round bookkeeping for the world and every unit.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the ledger or registry is inconsistent.
    pub fn begin_round(&mut self) -> GameResult<()> {
        self.round += 1;
        let round = self.round;
        trace!(round, "begin round");

        if round % GLOBAL_UPGRADE_ROUNDS == 0 {
            for team in Team::ALL {
                self.ledger.increment_global_upgrade_points(team);
            }
        }
        if round == 1 {
            for team in Team::ALL {
                self.ledger.add_money(team, i64::from(INITIAL_MONEY))?;
            }
        }

        for id in self.units.execution_order() {
            let unit = self.units.get_mut(id)?;
            unit.begin_round(round);
            if unit.unit_type().is_tower() {
                continue;
            }
            let team = unit.team();
            let on_enemy_paint = unit
                .location()
                .is_some_and(|loc| self.grid.paint(loc).is_enemy_of(team));
            if on_enemy_paint {
                unit.remove_paint(PENALTY_ENEMY_TERRITORY);
            }
            if unit.paint() == 0 {
                self.damage_unit(id, NO_PAINT_DAMAGE)?;
            }
        }
        Ok(())
    }

    /// End-of-round income for both teams.
    ///
    /// # Errors
    ///
    /// Returns a ledger error on overflow.
    pub fn collect_income(&mut self) -> GameResult<()> {
        for team in Team::ALL {
            let towers: u32 = self
                .units
                .iter_team(team)
                .map(|u| u.unit_type().profile().money_per_turn)
                .sum();
            let patterns = self.resource_pattern_count(team) * RESOURCE_PATTERN_MONEY_BONUS;
            let income = PASSIVE_MONEY_INCREASE + towers + patterns;
            self.ledger.add_money(team, i64::from(income))?;
        }
        Ok(())
    }

    /// Drop active resource patterns that no longer match.
    pub fn sweep_resource_patterns(&mut self) {
        let mut lost = Vec::new();
        let grid = &self.grid;
        let template = self.patterns.resource;
        self.resource_sites.retain(|site| {
            let keep = check_pattern(grid, template, site.team, site.center);
            if !keep {
                lost.push(*site);
            }
            keep
        });
        for site in lost {
            debug!(team = ?site.team, x = site.center.x, y = site.center.y, "resource pattern lost");
            self.push_event(ActionEvent::ResourcePatternLost {
                team: site.team,
                center: site.center,
            });
        }
    }

    /// End-of-round team snapshots; resets the money deltas.
    pub fn snapshot_teams(&mut self) -> [TeamSnapshot; 2] {
        self.ledger.snapshot()
    }

    /// Whether the round limit has been reached.
    #[must_use]
    pub const fn at_round_limit(&self) -> bool {
        self.round >= self.max_rounds
    }

    /// Register (or refresh) a completed resource pattern.
    pub(crate) fn activate_resource_pattern(&mut self, team: Team, center: MapLocation) {
        if let Some(site) = self.resource_sites.iter_mut().find(|s| s.center == center) {
            site.team = team;
        } else {
            self.resource_sites.push(PatternSite { center, team });
        }
    }
}
