//! Round scheduler.
//!
//! A [`Match`] drives one [`World`] from its header to its footer:
//! - Beginning-of-round bookkeeping
//! - One decision per unit in id order, actions applied immediately
//! - Income, resource-pattern sweep, snapshots and win checks
//! - One replay [`Event`] per round into the sink
//!
//! Decisions are taken in strict sequence; each unit sees the effects of
//! every unit that acted before it.

mod provider;

pub use provider::{
    Decision, DecisionProvider, FnProvider, IdleProvider, Indicator, RoamingPainter,
    TeamProviders, UnitView,
};

use serde::{Deserialize, Serialize};
use tracing::{error, info, trace, warn};

use crate::error::{GameError, GameResult, PerformError};
use crate::game::constants::{EXCEPTION_EXECUTION_PENALTY, EXECUTION_BUDGET};
use crate::game::invariants::check_invariants;
use crate::game::{Outcome, Team, UnitId, World};
use crate::replay::{
    ActionEvent, Event, EventSink, MatchFooter, RoundRecord, TeamProfile, TurnRecord,
};

/// Runtime switches for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Run the invariant checker after every round and abort on violation.
    pub check_invariants: bool,
    /// Keep indicator annotations in the replay.
    pub record_indicators: bool,
}

impl MatchConfig {
    /// Parse from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Where a match is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Nothing emitted yet.
    AwaitingMatchHeader,
    /// Header emitted; rounds are being played.
    InMatch,
    /// Footer emitted (or the match aborted).
    Done,
}

/// Result of one [`Match::run_round`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A round was played; more may follow.
    Played(u32),
    /// The match is over and its footer has been emitted.
    Done,
}

/// One match between two teams.
#[derive(Debug)]
pub struct Match<P, S> {
    world: World,
    provider: P,
    sink: S,
    config: MatchConfig,
    phase: MatchPhase,
    profiles: [TeamProfile; 2],
}

impl<P: DecisionProvider, S: EventSink> Match<P, S> {
    /// Prepare a match over an already built world.
    pub fn new(world: World, provider: P, sink: S, config: MatchConfig) -> Self {
        Self {
            world,
            provider,
            sink,
            config,
            phase: MatchPhase::AwaitingMatchHeader,
            profiles: [TeamProfile::default(); 2],
        }
    }

    /// The world as of the last completed round.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Per-team execution totals so far.
    #[must_use]
    pub const fn profiles(&self) -> [TeamProfile; 2] {
        self.profiles
    }

    /// The sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Take the match apart once done.
    pub fn into_parts(self) -> (World, P, S) {
        (self.world, self.provider, self.sink)
    }

    /// Advance by one round.
    ///
    /// The first call emits the match header. When the match has been
    /// decided, the next call emits the footer and returns
    /// [`RoundOutcome::Done`]; later calls return `Done` and emit nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError`] on an internal inconsistency or sink failure.
    /// The match moves to [`MatchPhase::Done`] and cannot be resumed.
    pub fn run_round(&mut self) -> GameResult<RoundOutcome> {
        match self.step() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(round = self.world.round(), error = %err, "match aborted");
                self.phase = MatchPhase::Done;
                Err(err)
            }
        }
    }

    /// Play rounds until the footer has been emitted.
    ///
    /// # Errors
    ///
    /// See [`Match::run_round`].
    pub fn run_to_end(&mut self) -> GameResult<Outcome> {
        while self.run_round()? != RoundOutcome::Done {}
        self.world
            .outcome()
            .ok_or_else(|| GameError::Invariant(String::from("finished without a winner")))
    }

    fn step(&mut self) -> GameResult<RoundOutcome> {
        match self.phase {
            MatchPhase::Done => return Ok(RoundOutcome::Done),
            MatchPhase::AwaitingMatchHeader => {
                info!(
                    map = self.world.map_name(),
                    seed = self.world.seed(),
                    rounds = self.world.max_rounds(),
                    "match started"
                );
                self.sink.emit(Event::MatchHeader(self.world.header()))?;
                self.phase = MatchPhase::InMatch;
            }
            MatchPhase::InMatch => {}
        }

        if !self.world.is_running() {
            self.finish()?;
            return Ok(RoundOutcome::Done);
        }

        let record = self.play_round()?;
        let round = record.round;
        self.sink.emit(Event::Round(record))?;
        Ok(RoundOutcome::Played(round))
    }

    fn play_round(&mut self) -> GameResult<RoundRecord> {
        self.world.begin_round()?;
        let round = self.world.round();
        let mut round_events = self.world.take_events();

        let order = self.world.units().execution_order();
        let mut turns = Vec::with_capacity(order.len());
        for id in order {
            if !self.world.units().contains(id) {
                continue;
            }
            turns.push(self.play_turn(id)?);
        }

        self.world.collect_income()?;
        self.world.sweep_resource_patterns();
        let teams = self.world.snapshot_teams();
        self.world.check_early_win()?;
        if self.world.is_running() && self.world.at_round_limit() {
            self.world.resolve_at_limit();
        }
        if self.config.check_invariants {
            if let Some(violation) = check_invariants(&self.world).into_iter().next() {
                return Err(GameError::Invariant(violation.message));
            }
        }

        round_events.extend(self.world.take_events());
        let died = self.world.take_died();
        for &id in &died {
            self.provider.unit_destroyed(id);
        }
        trace!(round, turns = turns.len(), died = died.len(), "round finished");
        Ok(RoundRecord {
            round,
            teams,
            round_events,
            turns,
            died,
        })
    }

    fn play_turn(&mut self, id: UnitId) -> GameResult<TurnRecord> {
        let Some(view) = UnitView::new(&self.world, id) else {
            return Err(GameError::Invariant(format!("unit {id} has no view")));
        };
        let team = view.team();
        let decision = self.provider.step_unit(&view);

        let mut cost = decision.execution_cost;
        if decision.terminated {
            cost = cost.saturating_add(EXCEPTION_EXECUTION_PENALTY);
        }
        let cost = cost.min(EXECUTION_BUDGET);
        self.world.set_execution_cost(id, cost)?;
        self.profile_mut(team).total_execution_cost += u64::from(cost);

        if decision.terminated {
            warn!(unit = id.0, ?team, "decision step terminated; unit destroyed");
            self.profile_mut(team).faulted_units += 1;
            self.world.destroy_unit(id)?;
            self.world.push_event(ActionEvent::DieException { unit: id });
        } else {
            self.apply_decision(id, &decision)?;
        }

        let actions = self.world.take_events();
        Ok(self.turn_record(id, cost, actions))
    }

    fn apply_decision(&mut self, id: UnitId, decision: &Decision) -> GameResult<()> {
        for action in &decision.actions {
            if !self.world.is_running() || !self.world.units().contains(id) {
                break;
            }
            match self.world.perform(id, action) {
                Ok(()) | Err(PerformError::Rejected(_)) => {}
                Err(PerformError::Fatal(err)) => return Err(err),
            }
        }
        if !self.config.record_indicators || !self.world.units().contains(id) {
            return Ok(());
        }
        for indicator in &decision.indicators {
            let event = match indicator {
                Indicator::String(text) => ActionEvent::IndicatorString {
                    unit: id,
                    text: self.world.set_indicator(id, text)?,
                },
                Indicator::Dot { location, color } => ActionEvent::IndicatorDot {
                    unit: id,
                    location: *location,
                    color: *color,
                },
                Indicator::Line { from, to, color } => ActionEvent::IndicatorLine {
                    unit: id,
                    from: *from,
                    to: *to,
                    color: *color,
                },
            };
            self.world.push_event(event);
        }
        Ok(())
    }

    fn turn_record(&self, id: UnitId, cost: u32, actions: Vec<ActionEvent>) -> TurnRecord {
        match self.world.unit(id) {
            Ok(unit) => TurnRecord {
                unit: id,
                actions,
                health: unit.health(),
                paint: unit.paint(),
                movement_cooldown: unit.movement_cooldown(),
                action_cooldown: unit.action_cooldown(),
                execution_cost: cost,
                location: unit.location(),
            },
            Err(_) => TurnRecord {
                unit: id,
                actions,
                health: 0,
                paint: 0,
                movement_cooldown: 0,
                action_cooldown: 0,
                execution_cost: cost,
                location: None,
            },
        }
    }

    fn profile_mut(&mut self, team: Team) -> &mut TeamProfile {
        &mut self.profiles[team.index()]
    }

    fn finish(&mut self) -> GameResult<()> {
        let outcome = self
            .world
            .outcome()
            .ok_or_else(|| GameError::Invariant(String::from("finished without a winner")))?;
        info!(
            winner = ?outcome.winner,
            reason = ?outcome.reason,
            rounds = self.world.round(),
            "match finished"
        );
        self.sink.emit(Event::MatchFooter(MatchFooter {
            winner: outcome.winner,
            reason: outcome.reason,
            rounds: self.world.round(),
            profiles: self.profiles,
        }))?;
        self.sink.flush()?;
        self.phase = MatchPhase::Done;
        Ok(())
    }
}
