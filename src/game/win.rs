//! Win resolution.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GameError, GameResult};
use crate::game::{Outcome, Team, World};

/// The rule that decided a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser resigned.
    Resignation,
    /// The winner painted enough of the map, or more of it at the limit.
    AreaPainted,
    /// The loser has no units left.
    AllUnitsDestroyed,
    /// More towers at the round limit.
    MoreTowers,
    /// More money at the round limit.
    MoreMoney,
    /// More paint held by units at the round limit.
    MoreStoredPaint,
    /// More robots at the round limit.
    MoreRobots,
    /// Seeded coin flip after every other tie-break.
    CoinFlip,
}

/// Pick the team with the larger value, if they differ.
fn larger<T: Ord>(a: T, b: T) -> Option<Team> {
    match a.cmp(&b) {
        std::cmp::Ordering::Greater => Some(Team::A),
        std::cmp::Ordering::Less => Some(Team::B),
        std::cmp::Ordering::Equal => None,
    }
}

impl World {
    /// Declare a winner. Later calls do not override the first result.
    pub(crate) fn declare_winner(&mut self, winner: Team, reason: WinReason) {
        if self.outcome.is_some() {
            return;
        }
        info!(round = self.round, ?winner, ?reason, "winner declared");
        self.outcome = Some(Outcome { winner, reason });
    }

    /// Conditions that end a match before the round limit.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Ledger`] if an area win is claimed for a team
    /// the ledger does not confirm.
    pub fn check_early_win(&mut self) -> GameResult<()> {
        if self.outcome.is_some() {
            return Ok(());
        }
        let majority: Vec<Team> = Team::ALL
            .into_iter()
            .filter(|&team| self.grid.count_painted(team) * 100 >= self.area_threshold())
            .collect();
        if let Some(&team) = majority.first() {
            self.ledger.confirm_area_win(team)?;
            self.declare_winner(team, WinReason::AreaPainted);
            return Ok(());
        }
        let a_alive = self.units.iter_team(Team::A).next().is_some();
        let b_alive = self.units.iter_team(Team::B).next().is_some();
        match (a_alive, b_alive) {
            (true, false) => self.declare_winner(Team::A, WinReason::AllUnitsDestroyed),
            (false, true) => self.declare_winner(Team::B, WinReason::AllUnitsDestroyed),
            (false, false) => {
                let winner = if self.rng.next_bool() { Team::A } else { Team::B };
                self.declare_winner(winner, WinReason::CoinFlip);
            }
            (true, true) => {}
        }
        Ok(())
    }

    fn area_threshold(&self) -> u32 {
        crate::game::constants::PAINT_PERCENT_TO_WIN * self.ledger.paintable_cells()
    }

    /// Tie-break chain applied when the round limit is reached undecided.
    pub fn resolve_at_limit(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let (winner, reason) = self.tie_break();
        self.declare_winner(winner, reason);
    }

    fn tie_break(&mut self) -> (Team, WinReason) {
        let ledger = &self.ledger;
        let units = &self.units;
        let checks = [
            (
                larger(ledger.painted_cells(Team::A), ledger.painted_cells(Team::B)),
                WinReason::AreaPainted,
            ),
            (
                larger(units.count_towers(Team::A), units.count_towers(Team::B)),
                WinReason::MoreTowers,
            ),
            (
                larger(ledger.money(Team::A), ledger.money(Team::B)),
                WinReason::MoreMoney,
            ),
            (
                larger(units.stored_paint(Team::A), units.stored_paint(Team::B)),
                WinReason::MoreStoredPaint,
            ),
            (
                larger(units.count_robots(Team::A), units.count_robots(Team::B)),
                WinReason::MoreRobots,
            ),
        ];
        if let Some((Some(team), reason)) = checks.into_iter().find(|(team, _)| team.is_some()) {
            return (team, reason);
        }
        let winner = if self.rng.next_bool() { Team::A } else { Team::B };
        (winner, WinReason::CoinFlip)
    }

    /// Consistency check between the grid and the ledger's area tally.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Invariant`] on mismatch.
    pub fn verify_area_tally(&self) -> GameResult<()> {
        for team in Team::ALL {
            let counted = self.grid.count_painted(team);
            let tallied = self.ledger.painted_cells(team);
            if counted != tallied {
                return Err(GameError::Invariant(format!(
                    "team {team} paints {counted} cells but ledger has {tallied}"
                )));
            }
        }
        Ok(())
    }
}
