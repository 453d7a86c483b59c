//! Teams and the per-team ledger.
//!
//! The ledger owns every team-level counter: money, painted cell tally,
//! the shared array, tower count and global upgrade points. Money never goes
//! negative; a delta that would overdraw is rejected and leaves the balance
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::game::constants::{MAX_SHARED_ARRAY_VALUE, PAINT_PERCENT_TO_WIN, SHARED_ARRAY_LENGTH};

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// First team.
    A,
    /// Second team.
    B,
}

impl Team {
    /// Both teams in index order.
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Array index of this team.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

/// Error type for ledger mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// A money delta would leave the balance negative.
    InsufficientFunds {
        /// Team whose balance was touched.
        team: Team,
        /// Balance before the delta.
        balance: u32,
        /// Rejected delta.
        delta: i64,
    },
    /// A money delta would overflow the balance.
    Overflow {
        /// Team whose balance was touched.
        team: Team,
    },
    /// A painted tally update would leave the count negative.
    NegativePaintedCount {
        /// Team whose tally was touched.
        team: Team,
    },
    /// Shared array index or value out of bounds.
    InvalidSharedWrite {
        /// Requested slot.
        index: usize,
        /// Requested value.
        value: i32,
    },
    /// A team was declared winner by area without holding enough of the map.
    UnearnedAreaWin {
        /// Team reported as winner.
        team: Team,
        /// Percentage it actually holds.
        percent: u32,
    },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientFunds {
                team,
                balance,
                delta,
            } => write!(
                f,
                "Team {team} cannot apply money delta {delta} to balance {balance}"
            ),
            Self::Overflow { team } => write!(f, "Team {team} money overflow"),
            Self::NegativePaintedCount { team } => {
                write!(f, "Team {team} painted count would go negative")
            }
            Self::InvalidSharedWrite { index, value } => {
                write!(f, "Invalid shared array write: slot {index}, value {value}")
            }
            Self::UnearnedAreaWin { team, percent } => write!(
                f,
                "Team {team} reported as area winner with only {percent}% painted"
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Counters for a single team.
#[derive(Debug, Clone)]
struct TeamEntry {
    money: u32,
    painted_cells: u32,
    shared: [u16; SHARED_ARRAY_LENGTH],
    tower_count: u32,
    global_upgrade_points: u32,
    money_at_snapshot: u32,
}

impl Default for TeamEntry {
    fn default() -> Self {
        Self {
            money: 0,
            painted_cells: 0,
            shared: [0; SHARED_ARRAY_LENGTH],
            tower_count: 0,
            global_upgrade_points: 0,
            money_at_snapshot: 0,
        }
    }
}

/// End-of-round view of one team, used by replay records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    /// Team described.
    pub team: Team,
    /// Money balance.
    pub money: u32,
    /// Change in money since the previous snapshot.
    pub money_delta: i64,
    /// Cells painted by the team.
    pub painted_cells: u32,
    /// Towers owned by the team.
    pub towers: u32,
}

/// Economy and win-condition bookkeeping for both teams.
#[derive(Debug, Clone)]
pub struct TeamLedger {
    entries: [TeamEntry; 2],
    paintable_cells: u32,
}

impl TeamLedger {
    /// Create an empty ledger for a map with `paintable_cells` paintable cells.
    #[must_use]
    pub fn new(paintable_cells: u32) -> Self {
        Self {
            entries: [TeamEntry::default(), TeamEntry::default()],
            paintable_cells,
        }
    }

    fn entry(&self, team: Team) -> &TeamEntry {
        &self.entries[team.index()]
    }

    fn entry_mut(&mut self, team: Team) -> &mut TeamEntry {
        &mut self.entries[team.index()]
    }

    /// Current money balance.
    #[must_use]
    pub fn money(&self, team: Team) -> u32 {
        self.entry(team).money
    }

    /// Apply a money delta, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the balance untouched, if the result would be
    /// negative or overflow.
    pub fn add_money(&mut self, team: Team, delta: i64) -> Result<u32, LedgerError> {
        let balance = self.money(team);
        let next = i64::from(balance) + delta;
        if next < 0 {
            return Err(LedgerError::InsufficientFunds {
                team,
                balance,
                delta,
            });
        }
        let next = u32::try_from(next).map_err(|_| LedgerError::Overflow { team })?;
        self.entry_mut(team).money = next;
        Ok(next)
    }

    /// Whether the team can afford `cost`.
    #[must_use]
    pub fn can_afford(&self, team: Team, cost: u32) -> bool {
        self.money(team) >= cost
    }

    /// Number of cells painted by the team.
    #[must_use]
    pub fn painted_cells(&self, team: Team) -> u32 {
        self.entry(team).painted_cells
    }

    /// Adjust the painted cell tally.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the tally untouched, if it would go negative.
    pub fn add_painted_count(&mut self, team: Team, delta: i32) -> Result<(), LedgerError> {
        let entry = self.entry_mut(team);
        entry.painted_cells = entry
            .painted_cells
            .checked_add_signed(delta)
            .ok_or(LedgerError::NegativePaintedCount { team })?;
        Ok(())
    }

    /// Number of cells that can carry paint.
    #[must_use]
    pub const fn paintable_cells(&self) -> u32 {
        self.paintable_cells
    }

    /// Percentage (rounded down) of paintable cells owned by the team.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn painted_percent(&self, team: Team) -> u32 {
        if self.paintable_cells == 0 {
            return 0;
        }
        (u64::from(self.painted_cells(team)) * 100 / u64::from(self.paintable_cells)) as u32
    }

    /// Whether the team has painted enough of the map to win outright.
    #[must_use]
    pub fn has_painted_majority(&self, team: Team) -> bool {
        self.paintable_cells > 0
            && u64::from(self.painted_cells(team)) * 100
                >= u64::from(PAINT_PERCENT_TO_WIN) * u64::from(self.paintable_cells)
    }

    /// Confirm an outright area win before it is reported.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnearnedAreaWin`] if the team is below the
    /// threshold; reporting such a win is a logic error.
    pub fn confirm_area_win(&self, team: Team) -> Result<(), LedgerError> {
        if self.has_painted_majority(team) {
            Ok(())
        } else {
            Err(LedgerError::UnearnedAreaWin {
                team,
                percent: self.painted_percent(team),
            })
        }
    }

    /// Read a shared array slot.
    #[must_use]
    pub fn read_shared(&self, team: Team, index: usize) -> Option<u16> {
        self.entry(team).shared.get(index).copied()
    }

    /// The team's whole shared array.
    #[must_use]
    pub fn shared_array(&self, team: Team) -> &[u16; SHARED_ARRAY_LENGTH] {
        &self.entry(team).shared
    }

    /// Write a shared array slot.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidSharedWrite`] and writes nothing if the
    /// index or value is out of range.
    pub fn write_shared(&mut self, team: Team, index: usize, value: i32) -> Result<(), LedgerError> {
        let valid = index < SHARED_ARRAY_LENGTH && (0..=MAX_SHARED_ARRAY_VALUE).contains(&value);
        let stored = u16::try_from(value).ok().filter(|_| valid);
        let Some(stored) = stored else {
            return Err(LedgerError::InvalidSharedWrite { index, value });
        };
        self.entry_mut(team).shared[index] = stored;
        Ok(())
    }

    /// Number of towers owned by the team.
    #[must_use]
    pub fn tower_count(&self, team: Team) -> u32 {
        self.entry(team).tower_count
    }

    /// Record a tower gained.
    pub fn add_tower(&mut self, team: Team) {
        self.entry_mut(team).tower_count += 1;
    }

    /// Record a tower lost.
    pub fn remove_tower(&mut self, team: Team) {
        let entry = self.entry_mut(team);
        entry.tower_count = entry.tower_count.saturating_sub(1);
    }

    /// Global upgrade points earned so far.
    #[must_use]
    pub fn global_upgrade_points(&self, team: Team) -> u32 {
        self.entry(team).global_upgrade_points
    }

    /// Grant one global upgrade point.
    pub fn increment_global_upgrade_points(&mut self, team: Team) {
        self.entry_mut(team).global_upgrade_points += 1;
    }

    /// Take the end-of-round snapshot of both teams and reset money deltas.
    pub fn snapshot(&mut self) -> [TeamSnapshot; 2] {
        Team::ALL.map(|team| {
            let entry = self.entry_mut(team);
            let snapshot = TeamSnapshot {
                team,
                money: entry.money,
                money_delta: i64::from(entry.money) - i64::from(entry.money_at_snapshot),
                painted_cells: entry.painted_cells,
                towers: entry.tower_count,
            };
            entry.money_at_snapshot = entry.money;
            snapshot
        })
    }
}
