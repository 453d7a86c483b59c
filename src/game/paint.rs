//! Cell paint.

use serde::{Deserialize, Serialize};

use crate::game::Team;

/// The two shades each team can paint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintColor {
    /// Primary shade; a set template bit.
    Primary,
    /// Secondary shade; a clear template bit.
    Secondary,
}

impl PaintColor {
    /// Color for a template bit.
    #[must_use]
    pub const fn from_bit(primary: bool) -> Self {
        if primary {
            PaintColor::Primary
        } else {
            PaintColor::Secondary
        }
    }

    /// Color selected by a `secondary` flag.
    #[must_use]
    pub const fn from_secondary(secondary: bool) -> Self {
        Self::from_bit(!secondary)
    }

    /// Whether this is the secondary shade.
    #[must_use]
    pub const fn is_secondary(self) -> bool {
        matches!(self, PaintColor::Secondary)
    }
}

/// Paint on a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Paint {
    /// Unpainted.
    #[default]
    Empty,
    /// Painted by a team in one of its shades.
    Team(Team, PaintColor),
}

impl Paint {
    /// The team owning this paint, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Team> {
        match self {
            Paint::Empty => None,
            Paint::Team(team, _) => Some(team),
        }
    }

    /// Whether the cell is painted by `team`.
    #[must_use]
    pub fn is_owned_by(self, team: Team) -> bool {
        self.owner() == Some(team)
    }

    /// Whether the cell is painted by the opponent of `team`.
    #[must_use]
    pub fn is_enemy_of(self, team: Team) -> bool {
        self.owner() == Some(team.opponent())
    }

    /// The shade as seen by `team`: `None` unless `team` painted it.
    #[must_use]
    pub fn color_for(self, team: Team) -> Option<PaintColor> {
        match self {
            Paint::Team(owner, color) if owner == team => Some(color),
            _ => None,
        }
    }

    /// Paint as seen from `team`'s side.
    #[must_use]
    pub fn relative_to(self, team: Team) -> PaintType {
        match self {
            Paint::Empty => PaintType::Empty,
            Paint::Team(owner, PaintColor::Primary) if owner == team => PaintType::AllyPrimary,
            Paint::Team(owner, PaintColor::Secondary) if owner == team => {
                PaintType::AllySecondary
            }
            Paint::Team(_, PaintColor::Primary) => PaintType::EnemyPrimary,
            Paint::Team(_, PaintColor::Secondary) => PaintType::EnemySecondary,
        }
    }

    /// Compact encoding used in replays: 0 none, 1/2 team A, 3/4 team B.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Paint::Empty => 0,
            Paint::Team(Team::A, PaintColor::Primary) => 1,
            Paint::Team(Team::A, PaintColor::Secondary) => 2,
            Paint::Team(Team::B, PaintColor::Primary) => 3,
            Paint::Team(Team::B, PaintColor::Secondary) => 4,
        }
    }

    /// Inverse of [`Paint::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Paint::Empty),
            1 => Some(Paint::Team(Team::A, PaintColor::Primary)),
            2 => Some(Paint::Team(Team::A, PaintColor::Secondary)),
            3 => Some(Paint::Team(Team::B, PaintColor::Primary)),
            4 => Some(Paint::Team(Team::B, PaintColor::Secondary)),
            _ => None,
        }
    }
}

/// Team-relative view of a cell's paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintType {
    /// Unpainted.
    Empty,
    /// Own primary shade.
    AllyPrimary,
    /// Own secondary shade.
    AllySecondary,
    /// Opponent's primary shade.
    EnemyPrimary,
    /// Opponent's secondary shade.
    EnemySecondary,
}

impl PaintType {
    /// Whether this is own paint.
    #[must_use]
    pub const fn is_ally(self) -> bool {
        matches!(self, PaintType::AllyPrimary | PaintType::AllySecondary)
    }

    /// Whether this is opponent paint.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, PaintType::EnemyPrimary | PaintType::EnemySecondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in 0..5 {
            assert_eq!(Paint::from_code(code).unwrap().code(), code);
        }
        assert!(Paint::from_code(5).is_none());
    }

    #[test]
    fn test_relative_view() {
        let paint = Paint::Team(Team::A, PaintColor::Secondary);
        assert_eq!(paint.relative_to(Team::A), PaintType::AllySecondary);
        assert_eq!(paint.relative_to(Team::B), PaintType::EnemySecondary);
        assert!(paint.is_enemy_of(Team::B));
        assert!(!paint.is_enemy_of(Team::A));
        assert_eq!(paint.color_for(Team::B), None);
        assert_eq!(Paint::Empty.relative_to(Team::B), PaintType::Empty);
    }
}
