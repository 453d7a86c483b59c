//! 5x5 paint templates and the symmetry-aware matcher.
//!
//! A template is 25 bits. The bit for offset `(dx, dy)` (each in `-2..=2`)
//! lives at index `5 * (dx + 2) + (dy + 2)`; a set bit asks for the primary
//! shade, a clear bit for the secondary one.

use serde::{Deserialize, Serialize};

use crate::game::constants::PATTERN_SIZE;
use crate::game::{Grid, MapLocation, Paint, PaintColor, Team, TowerKind};

const HALF: i32 = PATTERN_SIZE / 2;

/// One of the eight rotations and reflections of the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Symmetry {
    /// No change.
    #[default]
    Identity,
    /// Quarter turn counter-clockwise.
    Rot90,
    /// Half turn.
    Rot180,
    /// Quarter turn clockwise.
    Rot270,
    /// Mirror across the vertical axis.
    FlipX,
    /// Mirror across the main diagonal.
    Transpose,
    /// Mirror across the horizontal axis.
    FlipY,
    /// Mirror across the anti-diagonal.
    AntiTranspose,
}

impl Symmetry {
    /// All symmetries in matching order.
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::FlipX,
        Symmetry::Transpose,
        Symmetry::FlipY,
        Symmetry::AntiTranspose,
    ];

    /// Map a template offset to a grid offset.
    #[must_use]
    pub const fn apply(self, dx: i32, dy: i32) -> (i32, i32) {
        match self {
            Symmetry::Identity => (dx, dy),
            Symmetry::Rot90 => (-dy, dx),
            Symmetry::Rot180 => (-dx, -dy),
            Symmetry::Rot270 => (dy, -dx),
            Symmetry::FlipX => (-dx, dy),
            Symmetry::Transpose => (dy, dx),
            Symmetry::FlipY => (dx, -dy),
            Symmetry::AntiTranspose => (-dy, -dx),
        }
    }

    /// Symmetry from a quarter-turn count and a reflection flag.
    #[must_use]
    pub const fn from_rotation(quarter_turns: u8, reflect: bool) -> Self {
        match (quarter_turns % 4, reflect) {
            (0, false) => Symmetry::Identity,
            (1, false) => Symmetry::Rot90,
            (2, false) => Symmetry::Rot180,
            (3, false) => Symmetry::Rot270,
            (0, true) => Symmetry::FlipX,
            (1, true) => Symmetry::Transpose,
            (2, true) => Symmetry::FlipY,
            _ => Symmetry::AntiTranspose,
        }
    }
}

/// A 5x5 two-color template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(pub u32);

/// Build a template from rows indexed `[dx + 2][dy + 2]`.
const fn from_rows(rows: [[u8; 5]; 5]) -> Pattern {
    let mut bits = 0u32;
    let mut a = 0;
    while a < 5 {
        let mut b = 0;
        while b < 5 {
            if rows[a][b] != 0 {
                bits |= 1 << (5 * a + b);
            }
            b += 1;
        }
        a += 1;
    }
    Pattern(bits)
}

impl Pattern {
    /// Default resource template.
    pub const RESOURCE: Pattern = from_rows([
        [1, 1, 0, 1, 1],
        [1, 0, 0, 0, 1],
        [0, 0, 1, 0, 0],
        [1, 0, 0, 0, 1],
        [1, 1, 0, 1, 1],
    ]);

    /// Default paint tower template.
    pub const PAINT_TOWER: Pattern = from_rows([
        [1, 0, 0, 0, 1],
        [0, 1, 0, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 0, 1, 0],
        [1, 0, 0, 0, 1],
    ]);

    /// Default money tower template.
    pub const MONEY_TOWER: Pattern = from_rows([
        [0, 1, 1, 1, 0],
        [1, 1, 0, 1, 1],
        [1, 0, 1, 0, 1],
        [1, 1, 0, 1, 1],
        [0, 1, 1, 1, 0],
    ]);

    /// Default defense tower template.
    ///
    /// Unlike the others it has no symmetry of its own, so each of the eight
    /// orientations marks a different layout.
    pub const DEFENSE_TOWER: Pattern = from_rows([
        [1, 1, 1, 0, 0],
        [1, 0, 1, 1, 0],
        [0, 0, 1, 0, 1],
        [0, 1, 1, 0, 1],
        [1, 0, 0, 1, 1],
    ]);

    /// Whether the bit at a template offset is set.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn bit(self, dx: i32, dy: i32) -> bool {
        let index = PATTERN_SIZE * (dx + HALF) + (dy + HALF);
        (self.0 >> index as u32) & 1 == 1
    }

    /// The color required at a template offset.
    #[must_use]
    pub const fn color(self, dx: i32, dy: i32) -> PaintColor {
        PaintColor::from_bit(self.bit(dx, dy))
    }

    /// The cells and colors that realize this template at `center` under
    /// `symmetry`. Each template offset `d` lands on `center + symmetry(d)`.
    #[must_use]
    pub fn stamp(self, center: MapLocation, symmetry: Symmetry) -> Vec<(MapLocation, PaintColor)> {
        offsets()
            .map(|(dx, dy)| {
                let (sx, sy) = symmetry.apply(dx, dy);
                (center.translate(sx, sy), self.color(dx, dy))
            })
            .collect()
    }
}

fn offsets() -> impl Iterator<Item = (i32, i32)> {
    (-HALF..=HALF).flat_map(|dx| (-HALF..=HALF).map(move |dy| (dx, dy)))
}

/// Whether `center` is far enough from every edge for a full 5x5 footprint.
#[must_use]
pub const fn is_valid_center(grid: &Grid, center: MapLocation) -> bool {
    center.x >= HALF
        && center.y >= HALF
        && center.x < grid.width() - HALF
        && center.y < grid.height() - HALF
}

/// Whether `team`'s paint around `center` matches `pattern` under any of
/// the eight symmetries. A ruin at the center is not checked.
#[must_use]
pub fn check_pattern(grid: &Grid, pattern: Pattern, team: Team, center: MapLocation) -> bool {
    let skip_center = grid.is_ruin(center);
    let mut alive = [true; 8];

    for (dx, dy) in offsets() {
        if skip_center && dx == 0 && dy == 0 {
            continue;
        }
        let wanted = Paint::Team(team, pattern.color(dx, dy));
        let mut any = false;
        for (slot, symmetry) in alive.iter_mut().zip(Symmetry::ALL) {
            if !*slot {
                continue;
            }
            let (sx, sy) = symmetry.apply(dx, dy);
            if grid.paint(center.translate(sx, sy)) == wanted {
                any = true;
            } else {
                *slot = false;
            }
        }
        if !any {
            return false;
        }
    }
    true
}

/// The templates in force for one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSet {
    /// Resource pattern template.
    pub resource: Pattern,
    /// Paint tower template.
    pub paint_tower: Pattern,
    /// Money tower template.
    pub money_tower: Pattern,
    /// Defense tower template.
    pub defense_tower: Pattern,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            resource: Pattern::RESOURCE,
            paint_tower: Pattern::PAINT_TOWER,
            money_tower: Pattern::MONEY_TOWER,
            defense_tower: Pattern::DEFENSE_TOWER,
        }
    }
}

impl PatternSet {
    /// The template for a tower family.
    #[must_use]
    pub const fn tower(&self, kind: TowerKind) -> Pattern {
        match kind {
            TowerKind::Paint => self.paint_tower,
            TowerKind::Money => self.money_tower,
            TowerKind::Defense => self.defense_tower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // L-shaped template, no nontrivial symmetry of its own.
    const ASYMMETRIC: Pattern = from_rows([
        [1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 1],
    ]);

    fn painted(pattern: Pattern, team: Team, center: MapLocation, symmetry: Symmetry) -> Grid {
        let mut grid = Grid::new(9, 9).unwrap();
        for (loc, color) in pattern.stamp(center, symmetry) {
            grid.set_paint(loc, Paint::Team(team, color));
        }
        grid
    }

    #[test]
    fn test_bit_layout() {
        assert!(ASYMMETRIC.bit(-2, -2));
        assert!(ASYMMETRIC.bit(-2, 2));
        assert!(!ASYMMETRIC.bit(2, -2));
        assert!(ASYMMETRIC.bit(2, 2));
        assert_eq!(ASYMMETRIC.0 & 1, 1);
        assert_eq!(ASYMMETRIC.0 >> 24, 1);
    }

    #[test]
    fn test_symmetries_are_distinct_bijections() {
        for symmetry in Symmetry::ALL {
            let mut seen = std::collections::HashSet::new();
            for (dx, dy) in offsets() {
                let (sx, sy) = symmetry.apply(dx, dy);
                assert!((-2..=2).contains(&sx) && (-2..=2).contains(&sy));
                seen.insert((sx, sy));
            }
            assert_eq!(seen.len(), 25);
        }
        let images: std::collections::HashSet<_> =
            Symmetry::ALL.iter().map(|s| s.apply(2, 1)).collect();
        assert_eq!(images.len(), 8);
    }

    #[test]
    fn test_stamp_matches_under_every_symmetry() {
        let center = MapLocation::new(4, 4);
        for symmetry in Symmetry::ALL {
            let grid = painted(ASYMMETRIC, Team::A, center, symmetry);
            assert!(check_pattern(&grid, ASYMMETRIC, Team::A, center), "{symmetry:?}");
            assert!(!check_pattern(&grid, ASYMMETRIC, Team::B, center));
        }
    }

    #[test]
    fn test_single_wrong_cell_breaks_match() {
        let center = MapLocation::new(4, 4);
        let mut grid = painted(ASYMMETRIC, Team::A, center, Symmetry::Identity);
        grid.set_paint(MapLocation::new(3, 3), Paint::Team(Team::A, PaintColor::Primary));
        assert!(!check_pattern(&grid, ASYMMETRIC, Team::A, center));
    }

    #[test]
    fn test_ruin_center_is_skipped() {
        let center = MapLocation::new(4, 4);
        let mut grid = painted(Pattern::MONEY_TOWER, Team::B, center, Symmetry::Identity);
        grid.set_paint(center, Paint::Empty);
        assert!(!check_pattern(&grid, Pattern::MONEY_TOWER, Team::B, center));
        grid.set_ruin(center, true);
        assert!(check_pattern(&grid, Pattern::MONEY_TOWER, Team::B, center));
    }

    #[test]
    fn test_defense_template_orientations_differ() {
        let center = MapLocation::new(4, 4);
        let layouts: std::collections::HashSet<Vec<(MapLocation, PaintColor)>> = Symmetry::ALL
            .iter()
            .map(|&symmetry| {
                let mut cells = Pattern::DEFENSE_TOWER.stamp(center, symmetry);
                cells.sort_by_key(|(loc, _)| (loc.x, loc.y));
                cells
            })
            .collect();
        assert_eq!(layouts.len(), 8);
        for symmetry in Symmetry::ALL {
            let grid = painted(Pattern::DEFENSE_TOWER, Team::B, center, symmetry);
            assert!(check_pattern(&grid, Pattern::DEFENSE_TOWER, Team::B, center));
        }
    }

    #[test]
    fn test_tower_templates_are_distinguishable() {
        let center = MapLocation::new(4, 4);
        let set = PatternSet::default();
        let mut grid = painted(set.paint_tower, Team::A, center, Symmetry::Identity);
        grid.set_ruin(center, true);
        assert!(check_pattern(&grid, set.tower(TowerKind::Paint), Team::A, center));
        assert!(!check_pattern(&grid, set.tower(TowerKind::Money), Team::A, center));
        assert!(!check_pattern(&grid, set.tower(TowerKind::Defense), Team::A, center));
    }

    #[test]
    fn test_valid_center() {
        let grid = Grid::new(20, 20).unwrap();
        assert!(is_valid_center(&grid, MapLocation::new(2, 2)));
        assert!(is_valid_center(&grid, MapLocation::new(17, 17)));
        assert!(!is_valid_center(&grid, MapLocation::new(1, 5)));
        assert!(!is_valid_center(&grid, MapLocation::new(5, 18)));
    }

    #[test]
    fn test_from_rotation() {
        assert_eq!(Symmetry::from_rotation(0, false), Symmetry::Identity);
        assert_eq!(Symmetry::from_rotation(5, false), Symmetry::Rot90);
        assert_eq!(Symmetry::from_rotation(3, true), Symmetry::AntiTranspose);
    }
}
