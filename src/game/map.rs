//! The spatial grid: terrain, paint, markers and occupancy.

use crate::game::{MapLocation, Paint, PaintColor, Team, UnitId};

/// A single cell on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    /// Impassable, unpaintable terrain.
    pub wall: bool,
    /// Tower site. Impassable for robots, unpaintable.
    pub ruin: bool,
    /// Current paint.
    pub paint: Paint,
    /// The unit standing here, if any.
    pub occupant: Option<UnitId>,
    /// One marker slot per team, indexed by [`Team::index`].
    pub markers: [Option<PaintColor>; 2],
}

impl Cell {
    /// Whether paint may ever be applied here.
    #[must_use]
    pub const fn is_paintable(&self) -> bool {
        !self.wall && !self.ruin
    }

    /// Whether a robot may ever stand here.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        !self.wall && !self.ruin
    }
}

/// The game grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width in cells.
    width: i32,
    /// Height in cells.
    height: i32,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of empty, passable cells.
    ///
    /// Returns `None` if either dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let size = usize::try_from(width).ok()? * usize::try_from(height).ok()?;
        Some(Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        })
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether a location lies on the grid.
    #[must_use]
    pub const fn on_map(&self, loc: MapLocation) -> bool {
        loc.x >= 0 && loc.y >= 0 && loc.x < self.width && loc.y < self.height
    }

    /// Row-major index of a location.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(&self, loc: MapLocation) -> Option<usize> {
        if self.on_map(loc) {
            Some(loc.y as usize * self.width as usize + loc.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Grid::index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn location(&self, idx: usize) -> MapLocation {
        let width = self.width as usize;
        MapLocation::new((idx % width) as i32, (idx / width) as i32)
    }

    /// The cell at a location.
    #[must_use]
    pub fn cell(&self, loc: MapLocation) -> Option<&Cell> {
        self.index(loc).map(|idx| &self.cells[idx])
    }

    fn cell_mut(&mut self, loc: MapLocation) -> Option<&mut Cell> {
        self.index(loc).map(|idx| &mut self.cells[idx])
    }

    /// Whether a robot could stand here, ignoring occupancy.
    #[must_use]
    pub fn is_passable(&self, loc: MapLocation) -> bool {
        self.cell(loc).is_some_and(Cell::is_passable)
    }

    /// Whether the cell accepts paint.
    #[must_use]
    pub fn is_paintable(&self, loc: MapLocation) -> bool {
        self.cell(loc).is_some_and(Cell::is_paintable)
    }

    /// Whether the cell is a wall.
    #[must_use]
    pub fn is_wall(&self, loc: MapLocation) -> bool {
        self.cell(loc).is_some_and(|c| c.wall)
    }

    /// Whether the cell is a ruin.
    #[must_use]
    pub fn is_ruin(&self, loc: MapLocation) -> bool {
        self.cell(loc).is_some_and(|c| c.ruin)
    }

    /// The unit standing at a location.
    #[must_use]
    pub fn occupant(&self, loc: MapLocation) -> Option<UnitId> {
        self.cell(loc).and_then(|c| c.occupant)
    }

    /// Paint at a location; off-map cells read as empty.
    #[must_use]
    pub fn paint(&self, loc: MapLocation) -> Paint {
        self.cell(loc).map_or(Paint::Empty, |c| c.paint)
    }

    /// A team's marker at a location.
    #[must_use]
    pub fn marker(&self, loc: MapLocation, team: Team) -> Option<PaintColor> {
        self.cell(loc).and_then(|c| c.markers[team.index()])
    }

    /// Mark a cell as wall.
    pub fn set_wall(&mut self, loc: MapLocation, wall: bool) -> bool {
        self.cell_mut(loc).map(|c| c.wall = wall).is_some()
    }

    /// Mark a cell as ruin.
    pub fn set_ruin(&mut self, loc: MapLocation, ruin: bool) -> bool {
        self.cell_mut(loc).map(|c| c.ruin = ruin).is_some()
    }

    /// Overwrite paint and return the previous value.
    ///
    /// This is a raw write: team tallies are kept by
    /// [`World::paint_cell`](crate::game::World::paint_cell).
    pub fn set_paint(&mut self, loc: MapLocation, paint: Paint) -> Option<Paint> {
        self.cell_mut(loc)
            .map(|c| std::mem::replace(&mut c.paint, paint))
    }

    /// Overwrite the occupant and return the previous one.
    pub fn set_occupant(&mut self, loc: MapLocation, unit: Option<UnitId>) -> Option<UnitId> {
        self.cell_mut(loc)
            .and_then(|c| std::mem::replace(&mut c.occupant, unit))
    }

    /// Overwrite a team's marker.
    pub fn set_marker(&mut self, loc: MapLocation, team: Team, color: Option<PaintColor>) -> bool {
        self.cell_mut(loc)
            .map(|c| c.markers[team.index()] = color)
            .is_some()
    }

    /// All on-map locations with squared distance to `center` of at most
    /// `radius_squared`, ordered by x then y.
    #[must_use]
    pub fn locations_within_radius_squared(
        &self,
        center: MapLocation,
        radius_squared: u32,
    ) -> Vec<MapLocation> {
        let reach = ceil_sqrt(radius_squared) + 1;
        let min_x = center.x.saturating_sub(reach).max(0);
        let max_x = center.x.saturating_add(reach).min(self.width - 1);
        let min_y = center.y.saturating_sub(reach).max(0);
        let max_y = center.y.saturating_add(reach).min(self.height - 1);

        let mut result = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                let loc = MapLocation::new(x, y);
                if center.distance_squared_to(loc) <= radius_squared {
                    result.push(loc);
                }
            }
        }
        result
    }

    /// Iterate over all locations and cells.
    pub fn iter(&self) -> impl Iterator<Item = (MapLocation, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.location(idx), cell))
    }

    /// Number of cells that can hold paint.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn paintable_cells(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_paintable()).count() as u32
    }

    /// Number of cells painted by `team`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count_painted(&self, team: Team) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.paint.is_owned_by(team))
            .count() as u32
    }
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn ceil_sqrt(value: u32) -> i32 {
    let root = value.isqrt();
    if root * root == value {
        root as i32
    } else {
        root as i32 + 1
    }
}
