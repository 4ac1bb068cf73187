//! Fixed-size 2D cell grid with world mapping and neighbourhood queries
//!
//! Cells are stored row-major (`y * width + x`). World space is Y-up with the grid
//! lying in the XZ plane, its bottom-left corner at `origin`.

use crate::core_types::{Cell, GrowthStage, Vec3};
use crate::error::{ensure_finite, ensure_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Largest supported grid, in cells
pub const MAX_CELLS: usize = 1 << 22;

/// Moore neighbourhood offsets, row by row
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Grid dimensions and placement in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along world X
    pub width: usize,
    /// Cells along world Z
    pub height: usize,
    /// Edge length of one cell in world units
    pub cell_size: f32,
    /// World position of the grid's bottom-left corner
    pub origin: [f32; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            cell_size: 1.0,
            origin: [0.0; 3],
        }
    }
}

impl GridConfig {
    /// Check dimensions and placement
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero or oversized dimensions, a non-positive cell
    /// size, or a non-finite origin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        match self.width.checked_mul(self.height) {
            Some(n) if n <= MAX_CELLS => {}
            _ => {
                return Err(ConfigError::GridTooLarge {
                    width: self.width,
                    height: self.height,
                    max: MAX_CELLS,
                })
            }
        }
        ensure_positive("grid.cell_size", self.cell_size)?;
        for component in self.origin {
            ensure_finite("grid.origin", component)?;
        }
        Ok(())
    }
}

/// Aggregate counts over the whole grid, for HUDs and logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    /// Cell count per stage, indexed by [`GrowthStage::as_u8`]
    pub stage_counts: [usize; 6],
    /// Cells currently burning
    pub burning: usize,
    /// Mean water level
    pub mean_water: f32,
    /// Mean sunlight level
    pub mean_sunlight: f32,
    /// Mean heat level
    pub mean_heat: f32,
}

impl GridStats {
    /// Number of cells at `stage`
    pub fn count(&self, stage: GrowthStage) -> usize {
        self.stage_counts[usize::from(stage.as_u8())]
    }

    /// Number of cells carrying a living plant
    pub fn plants(&self) -> usize {
        GrowthStage::ALL
            .iter()
            .filter(|s| s.has_plant())
            .map(|&s| self.count(s))
            .sum()
    }
}

/// The simulation grid; exclusive owner of every [`Cell`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Vec3,
    /// Cells in row-major order: `[y * width + x]`
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a grid with every cell at its default state
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. Use [`GridConfig::validate`] on untrusted
    /// input first.
    pub fn new(width: usize, height: usize, cell_size: f32, origin: Vec3) -> Self {
        assert!(width > 0 && height > 0, "Grid dimensions must be non-zero");
        CellGrid {
            width,
            height,
            cell_size,
            origin,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Create a grid from a validated configuration
    pub fn from_config(config: &GridConfig) -> Self {
        let [ox, oy, oz] = config.origin;
        Self::new(
            config.width,
            config.height,
            config.cell_size,
            Vec3::new(ox, oy, oz),
        )
    }

    /// Cells along world X
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells along world Z
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge length of one cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of the bottom-left corner
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; grids are never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether signed coordinates fall inside `[0, width) × [0, height)`
    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Row-major index of in-bounds coordinates
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Coordinates of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Get cell at grid coordinates (bounds-checked)
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get mutable cell at grid coordinates (bounds-checked)
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to all cells, for whole-grid nudges
    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Exchange the cell storage with a same-sized back buffer
    pub(crate) fn swap_cells(&mut self, buffer: &mut Vec<Cell>) {
        debug_assert_eq!(buffer.len(), self.cells.len());
        std::mem::swap(&mut self.cells, buffer);
    }

    /// World position of a cell's centre
    pub fn cell_center(&self, x: usize, y: usize) -> Vec3 {
        self.origin
            + Vec3::new(
                (x as f32 + 0.5) * self.cell_size,
                0.0,
                (y as f32 + 0.5) * self.cell_size,
            )
    }

    /// Cell containing a world point, ignoring height
    ///
    /// Returns `None` when the floored coordinate falls outside the grid or the point is
    /// not finite.
    pub fn world_to_cell(&self, world: Vec3) -> Option<(usize, usize)> {
        let local = world - self.origin;
        let gx = (local.x / self.cell_size).floor();
        let gy = (local.z / self.cell_size).floor();

        if !(gx.is_finite() && gy.is_finite()) || gx < 0.0 || gy < 0.0 {
            return None;
        }
        let (ix, iy) = (gx as usize, gy as usize);
        (ix < self.width && iy < self.height).then_some((ix, iy))
    }

    fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// The in-bounds Moore neighbourhood of a cell (no wraparound)
    pub fn neighbors_of(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(x, y, dx, dy))
    }

    /// Number of Moore neighbours satisfying `predicate`
    pub fn count_neighbors<P>(&self, x: usize, y: usize, predicate: P) -> usize
    where
        P: Fn(&Cell) -> bool,
    {
        self.neighbors_of(x, y)
            .filter(|&(nx, ny)| predicate(&self.cells[self.index(nx, ny)]))
            .count()
    }

    /// In-bounds cells with Chebyshev distance at most `distance` from the centre
    pub fn within_chebyshev(
        &self,
        cx: usize,
        cy: usize,
        distance: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        let x0 = cx.saturating_sub(distance);
        let y0 = cy.saturating_sub(distance);
        let x1 = cx.saturating_add(distance).min(self.width - 1);
        let y1 = cy.saturating_add(distance).min(self.height - 1);

        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }

    /// In-bounds cells at exactly Chebyshev distance `distance` from the centre
    pub fn chebyshev_ring(
        &self,
        cx: usize,
        cy: usize,
        distance: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.within_chebyshev(cx, cy, distance)
            .filter(move |&(x, y)| x.abs_diff(cx).max(y.abs_diff(cy)) == distance)
    }

    /// Aggregate stage counts and mean fields
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats::default();
        let (mut water, mut sunlight, mut heat) = (0.0_f64, 0.0_f64, 0.0_f64);

        for cell in &self.cells {
            stats.stage_counts[usize::from(cell.stage.as_u8())] += 1;
            if cell.is_on_fire {
                stats.burning += 1;
            }
            water += f64::from(cell.water);
            sunlight += f64::from(cell.sunlight);
            heat += f64::from(cell.heat);
        }

        let n = self.cells.len() as f64;
        stats.mean_water = (water / n) as f32;
        stats.mean_sunlight = (sunlight / n) as f32;
        stats.mean_heat = (heat / n) as f32;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> CellGrid {
        CellGrid::new(width, height, 2.0, Vec3::new(10.0, 0.0, -4.0))
    }

    #[test]
    fn test_grid_creation() {
        let grid = grid(8, 4);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.len(), 32);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_cell_access() {
        let mut grid = grid(8, 4);
        if let Some(cell) = grid.cell_mut(5, 3) {
            cell.water = 0.9;
        }
        assert_eq!(grid.cell(5, 3).unwrap().water, 0.9);
        assert_eq!(grid.cells()[grid.index(5, 3)].water, 0.9);
        assert!(grid.cell(8, 0).is_none());
        assert!(grid.cell_mut(0, 4).is_none());
        assert_eq!(grid.coords(grid.index(5, 3)), (5, 3));
    }

    #[test]
    fn test_in_bounds() {
        let grid = grid(8, 4);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(7, 3));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(8, 0));
        assert!(!grid.in_bounds(0, 4));
    }

    #[test]
    fn test_world_round_trip_through_cell_center() {
        let grid = grid(8, 4);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert_eq!(grid.world_to_cell(grid.cell_center(x, y)), Some((x, y)));
            }
        }
    }

    #[test]
    fn test_world_to_cell_rejects_outside_points() {
        let grid = grid(8, 4);
        // Origin x=10, so anything left of it is outside
        assert_eq!(grid.world_to_cell(Vec3::new(9.99, 0.0, 0.0)), None);
        // Far edge: 10 + 8*2 = 26
        assert_eq!(grid.world_to_cell(Vec3::new(26.0, 0.0, 0.0)), None);
        assert_eq!(grid.world_to_cell(Vec3::new(25.99, 5.0, 3.99)), Some((7, 3)));
        assert_eq!(grid.world_to_cell(Vec3::new(f32::NAN, 0.0, 0.0)), None);
    }

    #[test]
    fn test_neighbors_clipped_at_edges() {
        let grid = grid(8, 4);
        assert_eq!(grid.neighbors_of(0, 0).count(), 3);
        assert_eq!(grid.neighbors_of(3, 0).count(), 5);
        assert_eq!(grid.neighbors_of(3, 2).count(), 8);
        assert_eq!(grid.neighbors_of(7, 3).count(), 3);
        assert!(grid.neighbors_of(3, 2).all(|n| n != (3, 2)));
    }

    #[test]
    fn test_count_neighbors() {
        let mut grid = grid(8, 4);
        for (x, y) in [(2, 1), (4, 1), (3, 2), (0, 0)] {
            grid.cell_mut(x, y).unwrap().stage = GrowthStage::SmallPlant;
        }
        let count = grid.count_neighbors(3, 1, |c| c.stage == GrowthStage::SmallPlant);
        assert_eq!(count, 3);
        assert_eq!(grid.count_neighbors(6, 3, Cell::has_plant), 0);
    }

    #[test]
    fn test_chebyshev_ring_and_disc() {
        let grid = grid(16, 16);
        assert_eq!(grid.chebyshev_ring(4, 4, 0).count(), 1);
        assert_eq!(grid.chebyshev_ring(4, 4, 1).count(), 8);
        assert_eq!(grid.chebyshev_ring(4, 4, 3).count(), 24);
        assert_eq!(grid.within_chebyshev(4, 4, 3).count(), 49);
        // Clipped at the corner: rows/cols 0..=2 minus the centre
        assert_eq!(grid.chebyshev_ring(0, 0, 2).count(), 5);
        assert_eq!(grid.within_chebyshev(0, 0, 2).count(), 9);
    }

    #[test]
    fn test_stats() {
        let mut grid = grid(4, 4);
        grid.cell_mut(0, 0).unwrap().stage = GrowthStage::SmallPlant;
        grid.cell_mut(1, 0).unwrap().stage = GrowthStage::LargeTree;
        grid.cell_mut(2, 0).unwrap().scorch();
        grid.cell_mut(3, 0).unwrap().ignite(1.0);

        let stats = grid.stats();
        assert_eq!(stats.count(GrowthStage::Empty), 13);
        assert_eq!(stats.count(GrowthStage::Burnt), 1);
        assert_eq!(stats.plants(), 2);
        assert_eq!(stats.burning, 1);
        assert!((stats.mean_water - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_config_validation() {
        assert!(GridConfig::default().validate().is_ok());
        let empty = GridConfig {
            width: 0,
            ..GridConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyGrid { .. })));
        let huge = GridConfig {
            width: usize::MAX,
            height: 2,
            ..GridConfig::default()
        };
        assert!(matches!(huge.validate(), Err(ConfigError::GridTooLarge { .. })));
        let flat = GridConfig {
            cell_size: 0.0,
            ..GridConfig::default()
        };
        assert!(flat.validate().is_err());
    }
}
