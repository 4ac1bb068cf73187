//! Pass 2: canopy shading
//!
//! Sunlight first relaxes toward the season's open-sky level, then every adjacent
//! `LargeTree` removes `shade_factor` of it, up to total shade.

use super::for_each_cell;
use crate::core_types::{Cell, GrowthStage};
use crate::error::{ensure_unit, ConfigError};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Shading parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Fraction of light blocked per neighbouring large tree
    pub shade_factor: f32,
    /// Per-tick relaxation toward the open-sky level
    pub sunlight_recovery: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            shade_factor: 0.15,
            sunlight_recovery: 0.1,
        }
    }
}

impl ShadingConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfUnitRange`] when either factor leaves `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("shading.shade_factor", self.shade_factor)?;
        ensure_unit("shading.sunlight_recovery", self.sunlight_recovery)
    }
}

/// Sunlight after recovery and shading by `large_trees` neighbours
#[inline]
pub fn shaded_sunlight(sunlight: f32, open_sky: f32, large_trees: usize, config: &ShadingConfig) -> f32 {
    let relaxed = sunlight + (open_sky - sunlight) * config.sunlight_recovery;
    let shade = (large_trees as f32 * config.shade_factor).min(1.0);
    relaxed * (1.0 - shade)
}

pub(crate) fn run(
    grid: &CellGrid,
    next: &mut [Cell],
    open_sky: f32,
    config: &ShadingConfig,
    order: Option<&[usize]>,
) {
    let width = grid.width();
    for_each_cell(next, order, |index, cell| {
        let (x, y) = (index % width, index / width);
        let large = grid.count_neighbors(x, y, |n| n.stage == GrowthStage::LargeTree);
        cell.sunlight = shaded_sunlight(grid.cells()[index].sunlight, open_sky, large, config);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_sky_cell_is_stable() {
        let config = ShadingConfig::default();
        assert_relative_eq!(shaded_sunlight(0.8, 0.8, 0, &config), 0.8);
    }

    #[test]
    fn test_shade_scales_with_large_trees() {
        let config = ShadingConfig {
            shade_factor: 0.2,
            sunlight_recovery: 0.0,
        };
        assert_relative_eq!(shaded_sunlight(1.0, 1.0, 2, &config), 0.6, epsilon = 1e-6);
        assert_eq!(shaded_sunlight(1.0, 1.0, 5, &config), 0.0);
        assert_eq!(shaded_sunlight(1.0, 1.0, 8, &config), 0.0);
    }

    #[test]
    fn test_only_large_trees_shade() {
        let mut grid = CellGrid::new(3, 3, 1.0, Vec3::zeros());
        for (x, y) in [(0, 0), (1, 0), (2, 0)] {
            if let Some(c) = grid.cell_mut(x, y) {
                c.stage = GrowthStage::MediumTree;
            }
        }
        if let Some(c) = grid.cell_mut(0, 2) {
            c.stage = GrowthStage::LargeTree;
        }

        let config = ShadingConfig::default();
        let mut next = grid.cells().to_vec();
        run(&grid, &mut next, 0.8, &config, None);

        let centre = next[grid.index(1, 1)];
        assert_relative_eq!(centre.sunlight, 0.8 * 0.85, epsilon = 1e-6);
        // The tree does not shade itself
        assert_relative_eq!(next[grid.index(0, 2)].sunlight, 0.8, epsilon = 1e-6);
    }
}
