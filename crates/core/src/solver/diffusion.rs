//! Pass 1: water and heat diffusion
//!
//! Each cell blends toward the mean of its in-bounds 3×3 neighbourhood (itself
//! included): `new = lerp(old, mean, α)`.

use super::for_each_cell;
use crate::core_types::Cell;
use crate::error::{ensure_finite, ConfigError};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Diffusion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionConfig {
    /// Blend factor α toward the neighbourhood mean, clamped to `[0, 1]` at use
    pub rate: f32,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self { rate: 0.1 }
    }
}

impl DiffusionConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("diffusion.rate", self.rate)
    }
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Diffused `(water, heat)` for the cell at `(x, y)`, read from the pre-tick grid
pub fn diffuse_cell(grid: &CellGrid, x: usize, y: usize, rate: f32) -> (f32, f32) {
    let alpha = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let own = &grid.cells()[grid.index(x, y)];

    let (mut water, mut heat, mut count) = (own.water, own.heat, 1u32);
    for (nx, ny) in grid.neighbors_of(x, y) {
        let n = &grid.cells()[grid.index(nx, ny)];
        water += n.water;
        heat += n.heat;
        count += 1;
    }
    let count = count as f32;

    (
        lerp(own.water, water / count, alpha),
        lerp(own.heat, heat / count, alpha),
    )
}

pub(crate) fn run(grid: &CellGrid, next: &mut [Cell], config: &DiffusionConfig, order: Option<&[usize]>) {
    let width = grid.width();
    for_each_cell(next, order, |index, cell| {
        let (water, heat) = diffuse_cell(grid, index % width, index / width, config.rate);
        cell.water = water;
        cell.heat = heat;
    });
}
