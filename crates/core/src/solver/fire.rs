//! Pass 4: burning and contagion
//!
//! Only cells burning in the pre-tick snapshot burn this tick; anything ignited during
//! the tick starts burning on the next one. Contagion is a gather: every unburned plant
//! cell rolls once per burning neighbour that survives this tick's burn, so a fire
//! front advances at most one cell per tick and the result does not depend on visit
//! order.

use super::for_each_cell;
use super::rng::{CellRoller, CONTAGION};
use crate::core_types::{Cell, GrowthStage};
use crate::error::{ensure_non_negative, ensure_unit, ConfigError};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Fire behaviour parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Heat gained per tick while burning
    pub heat_gain: f32,
    /// Fuel consumed per tick
    pub burn_rate: f32,
    /// Fuel at or below which the fire goes out
    pub extinguish_threshold: f32,
    /// Per-tick ignition chance for each burning neighbour
    pub spread_chance: f32,
    /// Fuel given to a cell ignited by contagion
    pub spread_fuel: f32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            heat_gain: 0.1,
            burn_rate: 0.1,
            extinguish_threshold: 0.001,
            spread_chance: 0.15,
            spread_fuel: 1.0,
        }
    }
}

impl FireConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative rates or a chance or fuel outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("fire.heat_gain", self.heat_gain)?;
        ensure_non_negative("fire.burn_rate", self.burn_rate)?;
        ensure_unit("fire.extinguish_threshold", self.extinguish_threshold)?;
        ensure_unit("fire.spread_chance", self.spread_chance)?;
        ensure_unit("fire.spread_fuel", self.spread_fuel)
    }

    /// Whether a burning cell is still alight after this tick's burn
    #[inline]
    pub fn survives_burn(&self, cell: &Cell) -> bool {
        cell.is_on_fire && cell.fire_fuel - self.burn_rate > self.extinguish_threshold
    }
}

/// Burn one tick of a cell that was alight in the snapshot
///
/// Returns `true` when the fire went out.
pub fn burn(pre: &Cell, next: &mut Cell, config: &FireConfig) -> bool {
    next.heat += config.heat_gain;
    let fuel = pre.fire_fuel - config.burn_rate;

    if fuel > config.extinguish_threshold {
        next.is_on_fire = true;
        next.fire_fuel = fuel;
        return false;
    }

    next.extinguish();
    if pre.has_plant() {
        next.stage = GrowthStage::Burnt;
        next.durability = 0.0;
    }
    true
}

/// Contagion rolls for an unburned plant cell; `true` when it catches fire
pub fn catches_fire(
    grid: &CellGrid,
    x: usize,
    y: usize,
    tick_seed: u64,
    config: &FireConfig,
) -> bool {
    let index = grid.index(x, y);
    let mut roller = CellRoller::new(tick_seed, index, CONTAGION);
    let cells = grid.cells();

    grid.neighbors_of(x, y)
        .filter(|&(nx, ny)| config.survives_burn(&cells[grid.index(nx, ny)]))
        // Roll for every burning neighbour so the draw count is fixed per snapshot
        .fold(false, |caught, _| roller.chance(config.spread_chance) || caught)
}

pub(crate) fn run(
    grid: &CellGrid,
    next: &mut [Cell],
    tick_seed: u64,
    config: &FireConfig,
    order: Option<&[usize]>,
) {
    let width = grid.width();
    let cells = grid.cells();

    for_each_cell(next, order, |index, cell| {
        let pre = &cells[index];
        if pre.is_on_fire {
            burn(pre, cell, config);
        } else if pre.has_plant()
            && catches_fire(grid, index % width, index / width, tick_seed, config)
        {
            cell.ignite(config.spread_fuel);
        }
    });
}
