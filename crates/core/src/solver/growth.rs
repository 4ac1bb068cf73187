//! Pass 5: birth, health and stage advancement
//!
//! Reads the pre-tick cell and neighbours, writes the next buffer after the fire pass.
//! Planted cells never revert to `Empty`; bad conditions only wear down durability and
//! success.

use super::for_each_cell;
use super::rng::{CellRoller, GROWTH};
use crate::core_types::{Cell, GrowthStage};
use crate::error::{ensure_non_negative, ensure_ordered, ensure_unit, ConfigError};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Which neighbours count toward a stage gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborKind {
    /// Only `SmallPlant` neighbours
    SmallPlant,
    /// Any neighbour carrying a plant
    AnyPlant,
}

impl NeighborKind {
    #[inline]
    fn matches(self, cell: &Cell) -> bool {
        match self {
            NeighborKind::SmallPlant => cell.stage == GrowthStage::SmallPlant,
            NeighborKind::AnyPlant => cell.has_plant(),
        }
    }
}

/// Neighbour requirement for advancing out of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageGate {
    pub kind: NeighborKind,
    pub min_neighbors: usize,
}

impl StageGate {
    pub fn new(kind: NeighborKind, min_neighbors: usize) -> Self {
        Self {
            kind,
            min_neighbors,
        }
    }
}

/// Growth parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Water band considered healthy
    pub water_min: f32,
    pub water_max: f32,
    /// Minimum healthy sunlight
    pub sunlight_min: f32,
    /// Heat band considered healthy
    pub heat_min: f32,
    pub heat_max: f32,
    /// `SmallPlant` neighbour band that lets an empty cell sprout
    pub birth_min_neighbors: usize,
    pub birth_max_neighbors: usize,
    /// Success added on birth
    pub birth_success_bonus: f32,
    /// Base advancement chance, scaled by success
    pub growth_chance: f32,
    /// Plant neighbours at which crowding applies
    pub crowding_threshold: usize,
    /// Multiplier on the growth chance when crowded
    pub crowding_penalty: f32,
    /// Durability below which a plant is unhealthy
    pub healthy_durability: f32,
    /// Durability lost per unhealthy tick
    pub durability_decay: f32,
    /// Success lost per unhealthy tick
    pub success_decay: f32,
    /// Success gained per healthy tick
    pub success_gain: f32,
    /// Durability regained per healthy tick
    pub durability_recovery: f32,
    /// Success regained per tick by burnt ground
    pub burnt_recovery: f32,
    /// Cap for burnt-ground success recovery
    pub burnt_success_cap: f32,
    /// Gate out of `SmallPlant`
    pub to_small_tree: StageGate,
    /// Gate out of `SmallTree`
    pub to_medium_tree: StageGate,
    /// Gate out of `MediumTree`
    pub to_large_tree: StageGate,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            water_min: 0.15,
            water_max: 0.9,
            sunlight_min: 0.4,
            heat_min: 0.05,
            heat_max: 0.7,
            birth_min_neighbors: 2,
            birth_max_neighbors: 4,
            birth_success_bonus: 0.05,
            growth_chance: 0.05,
            crowding_threshold: 6,
            crowding_penalty: 0.5,
            healthy_durability: 0.3,
            durability_decay: 0.02,
            success_decay: 0.01,
            success_gain: 0.005,
            durability_recovery: 0.005,
            burnt_recovery: 0.01,
            burnt_success_cap: 0.5,
            to_small_tree: StageGate::new(NeighborKind::SmallPlant, 2),
            to_medium_tree: StageGate::new(NeighborKind::SmallPlant, 3),
            to_large_tree: StageGate::new(NeighborKind::AnyPlant, 3),
        }
    }
}

impl GrowthConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for inverted bands, probabilities or levels outside
    /// `[0, 1]`, or negative per-tick rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("growth.water_min", self.water_min)?;
        ensure_unit("growth.water_max", self.water_max)?;
        ensure_ordered("growth.water", self.water_min, self.water_max)?;
        ensure_unit("growth.sunlight_min", self.sunlight_min)?;
        ensure_unit("growth.heat_min", self.heat_min)?;
        ensure_unit("growth.heat_max", self.heat_max)?;
        ensure_ordered("growth.heat", self.heat_min, self.heat_max)?;
        ensure_ordered(
            "growth.birth_neighbors",
            self.birth_min_neighbors as f32,
            self.birth_max_neighbors as f32,
        )?;
        ensure_unit("growth.birth_success_bonus", self.birth_success_bonus)?;
        ensure_unit("growth.growth_chance", self.growth_chance)?;
        ensure_unit("growth.crowding_penalty", self.crowding_penalty)?;
        ensure_unit("growth.healthy_durability", self.healthy_durability)?;
        ensure_non_negative("growth.durability_decay", self.durability_decay)?;
        ensure_non_negative("growth.success_decay", self.success_decay)?;
        ensure_non_negative("growth.success_gain", self.success_gain)?;
        ensure_non_negative("growth.durability_recovery", self.durability_recovery)?;
        ensure_non_negative("growth.burnt_recovery", self.burnt_recovery)?;
        ensure_unit("growth.burnt_success_cap", self.burnt_success_cap)
    }

    /// Number of environment checks (water, sun, heat) the cell passes
    pub fn checks_passed(&self, cell: &Cell) -> u8 {
        let water_ok = (self.water_min..=self.water_max).contains(&cell.water);
        let sun_ok = cell.sunlight >= self.sunlight_min;
        let heat_ok = (self.heat_min..=self.heat_max).contains(&cell.heat);
        u8::from(water_ok) + u8::from(sun_ok) + u8::from(heat_ok)
    }

    /// Gate for advancing out of `stage`, if the stage can advance at all
    pub fn gate(&self, stage: GrowthStage) -> Option<StageGate> {
        match stage {
            GrowthStage::SmallPlant => Some(self.to_small_tree),
            GrowthStage::SmallTree => Some(self.to_medium_tree),
            GrowthStage::MediumTree => Some(self.to_large_tree),
            GrowthStage::Empty | GrowthStage::LargeTree | GrowthStage::Burnt => None,
        }
    }
}

/// Apply one growth tick to the cell at `(x, y)`
///
/// `next` already carries the results of the earlier passes; the environment checks
/// and neighbour counts read the pre-tick grid.
pub fn grow_cell(
    grid: &CellGrid,
    x: usize,
    y: usize,
    next: &mut Cell,
    tick_seed: u64,
    config: &GrowthConfig,
) {
    let index = grid.index(x, y);
    let pre = &grid.cells()[index];

    // Burnt ground, including cells that burnt out earlier this tick
    if next.stage == GrowthStage::Burnt {
        if next.success < config.burnt_success_cap {
            next.success = (next.success + config.burnt_recovery).min(config.burnt_success_cap);
        }
        return;
    }

    if pre.is_on_fire || next.is_on_fire {
        return;
    }

    let checks = config.checks_passed(pre);

    if pre.stage == GrowthStage::Empty {
        let seedlings = grid.count_neighbors(x, y, |n| n.stage == GrowthStage::SmallPlant);
        let in_band =
            (config.birth_min_neighbors..=config.birth_max_neighbors).contains(&seedlings);
        if in_band && checks >= 2 {
            next.stage = GrowthStage::SmallPlant;
            next.durability = 1.0;
            next.success = pre.success + config.birth_success_bonus;
        }
        return;
    }

    if checks < 2 || pre.durability < config.healthy_durability {
        next.durability -= config.durability_decay;
        next.success -= config.success_decay;
        return;
    }

    next.success += config.success_gain;
    next.durability += config.durability_recovery;

    let (Some(gate), Some(advanced)) = (config.gate(pre.stage), pre.stage.next()) else {
        return;
    };

    let mut chance = config.growth_chance * pre.success;
    if grid.count_neighbors(x, y, Cell::has_plant) >= config.crowding_threshold {
        chance *= config.crowding_penalty;
    }

    if CellRoller::new(tick_seed, index, GROWTH).chance(chance)
        && grid.count_neighbors(x, y, |n| gate.kind.matches(n)) >= gate.min_neighbors
    {
        next.stage = advanced;
    }
}

pub(crate) fn run(
    grid: &CellGrid,
    next: &mut [Cell],
    tick_seed: u64,
    config: &GrowthConfig,
    order: Option<&[usize]>,
) {
    let width = grid.width();
    for_each_cell(next, order, |index, cell| {
        grow_cell(grid, index % width, index / width, cell, tick_seed, config);
    });
}
