//! Pass 3: weather forcing
//!
//! The active phase adds a fixed per-tick delta to every cell. A thunderstorm also
//! strikes cells that are not already burning with a small independent chance.

use super::for_each_cell;
use super::rng::{CellRoller, LIGHTNING};
use crate::core_types::Cell;
use crate::error::{ensure_non_negative, ensure_unit, ConfigError};
use crate::weather::{FieldNudge, WeatherPhase};
use serde::{Deserialize, Serialize};

/// Per-tick weather deltas, all given as magnitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcingConfig {
    /// Water added while raining
    pub rain_water: f32,
    /// Water added during a thunderstorm
    pub thunderstorm_water: f32,
    /// Heat removed while snowing
    pub snow_cooling: f32,
    /// Water removed by wind
    pub wind_drying: f32,
    /// Sunlight removed by cloud cover (Rain, Thunderstorm, Snow)
    pub cloud_shade: f32,
    /// Per-cell, per-tick strike chance during a thunderstorm
    pub lightning_chance: f32,
    /// Minimum fuel of a struck cell
    pub lightning_fuel: f32,
}

impl Default for ForcingConfig {
    fn default() -> Self {
        Self {
            rain_water: 0.02,
            thunderstorm_water: 0.03,
            snow_cooling: 0.02,
            wind_drying: 0.005,
            cloud_shade: 0.02,
            lightning_chance: 0.0005,
            lightning_fuel: 0.8,
        }
    }
}

impl ForcingConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a negative delta or a chance or fuel outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("forcing.rain_water", self.rain_water)?;
        ensure_non_negative("forcing.thunderstorm_water", self.thunderstorm_water)?;
        ensure_non_negative("forcing.snow_cooling", self.snow_cooling)?;
        ensure_non_negative("forcing.wind_drying", self.wind_drying)?;
        ensure_non_negative("forcing.cloud_shade", self.cloud_shade)?;
        ensure_unit("forcing.lightning_chance", self.lightning_chance)?;
        ensure_unit("forcing.lightning_fuel", self.lightning_fuel)
    }

    /// Signed field delta for one tick of `phase`
    pub fn delta(&self, phase: WeatherPhase) -> FieldNudge {
        let mut delta = match phase {
            WeatherPhase::Clear => FieldNudge::default(),
            WeatherPhase::Rain => FieldNudge::new(self.rain_water, 0.0, 0.0),
            WeatherPhase::Thunderstorm => FieldNudge::new(self.thunderstorm_water, 0.0, 0.0),
            WeatherPhase::Wind => FieldNudge::new(-self.wind_drying, 0.0, 0.0),
            WeatherPhase::Snow => FieldNudge::new(0.0, 0.0, -self.snow_cooling),
        };
        if phase.is_cloudy() {
            delta.sunlight = -self.cloud_shade;
        }
        delta
    }
}

/// Whether lightning strikes cell `index` this tick
#[inline]
pub fn lightning_strikes(tick_seed: u64, index: usize, chance: f32) -> bool {
    CellRoller::new(tick_seed, index, LIGHTNING).chance(chance)
}

pub(crate) fn run(
    pre: &[Cell],
    next: &mut [Cell],
    phase: WeatherPhase,
    tick_seed: u64,
    config: &ForcingConfig,
    order: Option<&[usize]>,
) {
    let delta = config.delta(phase);
    let storm = phase == WeatherPhase::Thunderstorm;

    for_each_cell(next, order, |index, cell| {
        cell.water += delta.water;
        cell.sunlight += delta.sunlight;
        cell.heat += delta.heat;

        if storm
            && !pre[index].is_on_fire
            && lightning_strikes(tick_seed, index, config.lightning_chance)
        {
            cell.ignite(config.lightning_fuel);
        }
    });
}
