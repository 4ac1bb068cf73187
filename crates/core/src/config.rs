//! Session configuration bundle
//!
//! Every section lives next to the code it configures; this module only aggregates
//! them. All sections deserialize with defaults, so a partial document such as
//! `{"seed": 7, "grid": {"width": 64}}` is a complete configuration.

use crate::error::ConfigError;
use crate::grid::GridConfig;
use crate::simulation::{EngineConfig, RingSpreadConfig, TickRules};
use crate::weather::{SeasonConfig, WeatherConfig};
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Master seed; every random stream of the session derives from it
    pub seed: u64,
    pub grid: GridConfig,
    pub engine: EngineConfig,
    pub rules: TickRules,
    pub weather: WeatherConfig,
    pub seasons: SeasonConfig,
    pub ignition: RingSpreadConfig,
    /// Applied player actions kept for replay
    pub action_history: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            grid: GridConfig::default(),
            engine: EngineConfig::default(),
            rules: TickRules::default(),
            weather: WeatherConfig::default(),
            seasons: SeasonConfig::default(),
            ignition: RingSpreadConfig::default(),
            action_history: 10_000,
        }
    }
}

impl SimulationConfig {
    /// Default configuration with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check every section
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the grid, engine, rules,
    /// weather, seasons and ignition sections in that order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.engine.validate()?;
        self.rules.validate()?;
        self.weather.validate()?;
        self.seasons.validate()?;
        self.ignition.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert_eq!(SimulationConfig::with_seed(9).seed, 9);
    }

    #[test]
    fn test_first_error_is_reported() {
        let mut config = SimulationConfig::default();
        config.grid.width = 0;
        config.engine.tick_interval = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 32
            })
        );

        config.grid.width = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "engine.tick_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_nested_sections_are_checked() {
        let mut config = SimulationConfig::default();
        config.rules.fire.spread_chance = 2.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.seasons.length_seconds = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.ignition.step_delay = f32::NAN;
        assert!(config.validate().is_err());
    }
}
