//! Fixed-length season timer and per-season field baselines

use super::phase::{Season, SeasonTable};
use crate::core_types::{clamp_unit, Cell};
use crate::error::{ensure_finite, ensure_positive, ensure_unit, ConfigError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Upper bound on season changes reported by one `advance` call
pub const MAX_SEASON_CHANGES_PER_ADVANCE: usize = 8;

/// Additive change applied to every cell when a season begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldNudge {
    pub water: f32,
    pub sunlight: f32,
    pub heat: f32,
}

impl FieldNudge {
    pub fn new(water: f32, sunlight: f32, heat: f32) -> Self {
        Self {
            water,
            sunlight,
            heat,
        }
    }

    /// Add the nudge to a cell and clamp the touched fields
    #[inline]
    pub fn apply(&self, cell: &mut Cell) {
        cell.water = clamp_unit(cell.water + self.water);
        cell.sunlight = clamp_unit(cell.sunlight + self.sunlight);
        cell.heat = clamp_unit(cell.heat + self.heat);
    }
}

/// What a season does to the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
    /// Applied once to every cell on entry
    pub nudge: FieldNudge,
    /// Sunlight level an unshaded cell relaxes toward
    pub open_sky_sunlight: f32,
}

/// Season clock parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Length of every season in seconds
    pub length_seconds: f32,
    /// Season the clock starts in
    pub initial: Season,
    pub profiles: SeasonTable<SeasonProfile>,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            length_seconds: 120.0,
            initial: Season::Spring,
            profiles: SeasonTable {
                spring: SeasonProfile {
                    nudge: FieldNudge::new(0.1, 0.0, 0.0),
                    open_sky_sunlight: 0.8,
                },
                summer: SeasonProfile {
                    nudge: FieldNudge::new(0.0, 0.1, 0.1),
                    open_sky_sunlight: 0.95,
                },
                autumn: SeasonProfile {
                    nudge: FieldNudge::new(0.05, -0.05, 0.0),
                    open_sky_sunlight: 0.7,
                },
                winter: SeasonProfile {
                    nudge: FieldNudge::new(0.0, -0.1, -0.15),
                    open_sky_sunlight: 0.55,
                },
            },
        }
    }
}

impl SeasonConfig {
    /// Check season length and profiles
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive season length, a non-finite nudge,
    /// or an open-sky sunlight level outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("seasons.length_seconds", self.length_seconds)?;
        for (_, profile) in self.profiles.iter() {
            ensure_finite("seasons.nudge.water", profile.nudge.water)?;
            ensure_finite("seasons.nudge.sunlight", profile.nudge.sunlight)?;
            ensure_finite("seasons.nudge.heat", profile.nudge.heat)?;
            ensure_unit("seasons.open_sky_sunlight", profile.open_sky_sunlight)?;
        }
        Ok(())
    }
}

/// One season rollover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonChange {
    pub from: Season,
    pub to: Season,
}

/// Cycles Spring → Summer → Autumn → Winter on a fixed timer
#[derive(Debug, Clone)]
pub struct SeasonClock {
    config: SeasonConfig,
    season: Season,
    /// Seconds into the current season
    elapsed: f32,
    /// Completed seasons since creation
    year_progress: u64,
}

impl SeasonClock {
    pub fn new(config: SeasonConfig) -> Self {
        info!(
            "Season clock starting in {} ({}s per season)",
            config.initial, config.length_seconds
        );
        Self {
            season: config.initial,
            config,
            elapsed: 0.0,
            year_progress: 0,
        }
    }

    /// Get the current season
    #[inline]
    pub fn season(&self) -> Season {
        self.season
    }

    /// Get the seconds spent in the current season
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Get the number of completed seasons
    #[inline]
    pub fn seasons_completed(&self) -> u64 {
        self.year_progress
    }

    /// Get the profile of the current season
    pub fn profile(&self) -> &SeasonProfile {
        self.config.profiles.get(self.season)
    }

    /// Get the profile of any season
    pub fn profile_for(&self, season: Season) -> &SeasonProfile {
        self.config.profiles.get(season)
    }

    /// Get the configuration
    pub fn config(&self) -> &SeasonConfig {
        &self.config
    }

    /// Advance the timer and report every rollover in order
    ///
    /// Non-positive or non-finite `dt` is ignored.
    pub fn advance(&mut self, dt: f32) -> Vec<SeasonChange> {
        let mut changes = Vec::new();
        if !(dt.is_finite() && dt > 0.0) {
            return changes;
        }

        let length = self.config.length_seconds;
        self.elapsed += dt;
        while self.elapsed >= length {
            if changes.len() == MAX_SEASON_CHANGES_PER_ADVANCE {
                warn!(
                    "Season advance hit {} changes; dropping {:.1}s of backlog",
                    MAX_SEASON_CHANGES_PER_ADVANCE, self.elapsed
                );
                self.elapsed %= length;
                break;
            }
            self.elapsed -= length;
            let from = self.season;
            self.season = from.next();
            self.year_progress += 1;
            info!("Season changed: {} -> {}", from, self.season);
            changes.push(SeasonChange {
                from,
                to: self.season,
            });
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_rolls_over() {
        let mut clock = SeasonClock::new(SeasonConfig::default());
        assert_eq!(clock.season(), Season::Spring);

        assert!(clock.advance(119.0).is_empty());
        let changes = clock.advance(2.0);
        assert_eq!(
            changes,
            vec![SeasonChange {
                from: Season::Spring,
                to: Season::Summer
            }]
        );
        assert_relative_eq!(clock.elapsed(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clock_reports_every_change() {
        let mut clock = SeasonClock::new(SeasonConfig::default());
        let changes = clock.advance(480.0);
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[3].to, Season::Spring);
        assert_eq!(clock.seasons_completed(), 4);
    }

    #[test]
    fn test_clock_caps_backlog() {
        let mut clock = SeasonClock::new(SeasonConfig::default());
        let changes = clock.advance(1.0e6);
        assert_eq!(changes.len(), MAX_SEASON_CHANGES_PER_ADVANCE);
        assert!(clock.elapsed() < 120.0);
    }

    #[test]
    fn test_clock_ignores_bad_dt() {
        let mut clock = SeasonClock::new(SeasonConfig::default());
        assert!(clock.advance(-5.0).is_empty());
        assert!(clock.advance(f32::INFINITY).is_empty());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_nudge_clamps() {
        let mut cell = Cell {
            water: 0.95,
            heat: 0.05,
            ..Cell::default()
        };
        FieldNudge::new(0.1, 0.0, -0.15).apply(&mut cell);
        assert_eq!(cell.water, 1.0);
        assert_eq!(cell.heat, 0.0);
        assert_eq!(cell.sunlight, 0.8);
    }

    #[test]
    fn test_validate() {
        assert!(SeasonConfig::default().validate().is_ok());
        let config = SeasonConfig {
            length_seconds: 0.0,
            ..SeasonConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = SeasonConfig::default();
        config.profiles.summer.open_sky_sunlight = 1.2;
        assert!(config.validate().is_err());
    }
}
