//! Global weather and seasons
//!
//! The [`WeatherScheduler`] and [`SeasonClock`] each run on their own timer and are
//! read-only inputs to the tick pipeline.

pub mod phase;
pub mod scheduler;
pub mod season;

pub use phase::{PhaseTable, Season, SeasonTable, WeatherEvent, WeatherPhase};
pub use scheduler::{
    pick_base_phase, DurationRange, PhaseWeights, WeatherConfig, WeatherScheduler,
    MAX_TRANSITIONS_PER_ADVANCE, MIN_PHASE_SECONDS,
};
pub use season::{FieldNudge, SeasonChange, SeasonClock, SeasonConfig, SeasonProfile};
