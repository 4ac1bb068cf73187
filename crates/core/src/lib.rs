//! Grove Simulation Core Library
//!
//! Tick-driven ecosystem simulation for a grow/burn/water sandbox: a 2D grid of
//! cells carrying water, sunlight and heat fields plus a plant growth stage, updated
//! by coupled per-cell rules under a global weather phase and a season cycle.
//!
//! ## Overview
//!
//! - [`grid`]: fixed-size cell grid, world mapping, neighbourhood queries
//! - [`weather`]: weather phase scheduler with thunderstorm escalation, season clock
//! - [`solver`]: the per-cell passes (diffusion, shading, forcing, fire, growth)
//! - [`simulation`]: double-buffered tick engine, ring-spread ignition, action
//!   queue and the owning [`Session`]
//!
//! ## Usage
//!
//! ```rust
//! use grove_sim_core::{Session, SimulationConfig, Vec3};
//!
//! let mut session = Session::new(SimulationConfig::with_seed(42)).unwrap();
//! session.place_seed_at(Vec3::new(3.5, 0.0, 3.5));
//! session.update(0.016);
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

pub mod config;
pub mod core_types;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod solver;
pub mod weather;

pub use config::SimulationConfig;
pub use core_types::{Cell, GrowthStage, Vec3};
pub use error::ConfigError;
pub use grid::{CellGrid, GridConfig, GridStats};
pub use simulation::{
    EngineConfig, IgnitionController, PlayerAction, PlayerActionType, RingSpreadConfig,
    Session, SimulationEngine, TickInputs, TickReport, TickRules,
};
pub use solver::{
    DiffusionConfig, FireConfig, ForcingConfig, GrowthConfig, NeighborKind, ShadingConfig,
    StageGate,
};
pub use weather::{
    DurationRange, FieldNudge, PhaseWeights, Season, SeasonClock, SeasonConfig, SeasonProfile,
    WeatherConfig, WeatherEvent, WeatherPhase, WeatherScheduler,
};
