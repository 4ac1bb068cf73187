//! Simulation session
//!
//! A [`Session`] owns one independent simulation: the grid, the tick engine, the
//! weather scheduler, the season clock, the ring-spread controller and the player
//! action queue. Several sessions can live in one process.
//!
//! `update(dt)` advances everything in a fixed order:
//!
//! 1. queued player actions, in submission order
//! 2. the season clock (season changes nudge every cell)
//! 3. the weather scheduler
//! 4. the ring spread
//! 5. the tick engine, which reads the phase and season that are current after 2 and 3

pub mod action_queue;
pub mod engine;
pub mod ignition;

pub use action_queue::{ActionQueue, PlayerAction, PlayerActionType};
pub use engine::{EngineConfig, SimulationEngine, TickInputs, TickReport, TickRules};
pub use ignition::{IgnitionController, RingSpreadConfig};

use crate::config::SimulationConfig;
use crate::core_types::{clamp_unit, Cell, Vec3};
use crate::error::ConfigError;
use crate::grid::{CellGrid, GridStats};
use crate::solver::rng::splitmix64;
use crate::weather::{
    Season, SeasonChange, SeasonClock, WeatherEvent, WeatherPhase, WeatherScheduler,
};
use rayon::prelude::*;
use tracing::{debug, info, trace};

/// Salts separating the random streams derived from the master seed
const WEATHER_STREAM: u64 = 0x7765_6174_6865_7200;
const ENGINE_STREAM: u64 = 0x656e_6769_6e65_0000;

/// One independent ecosystem simulation
#[derive(Debug, Clone)]
pub struct Session {
    grid: CellGrid,
    engine: SimulationEngine,
    weather: WeatherScheduler,
    seasons: SeasonClock,
    ignition: IgnitionController,
    actions: ActionQueue,
    /// Simulation time in seconds
    time: f32,
    seed: u64,
}

impl Session {
    /// Build a session from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any configuration section is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let SimulationConfig {
            seed,
            grid,
            engine,
            rules,
            weather,
            seasons,
            ignition,
            action_history,
        } = config;

        let session = Self {
            grid: CellGrid::from_config(&grid),
            engine: SimulationEngine::new(engine, rules, splitmix64(seed ^ ENGINE_STREAM)),
            weather: WeatherScheduler::new(weather, splitmix64(seed ^ WEATHER_STREAM)),
            seasons: SeasonClock::new(seasons),
            ignition: IgnitionController::new(ignition),
            actions: ActionQueue::new(action_history),
            time: 0.0,
            seed,
        };

        info!(
            "Session created: {}x{} grid, cell_size={:.2}, seed={}",
            session.grid.width(),
            session.grid.height(),
            session.grid.cell_size(),
            seed
        );
        Ok(session)
    }

    /// Advance the whole simulation by `dt` seconds of frame time
    ///
    /// Returns the reports of the ticks that ran. Non-positive or non-finite `dt` only
    /// applies queued actions.
    pub fn update(&mut self, dt: f32) -> Vec<TickReport> {
        self.apply_pending_actions();

        if !(dt.is_finite() && dt > 0.0) {
            return Vec::new();
        }
        self.time += dt;

        self.advance_seasons(dt);
        self.advance_weather(dt);
        self.advance_ignition(dt);
        self.tick(dt)
    }

    /// Advance the season clock, nudging every cell on each season change
    pub fn advance_seasons(&mut self, dt: f32) -> Vec<SeasonChange> {
        let changes = self.seasons.advance(dt);
        for change in &changes {
            let nudge = self.seasons.profile_for(change.to).nudge;
            self.grid
                .cells_mut()
                .par_iter_mut()
                .for_each(|cell| nudge.apply(cell));
            self.weather.push_event(WeatherEvent::SeasonChanged {
                from: change.from,
                to: change.to,
            });
        }
        changes
    }

    /// Advance the weather scheduler under the current season
    pub fn advance_weather(&mut self, dt: f32) {
        self.weather.advance(dt, self.seasons.season());
    }

    /// Advance the active ring spread
    pub fn advance_ignition(&mut self, dt: f32) {
        self.ignition.advance(&mut self.grid, dt);
    }

    /// Accumulate frame time into the engine and run the ticks that are due
    pub fn tick(&mut self, dt: f32) -> Vec<TickReport> {
        let inputs = self.tick_inputs();
        self.engine.tick(&mut self.grid, dt, inputs)
    }

    /// Run exactly one discrete tick
    pub fn step(&mut self) -> TickReport {
        let inputs = self.tick_inputs();
        self.engine.step(&mut self.grid, inputs)
    }

    /// Run exactly one discrete tick, visiting cells sequentially in `order`
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of the grid's cell indices.
    pub fn step_with_order(&mut self, order: &[usize]) -> TickReport {
        let inputs = self.tick_inputs();
        self.engine.step_with_order(&mut self.grid, inputs, order)
    }

    fn tick_inputs(&self) -> TickInputs {
        TickInputs {
            phase: self.weather.phase(),
            open_sky_sunlight: self.seasons.profile().open_sky_sunlight,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get the grid
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Get the cell at `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.grid.cell(x, y)
    }

    /// Get the cell under a world point
    pub fn cell_at(&self, world: Vec3) -> Option<&Cell> {
        let (x, y) = self.grid.world_to_cell(world)?;
        self.grid.cell(x, y)
    }

    /// Cell coordinate under a world point
    pub fn world_to_cell(&self, world: Vec3) -> Option<(usize, usize)> {
        self.grid.world_to_cell(world)
    }

    /// World position of a cell's centre
    pub fn cell_center(&self, x: usize, y: usize) -> Vec3 {
        self.grid.cell_center(x, y)
    }

    /// Aggregate grid statistics
    pub fn stats(&self) -> GridStats {
        self.grid.stats()
    }

    /// Get the active weather phase
    pub fn phase(&self) -> WeatherPhase {
        self.weather.phase()
    }

    /// Get the current season
    pub fn season(&self) -> Season {
        self.seasons.season()
    }

    /// Get the wind vector
    pub fn wind(&self) -> Vec3 {
        self.weather.wind()
    }

    /// Get the weather scheduler
    pub fn weather(&self) -> &WeatherScheduler {
        &self.weather
    }

    /// Get the season clock
    pub fn seasons(&self) -> &SeasonClock {
        &self.seasons
    }

    /// Get the tick engine
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Get the ring-spread controller
    pub fn ignition(&self) -> &IgnitionController {
        &self.ignition
    }

    /// Get the action queue
    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    /// Get the simulation time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Get the master seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Take every queued weather and season event in order
    pub fn drain_events(&mut self) -> Vec<WeatherEvent> {
        self.weather.drain_events()
    }

    // ------------------------------------------------------------------
    // Mutation API
    // ------------------------------------------------------------------

    /// Plant a seedling under a world point; only bare or burnt ground accepts one
    pub fn place_seed_at(&mut self, world: Vec3) -> bool {
        self.resolve(world, "place_seed")
            .is_some_and(|(x, y)| self.place_seed(x, y))
    }

    /// Add water under a world point
    pub fn add_water_at(&mut self, world: Vec3, amount: f32) -> bool {
        self.resolve(world, "add_water")
            .is_some_and(|(x, y)| self.add_water(x, y, amount))
    }

    /// Start a ring spread under a world point
    pub fn ignite_at(&mut self, world: Vec3) -> bool {
        self.resolve(world, "ignite")
            .is_some_and(|(x, y)| self.ignite(x, y))
    }

    /// Trample the plant under a world point
    pub fn stomp_at(&mut self, world: Vec3, damage: f32) -> bool {
        self.resolve(world, "stomp")
            .is_some_and(|(x, y)| self.stomp(x, y, damage))
    }

    /// Plant a seedling at `(x, y)`
    pub fn place_seed(&mut self, x: usize, y: usize) -> bool {
        match self.grid.cell_mut(x, y) {
            Some(cell) => cell.plant_seed(),
            None => {
                trace!("place_seed at ({}, {}) is outside the grid", x, y);
                false
            }
        }
    }

    /// Clamp-add water at `(x, y)`
    pub fn add_water(&mut self, x: usize, y: usize, amount: f32) -> bool {
        match self.grid.cell_mut(x, y) {
            Some(cell) => {
                cell.water = clamp_unit(cell.water + amount);
                true
            }
            None => {
                trace!("add_water at ({}, {}) is outside the grid", x, y);
                false
            }
        }
    }

    /// Start a ring spread at `(x, y)`, replacing any active one
    pub fn ignite(&mut self, x: usize, y: usize) -> bool {
        self.ignition.ignite(&mut self.grid, x, y)
    }

    /// Subtract durability at `(x, y)` without changing the stage
    pub fn stomp(&mut self, x: usize, y: usize, damage: f32) -> bool {
        match self.grid.cell_mut(x, y) {
            Some(cell) => {
                cell.durability = clamp_unit(cell.durability - damage.max(0.0));
                true
            }
            None => {
                trace!("stomp at ({}, {}) is outside the grid", x, y);
                false
            }
        }
    }

    /// Queue an action for the start of the next update
    pub fn submit_action(&mut self, action: PlayerAction) {
        self.actions.submit_action(action);
    }

    fn resolve(&self, world: Vec3, verb: &str) -> Option<(usize, usize)> {
        let cell = self.grid.world_to_cell(world);
        if cell.is_none() {
            trace!(
                "{} at ({:.2}, {:.2}, {:.2}) misses the grid; ignored",
                verb,
                world.x,
                world.y,
                world.z
            );
        }
        cell
    }

    fn apply_pending_actions(&mut self) {
        self.actions.begin_update();
        let pending = self.actions.take_pending();
        if pending.is_empty() {
            return;
        }

        debug!("Applying {} queued player actions", pending.len());
        for action in pending {
            let position = action.position;
            match action.action_type {
                PlayerActionType::PlaceSeed => self.place_seed_at(position),
                PlayerActionType::AddWater => self.add_water_at(position, action.amount),
                PlayerActionType::Ignite => self.ignite_at(position),
                PlayerActionType::Stomp => self.stomp_at(position, action.amount),
            };
            self.actions.record_applied(action);
        }
    }
}
