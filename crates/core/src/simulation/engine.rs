//! Double-buffered tick engine
//!
//! One discrete tick copies the grid into a back buffer, runs the solver passes against
//! the untouched grid, clamps the back buffer and swaps it in. Between ticks the grid is
//! always a fully committed state.

use crate::core_types::Cell;
use crate::error::{ensure_positive, ConfigError};
use crate::grid::CellGrid;
use crate::solver::{
    diffusion, fire, for_each_cell, forcing, growth, shading, DiffusionConfig, FireConfig,
    ForcingConfig, GrowthConfig, ShadingConfig,
};
use crate::weather::WeatherPhase;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tick timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds of simulation time per discrete tick
    pub tick_interval: f32,
    /// Ticks run by one `tick(dt)` call at most; the rest of the backlog is dropped
    pub max_ticks_per_frame: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: 0.2,
            max_ticks_per_frame: 8,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive tick interval or a zero frame budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("engine.tick_interval", self.tick_interval)?;
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::ZeroCount {
                field: "engine.max_ticks_per_frame",
            });
        }
        Ok(())
    }
}

/// Parameters of every per-cell rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickRules {
    pub diffusion: DiffusionConfig,
    pub shading: ShadingConfig,
    pub forcing: ForcingConfig,
    pub fire: FireConfig,
    pub growth: GrowthConfig,
}

impl TickRules {
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in any rule section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.diffusion.validate()?;
        self.shading.validate()?;
        self.forcing.validate()?;
        self.fire.validate()?;
        self.growth.validate()
    }
}

/// Global inputs read once at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInputs {
    /// Active weather phase
    pub phase: WeatherPhase,
    /// Sunlight level of the current season's open sky
    pub open_sky_sunlight: f32,
}

/// What changed during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Cells that caught fire
    pub ignitions: usize,
    /// Cells whose fire went out
    pub extinguished: usize,
    /// Empty cells that sprouted
    pub births: usize,
    /// Plants that advanced a stage
    pub advances: usize,
    /// Cells burning after the tick
    pub burning: usize,
}

impl TickReport {
    fn compare(tick: u64, before: &[Cell], after: &[Cell]) -> Self {
        let mut report = Self {
            tick,
            ..Self::default()
        };
        for (pre, post) in before.iter().zip(after) {
            match (pre.is_on_fire, post.is_on_fire) {
                (false, true) => report.ignitions += 1,
                (true, false) => report.extinguished += 1,
                _ => {}
            }
            if post.is_on_fire {
                report.burning += 1;
            }
            if pre.stage != post.stage && post.stage.has_plant() {
                if pre.stage.has_plant() {
                    report.advances += 1;
                } else {
                    report.births += 1;
                }
            }
        }
        report
    }
}

/// Runs discrete ticks over a [`CellGrid`]
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: EngineConfig,
    rules: TickRules,
    /// Next-state buffer, swapped with the grid's storage on commit
    back: Vec<Cell>,
    rng: StdRng,
    /// Unspent frame time
    accumulator: f32,
    ticks: u64,
}

impl SimulationEngine {
    pub fn new(config: EngineConfig, rules: TickRules, seed: u64) -> Self {
        Self {
            config,
            rules,
            back: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Get the tick timing
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the rule parameters
    pub fn rules(&self) -> &TickRules {
        &self.rules
    }

    /// Get the number of ticks run so far
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the frame time carried toward the next tick
    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Accumulate frame time and run every tick that is due
    ///
    /// Returns the reports of the ticks that ran, oldest first. Non-positive or
    /// non-finite `dt` is ignored.
    pub fn tick(&mut self, grid: &mut CellGrid, dt: f32, inputs: TickInputs) -> Vec<TickReport> {
        let mut reports = Vec::new();
        if !(dt.is_finite() && dt > 0.0) {
            return reports;
        }

        let interval = self.config.tick_interval;
        self.accumulator += dt;
        while self.accumulator >= interval {
            if reports.len() as u32 == self.config.max_ticks_per_frame {
                debug!(
                    "Tick budget of {} reached; dropping {:.3}s of backlog",
                    self.config.max_ticks_per_frame, self.accumulator
                );
                self.accumulator %= interval;
                break;
            }
            self.accumulator -= interval;
            reports.push(self.run_tick(grid, inputs, None));
        }
        reports
    }

    /// Run exactly one tick, visiting cells in parallel
    pub fn step(&mut self, grid: &mut CellGrid, inputs: TickInputs) -> TickReport {
        self.run_tick(grid, inputs, None)
    }

    /// Run exactly one tick, visiting cells sequentially in `order`
    ///
    /// The result is identical to [`step`](Self::step) for any permutation.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of the grid's cell indices.
    pub fn step_with_order(
        &mut self,
        grid: &mut CellGrid,
        inputs: TickInputs,
        order: &[usize],
    ) -> TickReport {
        assert_eq!(order.len(), grid.len(), "order must cover every cell");
        self.run_tick(grid, inputs, Some(order))
    }

    fn run_tick(
        &mut self,
        grid: &mut CellGrid,
        inputs: TickInputs,
        order: Option<&[usize]>,
    ) -> TickReport {
        let seed: u64 = self.rng.random();

        self.back.clear();
        self.back.extend_from_slice(grid.cells());

        let rules = &self.rules;
        let next = self.back.as_mut_slice();
        diffusion::run(grid, next, &rules.diffusion, order);
        shading::run(grid, next, inputs.open_sky_sunlight, &rules.shading, order);
        forcing::run(grid.cells(), next, inputs.phase, seed, &rules.forcing, order);
        fire::run(grid, next, seed, &rules.fire, order);
        growth::run(grid, next, seed, &rules.growth, order);
        for_each_cell(next, order, |_, cell| cell.clamp_fields());

        self.ticks += 1;
        let report = TickReport::compare(self.ticks, grid.cells(), &self.back);
        grid.swap_cells(&mut self.back);

        debug!(
            "Tick {} ({}): {} burning, +{} ignitions, {} out, {} births, {} advances",
            report.tick,
            inputs.phase,
            report.burning,
            report.ignitions,
            report.extinguished,
            report.births,
            report.advances
        );
        report
    }
}
