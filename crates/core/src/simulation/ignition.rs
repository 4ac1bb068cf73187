//! Player-triggered ring spread
//!
//! Igniting a point sets it alight, then lights one Chebyshev ring per `step_delay`
//! until `max_distance`, and after a final `grace_delay` leaves a burn scar over the
//! whole square. The spread runs on frame time next to the tick fire pass and never
//! blocks it. At most one spread is active; a new ignition replaces the old one and
//! puts out whatever the old one lit that is still burning.

use crate::error::{ensure_non_negative, ensure_unit, ConfigError};
use crate::grid::CellGrid;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Ring spread parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingSpreadConfig {
    /// Outermost ring, in cells
    pub max_distance: usize,
    /// Seconds between rings
    pub step_delay: f32,
    /// Seconds between the last ring and the scar
    pub grace_delay: f32,
    /// Fuel given to every cell the spread lights
    pub fuel: f32,
}

impl Default for RingSpreadConfig {
    fn default() -> Self {
        Self {
            max_distance: 3,
            step_delay: 1.0,
            grace_delay: 0.5,
            fuel: 1.0,
        }
    }
}

impl RingSpreadConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative delays or fuel outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("ignition.step_delay", self.step_delay)?;
        ensure_non_negative("ignition.grace_delay", self.grace_delay)?;
        ensure_unit("ignition.fuel", self.fuel)
    }

    /// Seconds from ignition to scar
    pub fn total_duration(&self) -> f32 {
        self.step_delay * self.max_distance as f32 + self.grace_delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpreadPhase {
    Expanding,
    Grace,
}

/// In-flight spread state
#[derive(Debug, Clone)]
struct RingSpread {
    center: (usize, usize),
    /// Distance of the next ring to light
    next_ring: usize,
    /// Farthest ring that still holds an in-bounds cell
    reach: usize,
    /// Seconds since the last ring (or the ignition)
    elapsed: f32,
    phase: SpreadPhase,
    /// Cells this spread set alight
    forced: FxHashSet<usize>,
}

/// Drives at most one ring spread at a time
#[derive(Debug, Clone)]
pub struct IgnitionController {
    config: RingSpreadConfig,
    active: Option<RingSpread>,
    completed: u64,
}

impl IgnitionController {
    pub fn new(config: RingSpreadConfig) -> Self {
        Self {
            config,
            active: None,
            completed: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RingSpreadConfig {
        &self.config
    }

    /// Whether a spread is in flight
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Centre of the active spread
    pub fn center(&self) -> Option<(usize, usize)> {
        self.active.as_ref().map(|s| s.center)
    }

    /// Distance of the next ring to light, while expanding
    pub fn next_ring(&self) -> Option<usize> {
        self.active
            .as_ref()
            .filter(|s| s.phase == SpreadPhase::Expanding)
            .map(|s| s.next_ring)
    }

    /// Number of spreads that ran to their scar
    #[inline]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Light `(x, y)` and start a new spread around it
    ///
    /// Out-of-bounds targets are ignored and leave any active spread running. Returns
    /// `true` when a spread started.
    pub fn ignite(&mut self, grid: &mut CellGrid, x: usize, y: usize) -> bool {
        if x >= grid.width() || y >= grid.height() {
            trace!("Ignite at ({}, {}) is outside the grid; ignored", x, y);
            return false;
        }

        if let Some(old) = self.active.take() {
            Self::release(grid, &old);
        }

        let index = grid.index(x, y);
        let mut forced = FxHashSet::default();
        if let Some(cell) = grid.cell_mut(x, y) {
            cell.ignite(self.config.fuel);
            forced.insert(index);
        }

        info!(
            "Ring spread started at ({}, {}), {} rings",
            x, y, self.config.max_distance
        );

        let reach = x
            .max(y)
            .max(grid.width() - 1 - x)
            .max(grid.height() - 1 - y);

        self.active = Some(RingSpread {
            center: (x, y),
            next_ring: 1,
            reach,
            elapsed: 0.0,
            phase: if self.config.max_distance == 0 {
                SpreadPhase::Grace
            } else {
                SpreadPhase::Expanding
            },
            forced,
        });
        true
    }

    /// Drop the active spread without scarring, putting out the fires it lit
    pub fn cancel(&mut self, grid: &mut CellGrid) {
        if let Some(old) = self.active.take() {
            Self::release(grid, &old);
        }
    }

    /// Advance the active spread by `dt` seconds of frame time
    pub fn advance(&mut self, grid: &mut CellGrid, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let Self {
            config,
            active,
            completed,
        } = self;
        let Some(spread) = active.as_mut() else {
            return;
        };

        spread.elapsed += dt;
        loop {
            match spread.phase {
                SpreadPhase::Expanding if spread.next_ring > spread.reach => {
                    if !Self::skip_empty_rings(spread, config) {
                        return;
                    }
                }
                SpreadPhase::Expanding if spread.elapsed >= config.step_delay => {
                    spread.elapsed -= config.step_delay;
                    Self::light_ring(grid, spread, config.fuel);
                    spread.next_ring += 1;
                    if spread.next_ring > config.max_distance {
                        spread.phase = SpreadPhase::Grace;
                    }
                }
                SpreadPhase::Grace if spread.elapsed >= config.grace_delay => {
                    let (cx, cy) = spread.center;
                    Self::scar(grid, cx, cy, config.max_distance.min(spread.reach));
                    *active = None;
                    *completed += 1;
                    info!("Ring spread at ({}, {}) burnt out", cx, cy);
                    return;
                }
                _ => return,
            }
        }
    }

    /// Spend the delays of rings past the grid edge in one go
    ///
    /// Those rings light nothing, so only their timing matters. Returns `false` when
    /// the elapsed time does not cover the next one.
    fn skip_empty_rings(spread: &mut RingSpread, config: &RingSpreadConfig) -> bool {
        if spread.elapsed < config.step_delay {
            return false;
        }
        // Expanding keeps next_ring <= max_distance
        let remaining = config.max_distance - spread.next_ring + 1;
        let affordable = if config.step_delay > 0.0 {
            (spread.elapsed / config.step_delay) as usize
        } else {
            remaining
        };
        let skipped = affordable.clamp(1, remaining);
        spread.elapsed = (spread.elapsed - skipped as f32 * config.step_delay).max(0.0);

        if skipped == remaining {
            spread.phase = SpreadPhase::Grace;
        } else {
            spread.next_ring += skipped;
        }
        trace!("Skipped {} rings past the grid edge", skipped);
        true
    }

    fn light_ring(grid: &mut CellGrid, spread: &mut RingSpread, fuel: f32) {
        let (cx, cy) = spread.center;
        let ring: Vec<(usize, usize)> = grid.chebyshev_ring(cx, cy, spread.next_ring).collect();
        for &(x, y) in &ring {
            let index = grid.index(x, y);
            if let Some(cell) = grid.cell_mut(x, y) {
                cell.ignite(fuel);
                spread.forced.insert(index);
            }
        }
        debug!(
            "Ring {} around ({}, {}) lit {} cells",
            spread.next_ring,
            cx,
            cy,
            ring.len()
        );
    }

    fn scar(grid: &mut CellGrid, cx: usize, cy: usize, distance: usize) {
        let square: Vec<(usize, usize)> = grid.within_chebyshev(cx, cy, distance).collect();
        for (x, y) in square {
            if let Some(cell) = grid.cell_mut(x, y) {
                cell.scorch();
            }
        }
    }

    fn release(grid: &mut CellGrid, spread: &RingSpread) {
        let cells = grid.cells_mut();
        let mut released = 0;
        for &index in &spread.forced {
            if let Some(cell) = cells.get_mut(index) {
                if cell.is_on_fire {
                    cell.extinguish();
                    released += 1;
                }
            }
        }
        debug!(
            "Ring spread at {:?} cancelled; released {} burning cells",
            spread.center, released
        );
    }
}
