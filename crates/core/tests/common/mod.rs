//! Shared helpers for integration tests
#![allow(dead_code)]

use grove_sim_core::{CellGrid, GrowthStage, TickInputs, Vec3, WeatherPhase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Grid with random stages and fields, a few cells burning
pub fn random_grid(width: usize, height: usize, seed: u64) -> CellGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = CellGrid::new(width, height, 1.0, Vec3::zeros());
    for y in 0..height {
        for x in 0..width {
            let Some(cell) = grid.cell_mut(x, y) else {
                continue;
            };
            cell.stage = GrowthStage::ALL[rng.random_range(0..5)];
            cell.water = rng.random();
            cell.sunlight = rng.random();
            cell.heat = rng.random();
            cell.success = rng.random();
            cell.durability = rng.random();
            if rng.random::<f32>() < 0.05 {
                cell.ignite(rng.random());
            }
        }
    }
    grid
}

/// Grid with about 60% of cells planted at a random living stage, nothing burning
pub fn planted_grid(width: usize, height: usize, seed: u64) -> CellGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = CellGrid::new(width, height, 1.0, Vec3::zeros());
    for y in 0..height {
        for x in 0..width {
            if let Some(cell) = grid.cell_mut(x, y) {
                if rng.random::<f32>() < 0.6 {
                    cell.stage = GrowthStage::ALL[rng.random_range(1..5)];
                    cell.success = rng.random_range(0.5..1.0);
                }
            }
        }
    }
    grid
}

pub fn inputs(phase: WeatherPhase) -> TickInputs {
    TickInputs {
        phase,
        open_sky_sunlight: 0.8,
    }
}
