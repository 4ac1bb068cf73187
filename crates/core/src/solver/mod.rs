//! Per-cell tick passes
//!
//! Every pass reads the pre-tick [`CellGrid`](crate::grid::CellGrid) snapshot and
//! writes only its own cell of the next buffer, so passes can run across cells in
//! parallel with `rayon` and the result does not depend on visit order.
//!
//! Passes run in a fixed order within a tick:
//!
//! 1. [`diffusion`]: water and heat blend toward the 3×3 mean
//! 2. [`shading`]: sunlight recovers toward open sky, large trees shade neighbours
//! 3. [`forcing`]: weather phase deltas and thunderstorm lightning
//! 4. [`fire`]: burning, extinguishing and contagion
//! 5. [`growth`]: birth, health and stage advancement
//!
//! Stochastic rules draw from [`rng::CellRoller`] streams keyed by the tick seed, the
//! cell index and the rule.

pub mod diffusion;
pub mod fire;
pub mod forcing;
pub mod growth;
pub mod rng;
pub mod shading;

pub use diffusion::DiffusionConfig;
pub use fire::FireConfig;
pub use forcing::ForcingConfig;
pub use growth::{GrowthConfig, NeighborKind, StageGate};
pub use shading::ShadingConfig;

use crate::core_types::Cell;
use rayon::prelude::*;

/// Run `f` once for every cell of the next buffer
///
/// `None` visits cells in parallel. `Some(order)` visits them sequentially in the given
/// order, which must be a permutation of the buffer's indices.
pub(crate) fn for_each_cell<F>(next: &mut [Cell], order: Option<&[usize]>, f: F)
where
    F: Fn(usize, &mut Cell) + Sync + Send,
{
    match order {
        None => next
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, cell)| f(index, cell)),
        Some(order) => {
            debug_assert_eq!(order.len(), next.len());
            for &index in order {
                f(index, &mut next[index]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_cell_visits_every_index() {
        let mut cells = vec![Cell::default(); 6];
        for_each_cell(&mut cells, None, |index, cell| cell.water = index as f32);
        let parallel: Vec<f32> = cells.iter().map(|c| c.water).collect();

        let order = [5, 0, 3, 1, 4, 2];
        for_each_cell(&mut cells, Some(&order), |index, cell| {
            cell.heat = index as f32;
        });
        let ordered: Vec<f32> = cells.iter().map(|c| c.heat).collect();

        assert_eq!(parallel, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(parallel, ordered);
    }
}
