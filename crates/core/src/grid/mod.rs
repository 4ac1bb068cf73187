//! Grid storage and spatial queries

pub mod cell_grid;

pub use cell_grid::*;
