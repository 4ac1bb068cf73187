//! Core value types

pub mod cell;
pub mod vec3;

pub use cell::*;
pub use vec3::Vec3;
