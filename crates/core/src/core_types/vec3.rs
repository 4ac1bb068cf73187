//! Vector type alias for world positions and directions.

use nalgebra::Vector3;

/// 3D vector type for world points and the wind vector.
///
/// World space is Y-up: grid columns run along X and grid rows along Z, so
/// pointer hits from the host engine convert to cells without a swizzle.
pub type Vec3 = Vector3<f32>;
