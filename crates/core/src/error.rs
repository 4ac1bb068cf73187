//! Construction-time configuration errors
//!
//! The tick loop itself has no failure modes: out-of-bounds input is ignored and
//! degenerate-but-valid settings fall back to safe behaviour. What can fail is building
//! a session from a malformed parameter bundle.

use crate::weather::WeatherPhase;
use thiserror::Error;

/// Reasons a [`SimulationConfig`](crate::SimulationConfig) is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid has a zero dimension
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// Grid cell count overflows or exceeds the supported maximum
    #[error("grid of {width}x{height} cells exceeds the maximum of {max} cells")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    /// Value must be finite and strictly positive
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// Value must be finite and non-negative
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    /// Value must be a probability or normalised level
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    /// Value must be finite
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// A phase duration range has `min > max`
    #[error("duration range for {phase} is inverted: min {min}s > max {max}s")]
    InvertedDuration {
        phase: WeatherPhase,
        min: f32,
        max: f32,
    },

    /// A `[min, max]` pair of levels or counts is inverted
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    /// Stickiness below 1 would favour switching away from the active phase
    #[error("weather stickiness must be >= 1, got {0}")]
    Stickiness(f32),

    /// A count that must be at least one was zero
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub(crate) fn ensure_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

pub(crate) fn ensure_ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}
