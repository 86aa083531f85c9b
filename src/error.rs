//! Construction-time errors.
//!
//! Every failure the engine can report happens before the first step. Once an
//! engine exists, each step is a total function of its state: near-zero
//! components and vanishing denominators are absorbed by the ε-floor and
//! renormalisation, never surfaced.

use thiserror::Error;

/// Fatal configuration error raised while building an engine or a simplex vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The simplex dimension must be at least one.
    #[error("dimension must be at least 1, got {0}")]
    EmptyDimension(usize),

    /// A supplied vector does not have the configured dimension.
    #[error("{name} has dimension {actual}, engine is configured for {expected}")]
    DimensionMismatch {
        /// Which vector was rejected (`"s1"` or `"s2"`).
        name: &'static str,
        /// Configured dimension N.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// A scalar parameter is outside its admissible range or not finite.
    #[error("{name} = {value} is outside {range}")]
    OutOfRange {
        /// Parameter name as it appears on [`crate::EngineConfig`].
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Human-readable admissible range.
        range: &'static str,
    },

    /// Simplex weights were negative, non-finite, or summed to zero.
    #[error("invalid simplex weights: {0}")]
    InvalidWeights(&'static str),
}
