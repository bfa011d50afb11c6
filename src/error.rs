use thiserror::Error;

use crate::prelude::Callsign;

/// Errors are only returned on configuration misuse.
/// Stale, missing or corrupt input data never fails an interpolation step,
/// it is counted and reported through the interpolation status instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Parts are evaluated every n-th step, n must be within 1..=10
    #[error("invalid parts ratio {0}: expecting 1..=10")]
    InvalidPartsRatio(u32),

    /// Parts are guessed every n-th step, n must be within 1..=10
    #[error("invalid guessing ratio {0}: expecting 1..=10")]
    InvalidGuessingRatio(u32),

    /// Elevation thresholds and radii must be positive and finite
    #[error("invalid elevation threshold {0}")]
    InvalidElevationThreshold(f64),

    /// A situation window must hold at least two situations
    #[error("invalid window size {0}: expecting at least 2")]
    InvalidWindowSize(usize),

    /// Failed to parse [crate::prelude::InterpolatorMode]
    #[error("unknown interpolator mode \"{0}\"")]
    UnknownInterpolatorMode(String),

    /// Data of one aircraft was handed over for another one
    #[error("data of {found} provided for {expected}")]
    WrongAircraft { expected: Callsign, found: Callsign },
}
