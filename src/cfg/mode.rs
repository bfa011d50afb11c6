use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interpolation method
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolatorMode {
    /// Piecewise cubic spline over the whole situation window.
    /// Smooth (C1) trajectory through every received situation.
    #[default]
    Spline,

    /// Straight line between the two situations bounding the query time.
    /// Cheaper, but velocity changes abruptly at every received situation.
    Linear,
}

impl std::fmt::Display for InterpolatorMode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Spline => write!(fmt, "spline"),
            Self::Linear => write!(fmt, "linear"),
        }
    }
}

impl std::str::FromStr for InterpolatorMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spline" | "s" => Ok(Self::Spline),
            "linear" | "l" => Ok(Self::Linear),
            _ => Err(Error::UnknownInterpolatorMode(s.to_string())),
        }
    }
}
