use crate::{
    interpolation::PartsStatus,
    prelude::{Parts, Situation},
};

/// Interpolant used for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolantKind {
    Spline,
    Linear,
}

impl InterpolantKind {
    /// Single letter tag, as used in diagnostic dumps
    pub fn as_char(&self) -> char {
        match self {
            Self::Spline => 's',
            Self::Linear => 'l',
        }
    }
}

impl std::fmt::Display for InterpolantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Spline => write!(f, "spline"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

/// How a situation was obtained
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationStatus {
    /// A new situation was interpolated
    pub interpolated: bool,
    /// The situation is held (single sample, parked, or last valid value)
    pub same_situation: bool,
    /// Query time outside of the window: result pinned to its boundary
    pub clamped: bool,
    /// Input was degenerate, see [crate::prelude::Interpolator::invalid_situations]
    pub degenerate: bool,
    /// Coefficients were (re)calculated
    pub recalculated: bool,
    /// Usable situations in the window
    pub situations: usize,
    pub interpolant: Option<InterpolantKind>,
}

impl std::fmt::Display for InterpolationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "interpolated: {} same: {} clamped: {} degenerate: {} situations: {}",
            self.interpolated, self.same_situation, self.clamped, self.degenerate, self.situations
        )?;
        if let Some(kind) = self.interpolant {
            write!(f, " ({}{})", kind, if self.recalculated { ", recalculated" } else { "" })?;
        }
        Ok(())
    }
}

/// Outcome of one interpolation step
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InterpolationResult {
    /// None until a situation was ever available
    pub situation: Option<Situation>,
    /// None when parts are disabled or nothing could be obtained
    pub parts: Option<Parts>,
    pub status: InterpolationStatus,
    pub parts_status: PartsStatus,
}

/// Per aircraft counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InterpolatorStats {
    pub interpolations: u64,
    pub invalid_situations: u64,
    pub recalculations: u64,
    pub elevations_found: u64,
    pub elevations_missed: u64,
    pub parts_received: u64,
    pub parts_guessed: u64,
    pub parts_reused: u64,
}

impl std::fmt::Display for InterpolatorStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "interpolations: {} invalid: {} recalculations: {} ",
            self.interpolations,
            self.invalid_situations,
            self.recalculations,
        )?;
        write!(
            f,
            "elevations found/missed: {}/{} parts received/guessed/reused: {}/{}/{}",
            self.elevations_found,
            self.elevations_missed,
            self.parts_received,
            self.parts_guessed,
            self.parts_reused,
        )
    }
}
