use num_traits::Float;

use uom::si::f64::Length;

use crate::prelude::{Epoch, Position, Situation};

mod interpolator;
mod linear;
mod logger;
mod parts;
mod pbh;
mod registry;
mod spline;
mod status;

pub use interpolator::Interpolator;
pub use linear::LinearInterpolant;
pub use logger::{InterpolationLogger, MemoryLogger, PartsLog, SituationLog};
pub use parts::{PartsInterpolator, PartsStatus};
pub use pbh::{blend, Attitude, LinearPbh};
pub use registry::InterpolatorRegistry;
pub use spline::{SplineCoefficients, SplineInterpolant};
pub use status::{InterpolantKind, InterpolationResult, InterpolationStatus, InterpolatorStats};

/// Position, altitude and ground factor estimate at one instant,
/// attitude being delegated to the embedded [LinearPbh].
pub trait Interpolant {
    fn kind(&self) -> InterpolantKind;

    /// Interpolated position, not normalized
    fn position(&self) -> Position;

    fn altitude(&self) -> Length;

    /// Continuous ground factor in [0, 1]
    fn ground_factor(&self) -> f64;

    fn pbh(&self) -> &LinearPbh;

    /// Interpolated (unadjusted) time
    fn interpolated_time(&self) -> Epoch;

    /// Coefficients had to be (re)calculated for this evaluation
    fn is_recalculated(&self) -> bool;
}

pub(crate) fn lerp<T: Float>(start: T, end: T, fraction: T) -> T {
    start + (end - start) * fraction
}

/// Adjusted sample times of a window, in seconds relative to its oldest sample
pub(crate) fn sample_times(window: &[Situation]) -> Vec<f64> {
    match window.first() {
        Some(first) => {
            let t0 = first.adjusted_epoch();
            window
                .iter()
                .map(|s| (s.adjusted_epoch() - t0).to_seconds())
                .collect()
        },
        None => Vec::new(),
    }
}

/// Locates `x` within strictly increasing sample `times`.
/// Returns the index of the segment start, the fraction within that
/// segment and whether `x` was outside the samples (clamped).
pub(crate) fn bracket(times: &[f64], x: f64) -> Option<(usize, f64, bool)> {
    let n = times.len();
    if n < 2 {
        return None;
    }
    if !x.is_finite() {
        return Some((n - 2, 1.0, true));
    }
    if x <= times[0] {
        return Some((0, 0.0, x < times[0]));
    }
    if x >= times[n - 1] {
        return Some((n - 2, 1.0, x > times[n - 1]));
    }
    let i = times
        .windows(2)
        .position(|pair| x >= pair[0] && x < pair[1])
        .unwrap_or(n - 2);
    let fraction = (x - times[i]) / (times[i + 1] - times[i]);
    Some((i, fraction, false))
}

#[cfg(test)]
mod test {
    use super::{bracket, lerp};

    #[test]
    fn window_bracketing() {
        let times = [0.0, 1.0, 3.0];
        assert_eq!(bracket(&times, 0.5), Some((0, 0.5, false)));
        assert_eq!(bracket(&times, 1.0), Some((1, 0.0, false)));
        assert_eq!(bracket(&times, 2.5), Some((1, 0.75, false)));
        assert_eq!(bracket(&times, 3.0), Some((1, 1.0, false)));
        assert_eq!(bracket(&times, 4.0), Some((1, 1.0, true)));
        assert_eq!(bracket(&times, -1.0), Some((0, 0.0, true)));
        assert_eq!(bracket(&times[..1], 0.0), None);
    }

    #[test]
    fn linear_interpolation() {
        assert_eq!(lerp(10.0_f64, 20.0, 0.25), 12.5);
        assert_eq!(lerp(10.0_f32, 20.0, 1.0), 20.0);
    }
}
