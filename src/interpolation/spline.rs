//! Piecewise cubic (Hermite) spline through the situations of a window.
//! Each channel (normal vector components, altitude, ground factor) is an
//! independent curve. Derivatives at the samples are solved so the first
//! and second derivatives are continuous (natural spline).
use nalgebra::{DMatrix, DVector};

use uom::si::{f64::Length, length::meter};

use crate::{
    interpolation::{sample_times, Interpolant, InterpolantKind, LinearPbh},
    prelude::{Duration, Epoch, Position, Situation, Vector3},
    situation::{is_gf_equal_airborne, is_gf_equal_on_ground},
};

/// Solves the spline derivatives of samples `y` at strictly increasing `t`.
/// With two samples, this is the straight line slope.
pub(crate) fn derivatives(t: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    let n = t.len();
    if n < 2 || y.len() != n || y.iter().any(|y| !y.is_finite()) {
        return None;
    }

    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut b = DVector::<f64>::zeros(n);

    for i in 0..n - 1 {
        let h = t[i + 1] - t[i];
        if h <= 0.0 || !h.is_finite() {
            return None;
        }
        let rhs = 3.0 * (y[i + 1] - y[i]) / (h * h);
        a[(i, i)] += 2.0 / h;
        a[(i, i + 1)] += 1.0 / h;
        a[(i + 1, i)] += 1.0 / h;
        a[(i + 1, i + 1)] += 2.0 / h;
        b[i] += rhs;
        b[i + 1] += rhs;
    }

    let k = a.lu().solve(&b)?;
    if k.iter().all(|k| k.is_finite()) {
        Some(k.iter().copied().collect())
    } else {
        None
    }
}

/// Evaluates the cubic segment between (x0, y0) and (x1, y1)
/// with derivatives k0 and k1, at x.
pub(crate) fn eval_spline_interval(
    x: f64,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    k0: f64,
    k1: f64,
) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let t = (x - x0) / dx;
    let a = k0 * dx - dy;
    let b = -k1 * dx + dy;
    (1.0 - t) * y0 + t * y1 + t * (1.0 - t) * (a * (1.0 - t) + b * t)
}

#[derive(Debug, Clone, PartialEq)]
struct Channel {
    y: Vec<f64>,
    k: Vec<f64>,
}

impl Channel {
    fn new(t: &[f64], y: Vec<f64>) -> Option<Self> {
        let k = derivatives(t, &y)?;
        Some(Self { y, k })
    }

    fn eval(&self, t: &[f64], segment: usize, x: f64) -> f64 {
        eval_spline_interval(
            x,
            t[segment],
            t[segment + 1],
            self.y[segment],
            self.y[segment + 1],
            self.k[segment],
            self.k[segment + 1],
        )
    }
}

/// Spline coefficients of a window, calculated once per window revision.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineCoefficients {
    /// Sample times, relative to the oldest adjusted sample [Epoch]
    t: Vec<f64>,
    x: Channel,
    y: Channel,
    z: Channel,
    altitude_m: Channel,
    ground_factor: Channel,
}

impl SplineCoefficients {
    /// Fits all channels through a sanitized window (oldest first).
    /// Altitudes are corrected with the ground elevation and `cg`.
    /// None on numerical degeneracy.
    pub fn new(window: &[Situation], cg: Option<Length>) -> Option<Self> {
        let t = sample_times(window);
        let channel = |f: &dyn Fn(&Situation) -> f64| -> Option<Channel> {
            Channel::new(&t, window.iter().map(f).collect())
        };

        Some(Self {
            x: channel(&|s| s.position.normal[0])?,
            y: channel(&|s| s.position.normal[1])?,
            z: channel(&|s| s.position.normal[2])?,
            altitude_m: channel(&|s| s.corrected_altitude(cg, true).0.get::<meter>())?,
            ground_factor: channel(&|s| s.on_ground.factor().unwrap_or(0.0))?,
            t,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// [Interpolant] evaluating [SplineCoefficients] at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineInterpolant {
    position: Position,
    altitude: Length,
    ground_factor: f64,
    pbh: LinearPbh,
    interpolated_time: Epoch,
    recalculated: bool,
}

impl SplineInterpolant {
    /// Evaluates segment `segment` of the coefficients fitted on `window`.
    /// `x` is the query time in seconds relative to the oldest sample,
    /// kept within the window samples.
    pub fn new(
        coefficients: &SplineCoefficients,
        window: &[Situation],
        segment: usize,
        x: f64,
        pbh: LinearPbh,
        recalculated: bool,
    ) -> Option<Self> {
        let t = &coefficients.t;
        if segment + 1 >= t.len() || window.len() != t.len() {
            return None;
        }
        let x = x.clamp(t[segment], t[segment + 1]);

        let normal = Vector3::new(
            coefficients.x.eval(t, segment, x),
            coefficients.y.eval(t, segment, x),
            coefficients.z.eval(t, segment, x),
        );

        let (gf0, gf1) = (
            coefficients.ground_factor.y[segment],
            coefficients.ground_factor.y[segment + 1],
        );
        let ground_factor = if is_gf_equal_on_ground(gf0, gf1) {
            1.0
        } else if is_gf_equal_airborne(gf0, gf1) {
            0.0
        } else {
            coefficients
                .ground_factor
                .eval(t, segment, x)
                .clamp(0.0, 1.0)
        };

        let (start, end) = (&window[segment], &window[segment + 1]);
        let dt = (end.t - start.t).to_seconds();

        Some(Self {
            pbh,
            recalculated,
            ground_factor,
            position: Position::from_normal_vector(normal),
            altitude: Length::new::<meter>(coefficients.altitude_m.eval(t, segment, x)),
            interpolated_time: start.t + Duration::from_seconds(dt * pbh.fraction()),
        })
    }
}

impl Interpolant for SplineInterpolant {
    fn kind(&self) -> InterpolantKind {
        InterpolantKind::Spline
    }

    fn position(&self) -> Position {
        self.position
    }

    fn altitude(&self) -> Length {
        self.altitude
    }

    fn ground_factor(&self) -> f64 {
        self.ground_factor
    }

    fn pbh(&self) -> &LinearPbh {
        &self.pbh
    }

    fn interpolated_time(&self) -> Epoch {
        self.interpolated_time
    }

    fn is_recalculated(&self) -> bool {
        self.recalculated
    }
}
