use uom::si::f64::Length;

use crate::{
    interpolation::{lerp, Interpolant, InterpolantKind, LinearPbh},
    prelude::{Duration, Epoch, Position, Situation},
};

/// [Interpolant] following a straight line between the two situations
/// bounding the query time.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolant {
    position: Position,
    altitude: Length,
    ground_factor: f64,
    pbh: LinearPbh,
    interpolated_time: Epoch,
}

impl LinearInterpolant {
    /// Builds new [LinearInterpolant] between `start` and `end`,
    /// at the (clamped) time fraction of the [LinearPbh].
    pub fn new(start: &Situation, end: &Situation, pbh: LinearPbh, cg: Option<Length>) -> Self {
        let fraction = pbh.fraction();

        let normal =
            start.position.normal + (end.position.normal - start.position.normal) * fraction;

        let (start_alt, _) = start.corrected_altitude(cg, true);
        let (end_alt, _) = end.corrected_altitude(cg, true);

        let (gf0, gf1) = (
            start.on_ground.factor().unwrap_or(0.0),
            end.on_ground.factor().unwrap_or(0.0),
        );

        let dt = (end.t - start.t).to_seconds();

        Self {
            pbh,
            position: Position::from_normal_vector(normal),
            altitude: start_alt + (end_alt - start_alt) * fraction,
            ground_factor: lerp(gf0, gf1, fraction),
            interpolated_time: start.t + Duration::from_seconds(dt * fraction),
        }
    }
}

impl Interpolant for LinearInterpolant {
    fn kind(&self) -> InterpolantKind {
        InterpolantKind::Linear
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
        true
    }
}
