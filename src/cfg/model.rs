#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uom::si::{
    f64::{Length, Velocity},
    velocity::knot,
};

use crate::constants::{DEFAULT_ROTATE_SPEED_KTS, SURE_ROTATE_FACTOR, SURE_ROTATE_SPEED_KTS};

fn default_engine_count() -> u8 {
    2
}

/// Aircraft model characteristics the interpolation depends on.
/// Resolved by the host (model matching) and injected per interpolator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftModel {
    /// Distance between the center of gravity and the ground contact point
    #[cfg_attr(feature = "serde", serde(default))]
    pub cg: Option<Length>,

    /// Vertical takeoff and landing capable
    #[cfg_attr(feature = "serde", serde(default))]
    pub vtol: bool,

    /// Number of engines
    #[cfg_attr(feature = "serde", serde(default = "default_engine_count"))]
    pub engine_count: u8,

    /// Rotate speed (Vr)
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotate_speed: Option<Velocity>,
}

impl Default for AircraftModel {
    fn default() -> Self {
        Self {
            cg: None,
            vtol: false,
            engine_count: default_engine_count(),
            rotate_speed: None,
        }
    }
}

impl AircraftModel {
    /// Copies and returns [AircraftModel] with given CG
    pub fn with_cg(&self, cg: Length) -> Self {
        let mut s = *self;
        s.cg = Some(cg);
        s
    }

    /// Copies and returns [AircraftModel] with given rotate speed
    pub fn with_rotate_speed(&self, vr: Velocity) -> Self {
        let mut s = *self;
        s.rotate_speed = Some(vr);
        s
    }

    /// Copies and returns VTOL [AircraftModel]
    pub fn as_vtol(&self) -> Self {
        let mut s = *self;
        s.vtol = true;
        s
    }

    /// Rotate speed, defaults to a mid size airliner value when unknown
    pub fn rotate_speed_or_default(&self) -> Velocity {
        self.rotate_speed
            .unwrap_or_else(|| Velocity::new::<knot>(DEFAULT_ROTATE_SPEED_KTS))
    }

    /// Ground speed above which this aircraft is surely airborne
    pub fn sure_rotate_speed(&self) -> Velocity {
        match self.rotate_speed {
            Some(vr) => vr * SURE_ROTATE_FACTOR,
            None => Velocity::new::<knot>(SURE_ROTATE_SPEED_KTS),
        }
    }
}
