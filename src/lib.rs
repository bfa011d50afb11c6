#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod averager;
mod cfg;
mod constants;
mod error;
mod interpolation;
mod parts;
mod position;
mod provider;
mod situation;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{AircraftModel, Config, InterpolatorMode, Setup};
    pub use crate::error::Error;
    pub use crate::interpolation::{
        blend, Attitude, Interpolant, InterpolantKind, InterpolationLogger, InterpolationResult,
        InterpolationStatus, Interpolator, InterpolatorRegistry, InterpolatorStats,
        LinearInterpolant, LinearPbh, MemoryLogger, PartsInterpolator, PartsLog, PartsStatus,
        SituationLog, SplineCoefficients, SplineInterpolant,
    };
    pub use crate::parts::{Lights, Parts, PartsDetails};
    pub use crate::position::Position;
    pub use crate::provider::{
        ElevationProvider, RemoteAircraftStore, SituationProvider, SituationWindow, StoreEvent,
    };
    pub use crate::situation::{
        AltitudeCorrection, Callsign, ElevationPlane, ElevationPolicy, ElevationSource,
        GroundDetails, GroundElevation, OnGround, OnGroundInfo, SituationChange, Situation,
        SixDofVelocity,
    };
    pub use crate::situation::{
        is_gf_equal_airborne, is_gf_equal_on_ground, is_gf_landing, is_gf_starting,
    };
    // re-export
    pub use hifitime::{Duration, Epoch};
    pub use nalgebra::Vector3;
    pub use uom::si::f64::{Length, Velocity};
}

// pub export
pub use error::Error;
