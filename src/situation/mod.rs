use uom::si::{
    f64::{Length, Velocity},
    length::{foot, meter},
    velocity::{kilometer_per_hour, knot},
};

use crate::{
    constants::{
        DELTA_NEAR_GROUND_M, HALF_TURN_DEG, MOVING_SPEED_KMH, SKIP_NEAR_GROUND_HEIGHT_M,
        SKIP_NEAR_GROUND_SPEED_KTS,
    },
    prelude::{Duration, Epoch, Position, Vector3},
};

mod change;
mod elevation;
mod ground;

pub use change::SituationChange;
pub use elevation::{ElevationPlane, ElevationPolicy, ElevationSource, GroundElevation};
pub use ground::{
    is_gf_equal_airborne, is_gf_equal_on_ground, is_gf_landing, is_gf_starting, GroundDetails,
    OnGround, OnGroundInfo,
};

pub(crate) use elevation::ElevationStats;

/// Aircraft identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Callsign(String);

impl Callsign {
    /// Builds new [Callsign], trimmed and upper cased
    pub fn new(callsign: &str) -> Self {
        Self(callsign.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Callsign {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Optional 6 degrees of freedom velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SixDofVelocity {
    /// Linear velocity in m.s⁻¹ (north, east, down)
    pub linear_m_s: Vector3<f64>,
    /// Angular velocity in rad.s⁻¹ (pitch, roll, yaw)
    pub angular_rad_s: Vector3<f64>,
}

/// How [Situation::corrected_altitude] modified the altitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeCorrection {
    /// Close enough to the ground, set to ground
    NoCorrection,
    /// Below ground, lifted to ground
    Underflow,
    /// On ground by network, parts or guessing: dragged to ground
    DraggedToGround,
    /// Above ground, unchanged
    Agl,
    /// No ground elevation: unchanged
    NoElevation,
}

impl std::fmt::Display for AltitudeCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoCorrection => write!(f, "no correction"),
            Self::Underflow => write!(f, "underflow"),
            Self::DraggedToGround => write!(f, "dragged to ground"),
            Self::Agl => write!(f, "AGL"),
            Self::NoElevation => write!(f, "no elevation"),
        }
    }
}

/// Normalizes an angle to +/- 180°
pub(crate) fn normalize_deg(angle_deg: f64) -> f64 {
    (angle_deg + HALF_TURN_DEG).rem_euclid(2.0 * HALF_TURN_DEG) - HALF_TURN_DEG
}

/// Aircraft [Situation], as received from the network at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Situation {
    pub(crate) callsign: Callsign,
    pub(crate) position: Position,
    pub(crate) altitude: Length,
    pub(crate) heading_deg: f64,
    pub(crate) pitch_deg: f64,
    pub(crate) bank_deg: f64,
    pub(crate) ground_speed: Velocity,
    pub(crate) velocity: Option<SixDofVelocity>,
    pub(crate) on_ground: OnGroundInfo,
    pub(crate) elevation: GroundElevation,
    pub(crate) cg: Option<Length>,
    pub(crate) t: Epoch,
    pub(crate) offset: Duration,
}

impl Situation {
    /// Builds new [Situation] at given [Epoch], level, static,
    /// with unknown ground contact and no elevation.
    pub fn new(callsign: Callsign, t: Epoch, position: Position, altitude: Length) -> Self {
        Self {
            callsign,
            position,
            altitude,
            t,
            heading_deg: 0.0,
            pitch_deg: 0.0,
            bank_deg: 0.0,
            ground_speed: Velocity::new::<knot>(0.0),
            velocity: None,
            on_ground: OnGroundInfo::unknown(),
            elevation: GroundElevation::none(),
            cg: None,
            offset: Duration::ZERO,
        }
    }

    /// Copies and returns [Situation] with given heading (degrees)
    pub fn with_heading_deg(mut self, heading_deg: f64) -> Self {
        self.heading_deg = normalize_deg(heading_deg);
        self
    }

    /// Copies and returns [Situation] with given pitch (degrees)
    pub fn with_pitch_deg(mut self, pitch_deg: f64) -> Self {
        self.pitch_deg = normalize_deg(pitch_deg);
        self
    }

    /// Copies and returns [Situation] with given bank (degrees)
    pub fn with_bank_deg(mut self, bank_deg: f64) -> Self {
        self.bank_deg = normalize_deg(bank_deg);
        self
    }

    pub fn with_ground_speed(mut self, ground_speed: Velocity) -> Self {
        self.ground_speed = ground_speed;
        self
    }

    pub fn with_velocity(mut self, velocity: SixDofVelocity) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_on_ground(mut self, on_ground: OnGroundInfo) -> Self {
        self.on_ground = on_ground;
        self
    }

    /// Copies and returns [Situation] with a (locally observed) ground elevation
    pub fn with_ground_elevation(mut self, elevation: Length, source: ElevationSource) -> Self {
        self.elevation = GroundElevation::new(elevation, source);
        self
    }

    pub fn with_cg(mut self, cg: Length) -> Self {
        self.cg = Some(cg);
        self
    }

    /// Copies and returns [Situation] with given network time offset
    pub fn with_time_offset(mut self, offset: Duration) -> Self {
        self.offset = offset;
        self
    }

    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn altitude(&self) -> Length {
        self.altitude
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }

    pub fn bank_deg(&self) -> f64 {
        self.bank_deg
    }

    pub fn ground_speed(&self) -> Velocity {
        self.ground_speed
    }

    pub fn velocity(&self) -> Option<&SixDofVelocity> {
        self.velocity.as_ref()
    }

    pub fn on_ground_info(&self) -> &OnGroundInfo {
        &self.on_ground
    }

    /// Ground elevation, None when unknown or unusable
    pub fn ground_elevation(&self) -> Option<Length> {
        self.elevation.value()
    }

    pub fn ground_elevation_info(&self) -> &GroundElevation {
        &self.elevation
    }

    pub fn cg(&self) -> Option<Length> {
        self.cg
    }

    /// Sampling [Epoch]
    pub fn epoch(&self) -> Epoch {
        self.t
    }

    pub fn time_offset(&self) -> Duration {
        self.offset
    }

    /// Sampling [Epoch] compensated by the network time offset.
    /// All interpolation happens in adjusted time.
    pub fn adjusted_epoch(&self) -> Epoch {
        self.t + self.offset
    }

    /// True when all values are usable
    pub fn is_valid(&self) -> bool {
        self.position.is_valid()
            && self.altitude.value.is_finite()
            && self.heading_deg.is_finite()
            && self.pitch_deg.is_finite()
            && self.bank_deg.is_finite()
            && self.ground_speed.value.is_finite()
    }

    pub fn is_moving(&self) -> bool {
        self.ground_speed >= Velocity::new::<kilometer_per_hour>(MOVING_SPEED_KMH)
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground.is_on_ground()
    }

    /// Distance between the ground contact point and the ground.
    /// None when the elevation is unknown.
    pub fn height_above_ground(&self, cg: Option<Length>) -> Option<Length> {
        let elevation = self.ground_elevation()?;
        let cg = cg.or(self.cg).unwrap_or(Length::new::<meter>(0.0));
        Some(self.altitude - elevation - cg)
    }

    /// On ground by elevation: [OnGround::Unknown] without elevation.
    pub fn is_on_ground_by_elevation(&self, cg: Option<Length>) -> OnGround {
        match self.height_above_ground(cg) {
            Some(h) if h < Length::new::<meter>(DELTA_NEAR_GROUND_M) => OnGround::Yes,
            Some(_) => OnGround::No,
            None => OnGround::Unknown,
        }
    }

    /// Fast or high aircraft do not need any near ground work
    /// (elevation lookup, ground contact correction).
    pub fn can_likely_skip_near_ground_interpolation(&self) -> bool {
        if self.is_on_ground() && self.on_ground.has_ground_details_for_interpolation() {
            return false;
        }
        if self.ground_speed > Velocity::new::<knot>(SKIP_NEAR_GROUND_SPEED_KTS) {
            return true;
        }
        match self.height_above_ground(None) {
            Some(h) => h >= Length::new::<meter>(SKIP_NEAR_GROUND_HEIGHT_M),
            None => false,
        }
    }

    /// Distance travelled during `dt`, or `min` for slow or static aircraft
    pub fn distance_per_time(&self, dt: Duration, min: Length) -> Length {
        let travelled = Length::new::<meter>(
            self.ground_speed.get::<uom::si::velocity::meter_per_second>().abs()
                * dt.to_seconds(),
        );
        if travelled > min {
            travelled
        } else {
            min
        }
    }

    /// Altitude corrected with ground elevation and CG.
    /// `drag_to_ground` pulls aircraft known to be on ground down to ground level.
    pub fn corrected_altitude(
        &self,
        cg: Option<Length>,
        drag_to_ground: bool,
    ) -> (Length, AltitudeCorrection) {
        let elevation = match self.ground_elevation() {
            Some(elevation) => elevation,
            None => return (self.altitude, AltitudeCorrection::NoElevation),
        };

        let cg = cg.or(self.cg).unwrap_or(Length::new::<meter>(0.0));
        let ground_plus_cg = elevation + cg;
        let ground_distance = self.altitude - ground_plus_cg;

        if ground_distance.value < 0.0 {
            return (ground_plus_cg, AltitudeCorrection::Underflow);
        }
        if ground_distance < Length::new::<meter>(DELTA_NEAR_GROUND_M) {
            return (ground_plus_cg, AltitudeCorrection::NoCorrection);
        }

        let drag = drag_to_ground
            && self.is_on_ground()
            && matches!(
                self.on_ground.details(),
                GroundDetails::InFromNetwork
                    | GroundDetails::InFromParts
                    | GroundDetails::ByGuessing
            );

        if drag {
            (ground_plus_cg, AltitudeCorrection::DraggedToGround)
        } else {
            (self.altitude, AltitudeCorrection::Agl)
        }
    }

    pub(crate) fn great_circle_distance(&self, rhs: &Self) -> Length {
        self.position.great_circle_distance(&rhs.position)
    }

    /// Same position, attitude and altitude
    pub(crate) fn equal_pbh_and_position(&self, rhs: &Self) -> bool {
        self.position.equal_normal_vector(&rhs.position)
            && self.altitude == rhs.altitude
            && self.heading_deg == rhs.heading_deg
            && self.pitch_deg == rhs.pitch_deg
            && self.bank_deg == rhs.bank_deg
    }
}

impl std::fmt::Display for Situation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} lat={:.6}° lon={:.6}° alt={:.1}ft ",
            self.callsign,
            self.t,
            self.position.latitude_deg(),
            self.position.longitude_deg(),
            self.altitude.get::<foot>(),
        )?;
        write!(
            f,
            "hdg={:.1}° pitch={:.1}° bank={:.1}° gs={:.1}kts {} elv={}",
            self.heading_deg,
            self.pitch_deg,
            self.bank_deg,
            self.ground_speed.get::<knot>(),
            self.on_ground,
            self.elevation,
        )
    }
}
