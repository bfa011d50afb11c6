use crate::constants::{GROUND_FACTOR_EPSILON, GROUND_FACTOR_THRESHOLD};

/// Ground contact state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OnGround {
    Yes,
    No,
    #[default]
    Unknown,
}

/// Where the ground contact information originates from
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GroundDetails {
    #[default]
    NotSet,
    /// Interpolated ground factor
    ByInterpolation,
    /// Derived from the ground elevation
    ByElevation,
    /// Derived from the ground elevation and the CG
    ByElevationAndCg,
    /// Heuristics
    ByGuessing,
    /// Received from the network
    InFromNetwork,
    /// Received with the aircraft parts
    InFromParts,
}

impl std::fmt::Display for GroundDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotSet => write!(f, "not set"),
            Self::ByInterpolation => write!(f, "interpolation"),
            Self::ByElevation => write!(f, "elevation"),
            Self::ByElevationAndCg => write!(f, "elevation+cg"),
            Self::ByGuessing => write!(f, "guessing"),
            Self::InFromNetwork => write!(f, "network"),
            Self::InFromParts => write!(f, "parts"),
        }
    }
}

/// Ground contact of a situation, as a flag and a continuous
/// ground factor: 1.0 on ground, 0.0 airborne, transitions in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnGroundInfo {
    on_ground: OnGround,
    details: GroundDetails,
    factor: f64,
}

impl Default for OnGroundInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

impl OnGroundInfo {
    /// Ground contact is not known
    pub fn unknown() -> Self {
        Self {
            on_ground: OnGround::Unknown,
            details: GroundDetails::NotSet,
            factor: -1.0,
        }
    }

    /// Builds new [OnGroundInfo] from a flag
    pub fn new(on_ground: bool, details: GroundDetails) -> Self {
        Self {
            details,
            on_ground: if on_ground { OnGround::Yes } else { OnGround::No },
            factor: if on_ground { 1.0 } else { 0.0 },
        }
    }

    /// Builds new [OnGroundInfo] from an interpolated ground factor
    pub fn from_factor(factor: f64) -> Self {
        if !factor.is_finite() {
            return Self::unknown();
        }
        let factor = factor.clamp(0.0, 1.0);
        Self {
            factor,
            details: GroundDetails::ByInterpolation,
            on_ground: if factor >= GROUND_FACTOR_THRESHOLD {
                OnGround::Yes
            } else {
                OnGround::No
            },
        }
    }

    pub fn on_ground(&self) -> OnGround {
        self.on_ground
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground == OnGround::Yes
    }

    pub fn details(&self) -> GroundDetails {
        self.details
    }

    /// Ground factor, None when unknown
    pub fn factor(&self) -> Option<f64> {
        if self.on_ground == OnGround::Unknown {
            None
        } else {
            Some(self.factor)
        }
    }

    /// Only received ground information is trusted enough to be interpolated
    pub fn has_ground_details_for_interpolation(&self) -> bool {
        matches!(
            self.details,
            GroundDetails::InFromNetwork | GroundDetails::InFromParts
        )
    }
}

impl std::fmt::Display for OnGroundInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.on_ground {
            OnGround::Yes => write!(f, "on ground ({}, gf={:.2})", self.details, self.factor),
            OnGround::No => write!(f, "airborne ({}, gf={:.2})", self.details, self.factor),
            OnGround::Unknown => write!(f, "ground unknown"),
        }
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < GROUND_FACTOR_EPSILON
}

/// Both ground factors on ground
pub fn is_gf_equal_on_ground(old: f64, new: f64) -> bool {
    near(old, 1.0) && near(new, 1.0)
}

/// Both ground factors airborne
pub fn is_gf_equal_airborne(old: f64, new: f64) -> bool {
    near(old, 0.0) && near(new, 0.0)
}

/// Ground factor transition 0 -> 1
pub fn is_gf_starting(old: f64, new: f64) -> bool {
    near(old, 0.0) && near(new, 1.0)
}

/// Ground factor transition 1 -> 0
pub fn is_gf_landing(old: f64, new: f64) -> bool {
    near(old, 1.0) && near(new, 0.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ground_factor_predicates() {
        assert!(is_gf_equal_on_ground(1.0, 1.0 - 1.0E-9));
        assert!(is_gf_equal_airborne(1.0E-9, 0.0));
        assert!(is_gf_starting(0.0, 1.0));
        assert!(is_gf_landing(1.0, 0.0));
        assert!(!is_gf_landing(0.0, 1.0));
        assert!(!is_gf_equal_on_ground(1.0, 0.9));
    }

    #[test]
    fn ground_factor_info() {
        let info = OnGroundInfo::from_factor(0.97);
        assert!(info.is_on_ground());
        assert_eq!(info.details(), GroundDetails::ByInterpolation);

        let info = OnGroundInfo::from_factor(1.2);
        assert_eq!(info.factor(), Some(1.0));

        let info = OnGroundInfo::from_factor(0.5);
        assert_eq!(info.on_ground(), OnGround::No);

        assert_eq!(OnGroundInfo::from_factor(f64::NAN).factor(), None);
        assert!(!OnGroundInfo::unknown().has_ground_details_for_interpolation());
        let from_parts = OnGroundInfo::new(true, GroundDetails::InFromParts);
        assert!(from_parts.has_ground_details_for_interpolation());
    }
}
