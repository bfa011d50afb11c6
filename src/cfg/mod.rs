#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uom::si::{
    f64::Length,
    length::{foot, meter},
};

use crate::{
    constants::{
        ALLOWED_ALTITUDE_DEVIATION_FT, DEFAULT_GUESSING_RATIO, DEFAULT_PARTS_RATIO,
        MAX_DELTA_ELEVATION_FT, MAX_RATIO, SINGLE_POINT_RADIUS_M, SITUATION_WINDOW_SIZE,
    },
    prelude::{Duration, Error},
};

mod mode;
mod model;
mod setup;

pub use mode::InterpolatorMode;
pub use model::AircraftModel;
pub use setup::Setup;

fn default_parts_ratio() -> u32 {
    DEFAULT_PARTS_RATIO
}

fn default_guessing_ratio() -> u32 {
    DEFAULT_GUESSING_RATIO
}

fn default_max_delta_elevation_ft() -> f64 {
    MAX_DELTA_ELEVATION_FT
}

fn default_allowed_elevation_deviation_ft() -> f64 {
    ALLOWED_ALTITUDE_DEVIATION_FT
}

fn default_single_point_radius_m() -> f64 {
    SINGLE_POINT_RADIUS_M
}

fn default_parts_max_age_s() -> Option<f64> {
    None
}

fn default_window_size() -> usize {
    SITUATION_WINDOW_SIZE
}

/// Global interpolation tuning, shared by all interpolators of a session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Parts are interpolated every n-th step (per aircraft, staggered)
    #[cfg_attr(feature = "serde", serde(default = "default_parts_ratio"))]
    pub parts_ratio: u32,

    /// Parts are guessed every n-th step (per aircraft, staggered)
    #[cfg_attr(feature = "serde", serde(default = "default_guessing_ratio"))]
    pub guessing_ratio: u32,

    /// Two ground elevations differing by more than this (feet)
    /// are not interpolated
    #[cfg_attr(feature = "serde", serde(default = "default_max_delta_elevation_ft"))]
    pub max_delta_elevation_ft: f64,

    /// Window elevation spread (feet) under which the mean elevation is trusted.
    /// Also the scenery offset tolerance.
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_allowed_elevation_deviation_ft")
    )]
    pub allowed_elevation_deviation_ft: f64,

    /// An elevation is valid within this radius (meters) around its position
    #[cfg_attr(feature = "serde", serde(default = "default_single_point_radius_m"))]
    pub single_point_radius_m: f64,

    /// Received parts older than this (seconds) are no longer used and
    /// parts get guessed instead. None: any received parts remain valid.
    #[cfg_attr(feature = "serde", serde(default = "default_parts_max_age_s"))]
    pub parts_max_age_s: Option<f64>,

    /// Number of situations considered per interpolation
    #[cfg_attr(feature = "serde", serde(default = "default_window_size"))]
    pub window_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parts_ratio: default_parts_ratio(),
            guessing_ratio: default_guessing_ratio(),
            max_delta_elevation_ft: default_max_delta_elevation_ft(),
            allowed_elevation_deviation_ft: default_allowed_elevation_deviation_ft(),
            single_point_radius_m: default_single_point_radius_m(),
            parts_max_age_s: default_parts_max_age_s(),
            window_size: default_window_size(),
        }
    }
}

impl Config {
    /// Verifies this [Config] is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.parts_ratio == 0 || self.parts_ratio > MAX_RATIO {
            return Err(Error::InvalidPartsRatio(self.parts_ratio));
        }
        if self.guessing_ratio == 0 || self.guessing_ratio > MAX_RATIO {
            return Err(Error::InvalidGuessingRatio(self.guessing_ratio));
        }
        for threshold in [
            self.max_delta_elevation_ft,
            self.allowed_elevation_deviation_ft,
            self.single_point_radius_m,
        ] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(Error::InvalidElevationThreshold(threshold));
            }
        }
        if let Some(age) = self.parts_max_age_s {
            if !age.is_finite() || age < 0.0 {
                return Err(Error::InvalidElevationThreshold(age));
            }
        }
        if self.window_size < 2 {
            return Err(Error::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }

    /// Copies and returns [Config] with updated parts ratio
    pub fn with_parts_ratio(&self, ratio: u32) -> Self {
        let mut s = self.clone();
        s.parts_ratio = ratio;
        s
    }

    /// Copies and returns [Config] with updated guessing ratio
    pub fn with_guessing_ratio(&self, ratio: u32) -> Self {
        let mut s = self.clone();
        s.guessing_ratio = ratio;
        s
    }

    /// Copies and returns [Config] with updated single point radius
    pub fn with_single_point_radius_m(&self, radius_m: f64) -> Self {
        let mut s = self.clone();
        s.single_point_radius_m = radius_m;
        s
    }

    /// Copies and returns [Config] with a maximal age of received parts
    pub fn with_parts_max_age_s(&self, age_s: f64) -> Self {
        let mut s = self.clone();
        s.parts_max_age_s = Some(age_s);
        s
    }

    pub(crate) fn max_delta_elevation(&self) -> Length {
        Length::new::<foot>(self.max_delta_elevation_ft)
    }

    pub(crate) fn allowed_elevation_deviation(&self) -> Length {
        Length::new::<foot>(self.allowed_elevation_deviation_ft)
    }

    pub(crate) fn single_point_radius(&self) -> Length {
        Length::new::<meter>(self.single_point_radius_m)
    }

    pub(crate) fn parts_max_age(&self) -> Option<Duration> {
        self.parts_max_age_s.map(Duration::from_seconds)
    }
}
