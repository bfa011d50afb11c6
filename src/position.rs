//! Horizontal position expressed as a normal vector
use crate::{constants::EARTH_MEAN_RADIUS_M, prelude::Vector3};

use uom::si::{f64::Length, length::meter};

/// Normal vectors closer than this are the same position (about 6 mm)
const SAME_POSITION_EPSILON: f64 = 1.0E-9;

/// Horizontal [Position] of an aircraft, as the unit normal vector of the
/// Earth ellipsoid at that point. Unlike latitude and longitude, it has no
/// singularity at the poles or at the antimeridian, which makes it suitable
/// for per component interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub(crate) normal: Vector3<f64>,
}

impl Position {
    /// Builds new [Position] from geodetic coordinates
    /// - latitude [deg]
    /// - longitude [deg]
    pub fn from_geo_deg(latitude_deg: f64, longitude_deg: f64) -> Self {
        let (lat, lon) = (latitude_deg.to_radians(), longitude_deg.to_radians());
        Self {
            normal: Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()),
        }
    }

    /// Builds new [Position] from a normal vector, as is.
    pub fn from_normal_vector(normal: Vector3<f64>) -> Self {
        Self { normal }
    }

    /// Returns normal vector
    pub fn normal_vector(&self) -> Vector3<f64> {
        self.normal
    }

    /// Latitude in degrees
    pub fn latitude_deg(&self) -> f64 {
        let (x, y, z) = (self.normal[0], self.normal[1], self.normal[2]);
        z.atan2((x * x + y * y).sqrt()).to_degrees()
    }

    /// Longitude in degrees
    pub fn longitude_deg(&self) -> f64 {
        self.normal[1].atan2(self.normal[0]).to_degrees()
    }

    /// True when all components are finite and the vector is usable.
    /// Interpolated vectors are not exactly unitary, we only reject
    /// obviously corrupt values.
    pub fn is_valid(&self) -> bool {
        if !self.normal.iter().all(|c| c.is_finite()) {
            return false;
        }
        let norm = self.normal.norm();
        norm > 0.5 && norm < 1.5
    }

    /// Returns this [Position] projected back onto the unit sphere
    pub(crate) fn normalized(&self) -> Option<Self> {
        if !self.is_valid() {
            return None;
        }
        Some(Self {
            normal: self.normal.normalize(),
        })
    }

    /// True when both positions are the same point
    pub fn equal_normal_vector(&self, rhs: &Self) -> bool {
        (self.normal - rhs.normal).norm() < SAME_POSITION_EPSILON
    }

    /// Great circle distance between two positions
    pub fn great_circle_distance(&self, rhs: &Self) -> Length {
        let cross = self.normal.cross(&rhs.normal).norm();
        let dot = self.normal.dot(&rhs.normal);
        Length::new::<meter>(cross.atan2(dot) * EARTH_MEAN_RADIUS_M)
    }
}
