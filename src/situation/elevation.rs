use std::cmp::Ordering;

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uom::si::{
    f64::Length,
    length::{foot, meter},
};

use crate::{
    constants::MIN_TRANSFER_TIME_MS,
    prelude::{Config, Duration, ElevationProvider, Position, Situation, SituationChange},
};

/// Tolerance of the maximal elevation delta (feet)
const DELTA_ELEVATION_EPSILON_FT: f64 = 1.0E-6;

/// Provenance of a ground elevation, ordered by confidence.
/// The order is explicit, see [ElevationSource::rank]:
/// never rely on the declaration order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElevationSource {
    /// Unknown: the elevation value must not be used
    #[default]
    NoElevation,
    /// Test fixture
    Test,
    /// Mean elevation of the recent situations
    SituationChange,
    /// Extrapolated from past situations
    Extrapolated,
    /// Averaged from nearby aircraft
    Average,
    /// Interpolated between two known elevations
    Interpolated,
    /// From the elevation cache
    FromCache,
    /// Obtained from the simulator
    FromProvider,
}

impl ElevationSource {
    /// Confidence rank, higher is better
    pub fn rank(&self) -> u8 {
        match self {
            Self::NoElevation => 0,
            Self::Test => 1,
            Self::SituationChange => 2,
            Self::Extrapolated => 3,
            Self::Average => 4,
            Self::Interpolated => 5,
            Self::FromCache => 6,
            Self::FromProvider => 7,
        }
    }
}

impl Ord for ElevationSource {
    fn cmp(&self, rhs: &Self) -> Ordering {
        self.rank().cmp(&rhs.rank())
    }
}

impl PartialOrd for ElevationSource {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl std::fmt::Display for ElevationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoElevation => write!(f, "no elevation"),
            Self::Test => write!(f, "test"),
            Self::SituationChange => write!(f, "situation change"),
            Self::Extrapolated => write!(f, "extrapolated"),
            Self::Average => write!(f, "average"),
            Self::Interpolated => write!(f, "interpolated"),
            Self::FromCache => write!(f, "cache"),
            Self::FromProvider => write!(f, "provider"),
        }
    }
}

/// Ground elevation under a situation and its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundElevation {
    value: Length,
    source: ElevationSource,
    transferred: bool,
}

impl Default for GroundElevation {
    fn default() -> Self {
        Self::none()
    }
}

impl GroundElevation {
    /// Unknown elevation
    pub fn none() -> Self {
        Self {
            value: Length::new::<meter>(0.0),
            source: ElevationSource::NoElevation,
            transferred: false,
        }
    }

    /// Builds new locally observed [GroundElevation].
    /// Non finite values are unknown elevations.
    pub fn new(value: Length, source: ElevationSource) -> Self {
        if !value.value.is_finite() || source == ElevationSource::NoElevation {
            return Self::none();
        }
        Self {
            value,
            source,
            transferred: false,
        }
    }

    fn with_transferred(mut self, transferred: bool) -> Self {
        self.transferred = transferred;
        self
    }

    /// Elevation value, None when the source is [ElevationSource::NoElevation]
    pub fn value(&self) -> Option<Length> {
        if self.source == ElevationSource::NoElevation {
            None
        } else {
            Some(self.value)
        }
    }

    pub fn source(&self) -> ElevationSource {
        self.source
    }

    /// Inherited from another situation
    pub fn is_transferred(&self) -> bool {
        self.transferred
    }

    /// True if an elevation of given provenance should replace this one.
    pub fn is_other_better(&self, source: ElevationSource, transferred: bool) -> bool {
        if matches!(source, ElevationSource::NoElevation | ElevationSource::Test) {
            return false;
        }
        match source.cmp(&self.source) {
            Ordering::Greater => true,
            Ordering::Less => false,
            // same provenance: local observation beats a transferred value
            Ordering::Equal => self.transferred && !transferred,
        }
    }
}

impl std::fmt::Display for GroundElevation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.value() {
            Some(value) if self.transferred => write!(
                f,
                "{:.1}ft ({}, transferred)",
                value.get::<foot>(),
                self.source
            ),
            Some(value) => write!(f, "{:.1}ft ({})", value.get::<foot>(), self.source),
            None => write!(f, "none"),
        }
    }
}

/// An elevation valid within a radius around a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationPlane {
    pub position: Position,
    pub elevation: Length,
    pub radius: Length,
}

impl ElevationPlane {
    pub fn new(position: Position, elevation: Length, radius: Length) -> Self {
        Self {
            position,
            elevation,
            radius,
        }
    }

    /// True if this plane is valid at given [Position]
    pub fn covers(&self, position: &Position) -> bool {
        self.position.great_circle_distance(position) <= self.radius
    }
}

impl Situation {
    /// Unconditionally sets a locally observed ground elevation
    pub fn set_ground_elevation(&mut self, elevation: Length, source: ElevationSource) {
        self.elevation = GroundElevation::new(elevation, source);
    }

    /// Sets the ground elevation only if the plane covers this situation
    /// and the new information is better than the existing one.
    /// Returns true when the elevation was updated.
    pub fn set_ground_elevation_checked(
        &mut self,
        plane: &ElevationPlane,
        source: ElevationSource,
        transferred: bool,
    ) -> bool {
        if !plane.covers(&self.position) {
            return false;
        }
        if self.ground_elevation().is_some() && !self.elevation.is_other_better(source, transferred)
        {
            return false;
        }
        let candidate = GroundElevation::new(plane.elevation, source).with_transferred(transferred);
        if candidate.value().is_none() {
            return false;
        }
        self.elevation = candidate;
        true
    }

    /// True if our elevation may be copied to `to`, located within `radius`
    pub fn can_transfer_ground_elevation(&self, to: &Situation, radius: Length) -> bool {
        if self.ground_elevation().is_none() {
            return false;
        }
        match to.elevation.source {
            ElevationSource::FromProvider => return false,
            ElevationSource::FromCache
                if self.elevation.source != ElevationSource::FromProvider =>
            {
                return false
            },
            _ => {},
        }
        self.great_circle_distance(to) <= radius
    }

    /// Copies the elevation of a nearby situation, marked as transferred.
    /// Returns true when the elevation was updated.
    pub fn transfer_ground_elevation_from(&mut self, from: &Situation, radius: Length) -> bool {
        if !from.can_transfer_ground_elevation(self, radius) {
            return false;
        }
        match from.ground_elevation() {
            Some(elevation) => {
                let plane = ElevationPlane::new(from.position, elevation, radius);
                self.set_ground_elevation_checked(&plane, from.elevation.source, true)
            },
            None => false,
        }
    }
}

/// Elevations found / missed while backfilling a window
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElevationStats {
    pub found: u64,
    pub missed: u64,
}

/// Ground elevation reconciliation: decides the best achievable elevation
/// of situations lacking one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationPolicy {
    max_delta: Length,
    allowed_deviation: Length,
    radius: Length,
}

impl ElevationPolicy {
    /// Builds new [ElevationPolicy] from [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_delta: cfg.max_delta_elevation(),
            allowed_deviation: cfg.allowed_elevation_deviation(),
            radius: cfg.single_point_radius(),
        }
    }

    pub fn single_point_radius(&self) -> Length {
        self.radius
    }

    pub fn allowed_deviation(&self) -> Length {
        self.allowed_deviation
    }

    /// Elevation between two situations, blended with the time fraction.
    /// None when either is unknown or when they differ by more than the
    /// maximal delta: they are then two distinct terrain points.
    pub fn interpolated_elevation(
        &self,
        old: &Situation,
        new: &Situation,
        fraction: f64,
    ) -> Option<Length> {
        let (old_elv, new_elv) = (old.ground_elevation()?, new.ground_elevation()?);
        if old.position.equal_normal_vector(&new.position) {
            return Some(new_elv);
        }

        let delta = new_elv - old_elv;
        let max_delta_ft = self.max_delta.get::<foot>() + DELTA_ELEVATION_EPSILON_FT;
        if delta.get::<foot>().abs() > max_delta_ft {
            return None;
        }

        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            return None;
        };
        Some(old_elv + delta * fraction)
    }

    /// Elevation lookup from the [ElevationProvider], within the single point radius.
    pub fn lookup(&self, situation: &mut Situation, provider: &dyn ElevationProvider) -> bool {
        match provider.find_closest_elevation_within_range(situation, self.radius) {
            Some(plane) => {
                situation.set_ground_elevation_checked(&plane, ElevationSource::FromCache, false)
            },
            None => false,
        }
    }

    /// Backfills missing elevations across a window (oldest first):
    /// provider lookup, transfer from a nearby situation,
    /// then interpolation between both neighbors.
    pub(crate) fn backfill(
        &self,
        window: &mut [Situation],
        provider: Option<&dyn ElevationProvider>,
    ) -> ElevationStats {
        let mut stats = ElevationStats::default();
        let donors = window.to_vec();

        for (i, situation) in window.iter_mut().enumerate() {
            if situation.ground_elevation().is_some() {
                continue;
            }
            if situation.can_likely_skip_near_ground_interpolation() {
                continue;
            }

            if let Some(provider) = provider {
                self.lookup(situation, provider);
            }

            for (j, donor) in donors.iter().enumerate() {
                if j != i {
                    situation.transfer_ground_elevation_from(donor, self.radius);
                }
            }

            if i > 0 && i + 1 < donors.len() {
                let (prev, next) = (&donors[i - 1], &donors[i + 1]);
                let dt = (next.adjusted_epoch() - prev.adjusted_epoch()).to_seconds();
                let fraction =
                    (situation.adjusted_epoch() - prev.adjusted_epoch()).to_seconds() / dt;
                if let Some(elevation) = self.interpolated_elevation(prev, next, fraction) {
                    let plane = ElevationPlane::new(situation.position, elevation, self.radius);
                    situation.set_ground_elevation_checked(
                        &plane,
                        ElevationSource::Interpolated,
                        false,
                    );
                }
            }

            if situation.ground_elevation().is_some() {
                stats.found += 1;
            } else {
                debug!("{}: no elevation for {}", situation.callsign, situation.t);
                stats.missed += 1;
            }
        }
        stats
    }

    /// Presets the elevation of an interpolated situation from the two
    /// situations bounding it. The first applicable source wins:
    /// - transfer from `old`, when `old` and `new` are (almost) at the same place
    /// - mean elevation of the window, when it barely varies
    /// - interpolation between `old` and `new`
    ///
    /// Returns true when an elevation is known.
    pub fn preset(
        &self,
        situation: &mut Situation,
        old: &Situation,
        new: &Situation,
        change: Option<&SituationChange>,
        fraction: f64,
    ) -> bool {
        situation.elevation = GroundElevation::none();

        let min_transfer = Duration::from_milliseconds(MIN_TRANSFER_TIME_MS);
        let transfer_radius = new.distance_per_time(min_transfer, self.radius);
        let nearby = old.position.equal_normal_vector(&new.position)
            || new.great_circle_distance(old) < transfer_radius;

        let mean = change
            .filter(|change| change.has_elevation_dev_within_allowed_range(self.allowed_deviation))
            .and_then(|change| change.elevation_mean());

        if nearby && old.ground_elevation().is_some() {
            situation.elevation = old.elevation.with_transferred(true);
        } else if let Some(mean) = mean {
            situation.set_ground_elevation(mean, ElevationSource::SituationChange);
        } else if let Some(elevation) = self.interpolated_elevation(old, new, fraction) {
            situation.set_ground_elevation(elevation, ElevationSource::Interpolated);
        }

        situation.ground_elevation().is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{Callsign, Epoch};

    fn situation_at(lat_deg: f64) -> Situation {
        Situation::new(
            Callsign::new("AFR447"),
            Epoch::from_gregorian_utc_at_midnight(2025, 1, 1),
            Position::from_geo_deg(lat_deg, 2.55),
            Length::new::<foot>(400.0),
        )
    }

    #[test]
    fn explicit_source_ranking() {
        let ordered = [
            ElevationSource::NoElevation,
            ElevationSource::Test,
            ElevationSource::SituationChange,
            ElevationSource::Extrapolated,
            ElevationSource::Average,
            ElevationSource::Interpolated,
            ElevationSource::FromCache,
            ElevationSource::FromProvider,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1], "{} should rank below {}", pair[0], pair[1]);
        }
        assert_eq!(ordered.iter().max(), Some(&ElevationSource::FromProvider));
    }

    #[test]
    fn other_is_better() {
        let provider =
            GroundElevation::new(Length::new::<foot>(100.0), ElevationSource::FromProvider);
        assert!(!provider.is_other_better(ElevationSource::Extrapolated, false));
        assert!(!provider.is_other_better(ElevationSource::FromProvider, false));

        let interpolated =
            GroundElevation::new(Length::new::<foot>(100.0), ElevationSource::Interpolated);
        assert!(interpolated.is_other_better(ElevationSource::FromCache, true));
        assert!(!interpolated.is_other_better(ElevationSource::Test, false));
        assert!(!interpolated.is_other_better(ElevationSource::Interpolated, true));

        let transferred = interpolated.with_transferred(true);
        assert!(transferred.is_other_better(ElevationSource::Interpolated, false));

        assert!(GroundElevation::none().is_other_better(ElevationSource::SituationChange, false));
    }

    #[test]
    fn none_source_is_unusable() {
        let elevation =
            GroundElevation::new(Length::new::<foot>(100.0), ElevationSource::NoElevation);
        assert_eq!(elevation.value(), None);
        let elevation =
            GroundElevation::new(Length::new::<foot>(f64::NAN), ElevationSource::FromCache);
        assert_eq!(elevation.value(), None);
        assert_eq!(elevation.source(), ElevationSource::NoElevation);
    }

    #[test]
    fn transfer_guards() {
        let radius = Length::new::<meter>(100.0);
        let from = situation_at(49.0)
            .with_ground_elevation(Length::new::<foot>(300.0), ElevationSource::Interpolated);

        let mut to = situation_at(49.0001);
        assert!(to.transfer_ground_elevation_from(&from, radius));
        assert!(to.ground_elevation_info().is_transferred());
        assert_eq!(to.ground_elevation_info().source(), ElevationSource::Interpolated);

        let mut cached = situation_at(49.0001)
            .with_ground_elevation(Length::new::<foot>(310.0), ElevationSource::FromCache);
        assert!(!cached.transfer_ground_elevation_from(&from, radius));
        assert!((cached.ground_elevation().unwrap().get::<foot>() - 310.0).abs() < 1.0E-9);

        let mut far = situation_at(49.01);
        assert!(!far.transfer_ground_elevation_from(&from, radius));
        assert_eq!(far.ground_elevation(), None);
    }
}
