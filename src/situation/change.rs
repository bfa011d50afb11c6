use itertools::Itertools;

use uom::si::{
    f64::Length,
    length::{foot, meter},
};

use crate::{
    averager::Averager,
    prelude::{AircraftModel, GroundDetails, OnGround, OnGroundInfo, Situation},
};

/// Pitch (degrees) beyond which an aircraft cannot be on ground
const MAX_PITCH_ON_GROUND_DEG: f64 = 20.0;

/// Bank (degrees) beyond which an aircraft cannot be on ground
const MAX_BANK_ON_GROUND_DEG: f64 = 10.0;

/// Summary of how an aircraft evolved across its recent situations.
/// Only a hint for elevation and parts guessing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SituationChange {
    /// Number of situations summarized
    pub situations: usize,
    pub const_ascending: bool,
    pub const_descending: bool,
    pub const_on_ground: bool,
    pub const_not_on_ground: bool,
    /// Newest airborne, all previous on ground
    pub just_takeoff: bool,
    /// Newest on ground, all previous airborne
    pub just_touchdown: bool,
    /// Situation before the newest was on ground
    pub was_on_ground: bool,
    /// Situation before the newest was airborne
    pub was_not_on_ground: bool,
    /// All situations before the newest were on ground
    pub was_const_on_ground: bool,
    /// Pitch constantly increasing
    pub rotating_up: bool,
    pub const_accelerating: bool,
    pub const_decelerating: bool,
    elevation_mean: Option<Length>,
    elevation_std_dev: Option<Length>,
}

fn strictly<F: Fn(f64, f64) -> bool>(values: &[f64], cmp: F) -> bool {
    values.len() > 1 && values.iter().tuple_windows().all(|(a, b)| cmp(*a, *b))
}

impl SituationChange {
    /// Summarizes a window of situations, oldest first
    pub fn new(situations: &[Situation]) -> Self {
        let n = situations.len();
        if n < 2 {
            return Self {
                situations: n,
                ..Default::default()
            };
        }

        let altitudes = situations
            .iter()
            .map(|s| s.altitude.get::<meter>())
            .collect::<Vec<_>>();
        let speeds = situations
            .iter()
            .map(|s| s.ground_speed.value)
            .collect::<Vec<_>>();
        let pitches = situations.iter().map(|s| s.pitch_deg).collect::<Vec<_>>();

        let ground = situations
            .iter()
            .map(|s| s.on_ground.on_ground())
            .collect::<Vec<_>>();

        let (newest, previous) = (ground[n - 1], &ground[..n - 1]);
        let all_yes = |g: &[OnGround]| g.iter().all(|g| *g == OnGround::Yes);
        let all_no = |g: &[OnGround]| g.iter().all(|g| *g == OnGround::No);

        let mut elevations = Averager::new();
        for elevation in situations.iter().filter_map(|s| s.ground_elevation()) {
            elevations.add(elevation.get::<meter>());
        }

        Self {
            situations: n,
            const_ascending: strictly(&altitudes, |a, b| b > a),
            const_descending: strictly(&altitudes, |a, b| b < a),
            const_on_ground: all_yes(&ground),
            const_not_on_ground: all_no(&ground),
            just_takeoff: newest == OnGround::No && all_yes(previous),
            just_touchdown: newest == OnGround::Yes && all_no(previous),
            was_on_ground: ground[n - 2] == OnGround::Yes,
            was_not_on_ground: ground[n - 2] == OnGround::No,
            was_const_on_ground: all_yes(previous),
            rotating_up: strictly(&pitches, |a, b| b > a),
            const_accelerating: strictly(&speeds, |a, b| b > a),
            const_decelerating: strictly(&speeds, |a, b| b < a),
            elevation_mean: if elevations.count > 0 {
                Some(Length::new::<meter>(elevations.mean))
            } else {
                None
            },
            elevation_std_dev: elevations.std_dev().map(Length::new::<meter>),
        }
    }

    /// Less than two situations: nothing can be told
    pub fn is_null(&self) -> bool {
        self.situations < 2
    }

    pub fn elevation_mean(&self) -> Option<Length> {
        self.elevation_mean
    }

    pub fn elevation_std_dev(&self) -> Option<Length> {
        self.elevation_std_dev
    }

    /// True when the window elevations barely vary, so their mean
    /// is a usable elevation for any position of this window.
    pub fn has_elevation_dev_within_allowed_range(&self, allowed: Length) -> bool {
        match self.elevation_std_dev {
            Some(std_dev) => !self.is_null() && std_dev <= allowed,
            None => false,
        }
    }

    /// Mean offset between the ground contact point of on ground situations
    /// and the ground elevation: a scenery mismatch between this client and
    /// the sender. None when unknown or within the allowed deviation.
    pub fn scenery_deviation(
        situations: &[Situation],
        cg: Length,
        allowed: Length,
    ) -> Option<Length> {
        let mut deviation = Averager::new();
        for situation in situations.iter().filter(|s| s.is_on_ground()) {
            if let Some(elevation) = situation.ground_elevation() {
                deviation.add((situation.altitude - elevation - cg).get::<meter>());
            }
        }
        if deviation.count == 0 {
            return None;
        }
        let deviation = Length::new::<meter>(deviation.mean);
        if deviation.abs() > allowed {
            Some(deviation)
        } else {
            None
        }
    }

    /// Guesses the ground contact of `situation` when no received ground
    /// information is available. Returns true when a guess was made.
    pub fn guess_on_ground(&self, situation: &mut Situation, model: &AircraftModel) -> bool {
        if situation.on_ground.has_ground_details_for_interpolation() {
            return false;
        }

        let guessed = |on_ground| OnGroundInfo::new(on_ground, GroundDetails::ByGuessing);

        // push back or parked
        if !model.vtol && (situation.ground_speed.value < 0.0 || !situation.is_moving()) {
            situation.on_ground = guessed(true);
            return true;
        }

        if situation.pitch_deg.abs() > MAX_PITCH_ON_GROUND_DEG
            || situation.bank_deg.abs() > MAX_BANK_ON_GROUND_DEG
        {
            situation.on_ground = guessed(false);
            return true;
        }

        if situation.ground_speed > model.sure_rotate_speed() {
            situation.on_ground = guessed(false);
            return true;
        }

        if situation.is_on_ground_by_elevation(model.cg) == OnGround::Yes {
            let details = if model.cg.is_some() {
                GroundDetails::ByElevationAndCg
            } else {
                GroundDetails::ByElevation
            };
            situation.on_ground = OnGroundInfo::new(true, details);
            return true;
        }

        if !self.is_null() {
            if self.was_const_on_ground {
                situation.on_ground = guessed(!self.rotating_up);
                return true;
            }
            if self.const_ascending {
                situation.on_ground = guessed(false);
                return true;
            }
        }

        if model.vtol {
            return false;
        }

        situation.on_ground = guessed(situation.ground_speed < model.rotate_speed_or_default());
        true
    }
}

impl std::fmt::Display for SituationChange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "no change");
        }
        write!(
            f,
            "{} situations, asc/desc: {}/{}, gnd/air: {}/{}",
            self.situations,
            self.const_ascending,
            self.const_descending,
            self.const_on_ground,
            self.const_not_on_ground,
        )?;
        write!(
            f,
            ", takeoff/touchdown: {}/{}, rotating up: {}",
            self.just_takeoff,
            self.just_touchdown,
            self.rotating_up,
        )?;
        match (self.elevation_mean, self.elevation_std_dev) {
            (Some(mean), Some(std_dev)) => write!(
                f,
                ", elevation {:.1}ft (σ={:.1}ft)",
                mean.get::<foot>(),
                std_dev.get::<foot>()
            ),
            _ => Ok(()),
        }
    }
}
