use uom::si::f64::Velocity;

use crate::{
    constants::HALF_TURN_DEG,
    interpolation::lerp,
    prelude::Situation,
    situation::normalize_deg,
};

/// Pitch, bank, heading and ground speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub heading_deg: f64,
    pub pitch_deg: f64,
    pub bank_deg: f64,
    pub ground_speed: Velocity,
}

impl Attitude {
    fn of(situation: &Situation) -> Self {
        Self {
            heading_deg: situation.heading_deg,
            pitch_deg: situation.pitch_deg,
            bank_deg: situation.bank_deg,
            ground_speed: situation.ground_speed,
        }
    }
}

/// Linear attitude blender between two situations.
/// Heading follows the shortest angular path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPbh {
    fraction: f64,
    clamped: bool,
    start: Attitude,
    end: Attitude,
}

impl LinearPbh {
    /// Builds new [LinearPbh]. `fraction` is clamped to [0, 1],
    /// [LinearPbh::is_clamped] tells the caller it had to.
    pub fn new(fraction: f64, start: &Situation, end: &Situation) -> Self {
        let (fraction, clamped) = if fraction.is_nan() {
            (0.0, true)
        } else if !(0.0..=1.0).contains(&fraction) {
            (fraction.clamp(0.0, 1.0), true)
        } else {
            (fraction, false)
        };
        Self {
            fraction,
            clamped,
            start: Attitude::of(start),
            end: Attitude::of(end),
        }
    }

    /// Time fraction in [0, 1]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// True if the requested fraction was outside [0, 1]
    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    /// Blended heading in ±180°. Opposite headings turn clockwise.
    pub fn heading_deg(&self) -> f64 {
        let mut delta = self.end.heading_deg - self.start.heading_deg;
        if delta > HALF_TURN_DEG {
            delta -= 2.0 * HALF_TURN_DEG;
        } else if delta <= -HALF_TURN_DEG {
            delta += 2.0 * HALF_TURN_DEG;
        }
        normalize_deg(self.start.heading_deg + delta * self.fraction)
    }

    pub fn pitch_deg(&self) -> f64 {
        lerp(self.start.pitch_deg, self.end.pitch_deg, self.fraction)
    }

    pub fn bank_deg(&self) -> f64 {
        lerp(self.start.bank_deg, self.end.bank_deg, self.fraction)
    }

    pub fn ground_speed(&self) -> Velocity {
        self.start.ground_speed + (self.end.ground_speed - self.start.ground_speed) * self.fraction
    }

    pub fn attitude(&self) -> Attitude {
        Attitude {
            heading_deg: self.heading_deg(),
            pitch_deg: self.pitch_deg(),
            bank_deg: self.bank_deg(),
            ground_speed: self.ground_speed(),
        }
    }
}

/// Blends the attitude of two situations, see [LinearPbh]
pub fn blend(start: &Situation, end: &Situation, fraction: f64) -> Attitude {
    LinearPbh::new(fraction, start, end).attitude()
}
