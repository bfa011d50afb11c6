#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uom::si::{length::foot, velocity::knot};

use crate::{
    constants::LANDING_LIGHTS_ALTITUDE_FT,
    prelude::{Duration, Epoch, Situation},
};

/// Above this ground speed (knots) landing lights replace taxi lights
const TAKEOFF_LIGHTS_SPEED_KTS: f64 = 30.0;

/// Above this ground speed (knots) taxi lights are on
const TAXI_LIGHTS_SPEED_KTS: f64 = 5.0;

/// Aircraft lights
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lights {
    pub strobe: bool,
    pub landing: bool,
    pub taxi: bool,
    pub beacon: bool,
    pub nav: bool,
    pub logo: bool,
    pub recognition: bool,
    pub cabin: bool,
}

impl Lights {
    /// Lights a crew would most likely use in this [Situation]
    pub fn guessed(situation: &Situation) -> Self {
        let mut lights = Self {
            cabin: true,
            recognition: true,
            beacon: true,
            nav: true,
            ..Default::default()
        };

        let gs_kts = situation.ground_speed().get::<knot>();
        if situation.is_on_ground() {
            if gs_kts > TAKEOFF_LIGHTS_SPEED_KTS {
                lights.landing = true;
            } else if gs_kts > TAXI_LIGHTS_SPEED_KTS {
                lights.taxi = true;
            }
        } else {
            lights.strobe = true;
            lights.landing = situation.altitude().get::<foot>() < LANDING_LIGHTS_ALTITUDE_FT;
        }
        lights
    }
}

/// Whether [Parts] were received or guessed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PartsDetails {
    #[default]
    Received,
    Guessed,
}

impl std::fmt::Display for PartsDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::Guessed => write!(f, "guessed"),
        }
    }
}

/// Aircraft [Parts] (gear, flaps, lights, engines) valid from an instant on.
/// "No parts ever received" is expressed as `Option::<Parts>::None`,
/// which differs from [Parts] with everything off.
#[derive(Debug, Clone, PartialEq)]
pub struct Parts {
    pub(crate) t: Epoch,
    pub(crate) offset: Duration,
    pub gear_down: bool,
    /// Flaps extension, 0 to 100 %
    pub flaps_percent: f64,
    pub spoilers_out: bool,
    pub on_ground: bool,
    pub lights: Lights,
    /// On / off state of each engine
    pub engines: Vec<bool>,
    pub(crate) details: PartsDetails,
}

impl Parts {
    /// Builds new received [Parts], everything off or retracted
    pub fn new(t: Epoch) -> Self {
        Self {
            t,
            offset: Duration::ZERO,
            gear_down: false,
            flaps_percent: 0.0,
            spoilers_out: false,
            on_ground: false,
            lights: Lights::default(),
            engines: Vec::new(),
            details: PartsDetails::Received,
        }
    }

    pub fn with_gear_down(mut self, gear_down: bool) -> Self {
        self.gear_down = gear_down;
        self
    }

    pub fn with_flaps_percent(mut self, flaps_percent: f64) -> Self {
        self.flaps_percent = flaps_percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_spoilers_out(mut self, spoilers_out: bool) -> Self {
        self.spoilers_out = spoilers_out;
        self
    }

    pub fn with_on_ground(mut self, on_ground: bool) -> Self {
        self.on_ground = on_ground;
        self
    }

    pub fn with_lights(mut self, lights: Lights) -> Self {
        self.lights = lights;
        self
    }

    /// Copies and returns [Parts] with `count` engines, all in the same state
    pub fn with_engines(mut self, count: u8, on: bool) -> Self {
        self.engines = vec![on; count as usize];
        self
    }

    pub fn with_time_offset(mut self, offset: Duration) -> Self {
        self.offset = offset;
        self
    }

    pub(crate) fn guessed(mut self) -> Self {
        self.details = PartsDetails::Guessed;
        self
    }

    pub fn epoch(&self) -> Epoch {
        self.t
    }

    /// Validity [Epoch] compensated by the network time offset
    pub fn adjusted_epoch(&self) -> Epoch {
        self.t + self.offset
    }

    pub fn details(&self) -> PartsDetails {
        self.details
    }

    pub fn is_guessed(&self) -> bool {
        self.details == PartsDetails::Guessed
    }

    pub fn engines_on(&self) -> usize {
        self.engines.iter().filter(|on| **on).count()
    }

    /// Same visible state, regardless of timestamps and provenance
    pub fn equal_values(&self, rhs: &Self) -> bool {
        self.gear_down == rhs.gear_down
            && self.flaps_percent == rhs.flaps_percent
            && self.spoilers_out == rhs.spoilers_out
            && self.on_ground == rhs.on_ground
            && self.lights == rhs.lights
            && self.engines == rhs.engines
    }
}

impl std::fmt::Display for Parts {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) gear: {} flaps: {:.0}% spoilers: {} gnd: {} engines: {}/{}",
            self.t,
            self.details,
            if self.gear_down { "down" } else { "up" },
            self.flaps_percent,
            self.spoilers_out,
            self.on_ground,
            self.engines_on(),
            self.engines.len(),
        )
    }
}
