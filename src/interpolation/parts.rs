use log::debug;

use uom::si::{f64::Length, length::foot};

use crate::{
    interpolation::lerp,
    prelude::{
        AircraftModel, Config, Duration, Epoch, Lights, OnGround, Parts, Situation,
        SituationChange,
    },
};

/// Below this height above ground (feet): final approach configuration
const FINAL_APPROACH_HEIGHT_FT: f64 = 300.0;

/// Below this height above ground (feet) while climbing: initial climb
const INITIAL_CLIMB_HEIGHT_FT: f64 = 500.0;

/// Below this height above ground (feet): approach configuration
const APPROACH_HEIGHT_FT: f64 = 1000.0;

/// How the [Parts] of one step were obtained
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PartsStatus {
    /// Parts are received for this aircraft
    pub supports_parts: bool,
    /// Parts of a previous step are reused
    pub reused: bool,
    /// Same values as the previous parts
    pub same_as_previous: bool,
    /// Parts were guessed, not received
    pub guessed: bool,
}

impl std::fmt::Display for PartsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "supported: {} reused: {} same: {} guessed: {}",
            self.supports_parts, self.reused, self.same_as_previous, self.guessed
        )
    }
}

/// Inputs of one parts evaluation
pub(crate) struct PartsContext<'a> {
    pub t: Epoch,
    pub counter: u64,
    pub aircraft_number: u32,
    /// Received parts, oldest first
    pub received: &'a [Parts],
    /// Interpolated situation of this step
    pub situation: Option<&'a Situation>,
    pub change: Option<&'a SituationChange>,
    pub model: &'a AircraftModel,
}

/// Interpolates received parts, or guesses them, at a reduced cadence
#[derive(Debug, Clone)]
pub struct PartsInterpolator {
    parts_ratio: u64,
    guessing_ratio: u64,
    max_age: Option<Duration>,
    last: Option<Parts>,
    last_status: PartsStatus,
}

impl PartsInterpolator {
    /// Builds new [PartsInterpolator] from a validated [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            parts_ratio: cfg.parts_ratio.max(1) as u64,
            guessing_ratio: cfg.guessing_ratio.max(1) as u64,
            max_age: cfg.parts_max_age(),
            last: None,
            last_status: PartsStatus::default(),
        }
    }

    /// Last evaluated [Parts]
    pub fn last_parts(&self) -> Option<&Parts> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.last_status = PartsStatus::default();
    }

    /// Previous [Parts], marked as reused
    pub(crate) fn reuse(&self) -> (Option<Parts>, PartsStatus) {
        let status = PartsStatus {
            reused: true,
            same_as_previous: true,
            ..self.last_status
        };
        (self.last.clone(), status)
    }

    fn is_recent(&self, received: &[Parts], t: Epoch) -> bool {
        match (received.last(), self.max_age) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(newest), Some(max_age)) => t - newest.adjusted_epoch() <= max_age,
        }
    }

    /// Evaluates, guesses or reuses the [Parts] of this step
    pub(crate) fn get_parts(&mut self, ctx: &PartsContext) -> (Option<Parts>, PartsStatus) {
        let slot = ctx.counter.wrapping_add(ctx.aircraft_number as u64);
        let supports_parts = self.is_recent(ctx.received, ctx.t);

        // switching between received and guessed parts is never delayed
        let need = match &self.last {
            Some(last) => last.is_guessed() == supports_parts,
            None => true,
        };

        let parts = if supports_parts {
            if !need && slot % self.parts_ratio != 0 {
                return self.reuse();
            }
            Self::interpolate(ctx.received, ctx.t)
        } else {
            if !need && slot % self.guessing_ratio != 0 {
                return self.reuse();
            }
            ctx.situation
                .map(|situation| Self::guess(situation, ctx.change, ctx.model))
        };

        let status = PartsStatus {
            supports_parts,
            reused: false,
            guessed: parts.as_ref().map(|p| p.is_guessed()).unwrap_or(false),
            same_as_previous: match (&self.last, &parts) {
                (Some(last), Some(parts)) => last.equal_values(parts),
                (None, None) => true,
                _ => false,
            },
        };

        if parts.is_some() {
            self.last = parts.clone();
            self.last_status = status;
        }
        (parts, status)
    }

    /// Holds the most recent received [Parts] valid at `t` (or the
    /// oldest one when all are more recent). Only flaps are blended
    /// toward the next sample.
    pub fn interpolate(received: &[Parts], t: Epoch) -> Option<Parts> {
        let i = match received.iter().rposition(|p| p.adjusted_epoch() <= t) {
            Some(i) => i,
            None => return received.first().cloned(),
        };

        let mut parts = received[i].clone();
        if let Some(next) = received.get(i + 1) {
            let dt = (next.adjusted_epoch() - parts.adjusted_epoch()).to_seconds();
            if dt > 0.0 {
                let fraction = ((t - parts.adjusted_epoch()).to_seconds() / dt).clamp(0.0, 1.0);
                parts.flaps_percent = lerp(parts.flaps_percent, next.flaps_percent, fraction);
            }
        }
        Some(parts)
    }

    /// Guesses the [Parts] of an aircraft that does not send any
    pub fn guess(
        situation: &Situation,
        change: Option<&SituationChange>,
        model: &AircraftModel,
    ) -> Parts {
        let on_ground = situation.is_on_ground();
        let moving = situation.is_moving();
        let vr = model.rotate_speed_or_default();

        let mut parts = Parts::new(situation.t)
            .with_time_offset(situation.offset)
            .with_lights(Lights::guessed(situation))
            .with_on_ground(on_ground)
            .with_engines(model.engine_count, !on_ground || moving)
            .guessed();

        let (climbing, descending, decelerating) = match change {
            Some(change) if !change.is_null() => (
                change.const_ascending,
                change.const_descending,
                change.const_decelerating,
            ),
            _ => (false, false, false),
        };

        if on_ground {
            parts.gear_down = true;
            if moving && decelerating {
                // landing roll
                parts.spoilers_out = true;
                parts.flaps_percent = 10.0;
            }
            return parts;
        }

        if situation.on_ground.on_ground() == OnGround::Unknown {
            parts.gear_down = true;
            return parts;
        }

        match situation.height_above_ground(model.cg) {
            Some(height) => {
                let threshold = if climbing {
                    INITIAL_CLIMB_HEIGHT_FT
                } else {
                    APPROACH_HEIGHT_FT
                };
                if height < Length::new::<foot>(FINAL_APPROACH_HEIGHT_FT) {
                    parts.gear_down = true;
                    parts.flaps_percent = 25.0;
                } else if height < Length::new::<foot>(threshold) {
                    parts.gear_down =
                        !climbing && (situation.ground_speed < vr || descending);
                    parts.flaps_percent = 10.0;
                } else {
                    parts.gear_down = false;
                    parts.flaps_percent = 0.0;
                }
            },
            None => {
                parts.gear_down = !model.vtol && situation.ground_speed < vr;
            },
        }

        debug!(
            "{}: guessed parts, gear down: {} flaps: {}%",
            situation.callsign, parts.gear_down, parts.flaps_percent
        );
        parts
    }
}
