use std::sync::{Arc, Mutex, PoisonError};

use uom::si::{
    length::foot,
    velocity::knot,
};

use crate::prelude::{
    Callsign, Duration, Epoch, Length, Parts, Position, Situation, SituationChange,
    SituationProvider, SituationWindow, Velocity,
};

/// Callsign used by most scenarios
pub const CALLSIGN: &str = "DLH4AB";

/// Reference latitude (degrees), close to EDDF
pub const REF_LATITUDE_DEG: f64 = 50.0379;

/// Reference longitude (degrees), close to EDDF
pub const REF_LONGITUDE_DEG: f64 = 8.5622;

/// Reference [Epoch] of all scenarios
pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2025, 1, 1)
}

/// [Epoch] `dt_s` seconds after [t0]
pub fn t0_plus(dt_s: f64) -> Epoch {
    t0() + Duration::from_seconds(dt_s)
}

pub fn callsign() -> Callsign {
    Callsign::new(CALLSIGN)
}

/// Airborne [Situation] `dt_s` seconds after [t0], flying north at 250 kts.
/// Latitude progresses with time so successive samples never coincide.
pub fn flying(dt_s: f64, altitude_ft: f64) -> Situation {
    Situation::new(
        callsign(),
        t0_plus(dt_s),
        Position::from_geo_deg(REF_LATITUDE_DEG + dt_s * 1.0E-3, REF_LONGITUDE_DEG),
        Length::new::<foot>(altitude_ft),
    )
    .with_ground_speed(Velocity::new::<knot>(250.0))
}

/// Static [Situation] `dt_s` seconds after [t0], at the reference point
pub fn parked(dt_s: f64, altitude_ft: f64) -> Situation {
    Situation::new(
        callsign(),
        t0_plus(dt_s),
        Position::from_geo_deg(REF_LATITUDE_DEG, REF_LONGITUDE_DEG),
        Length::new::<foot>(altitude_ft),
    )
}

/// [SituationProvider] serving windows as given, without any sanitization.
#[derive(Debug, Default)]
pub struct TestProvider {
    window: Mutex<SituationWindow>,
    parts: Mutex<Vec<Parts>>,
    change: Mutex<Option<SituationChange>>,
}

impl TestProvider {
    pub fn new(situations: Vec<Situation>) -> Self {
        let provider = Self::default();
        provider.set_situations(situations);
        provider
    }

    /// Replaces the window and bumps its revision
    pub fn set_situations(&self, situations: Vec<Situation>) {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        window.situations = Arc::from(situations);
        window.revision += 1;
    }

    pub fn set_parts(&self, parts: Vec<Parts>) {
        *self.parts.lock().unwrap_or_else(PoisonError::into_inner) = parts;
    }

    pub fn set_situation_change(&self, change: SituationChange) {
        *self.change.lock().unwrap_or_else(PoisonError::into_inner) = Some(change);
    }
}

impl SituationProvider for TestProvider {
    fn situations(&self, _: &Callsign) -> SituationWindow {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn latest_parts(&self, _: &Callsign) -> Option<Parts> {
        self.parts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn parts(&self, _: &Callsign) -> Arc<[Parts]> {
        Arc::from(
            self.parts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        )
    }

    fn situation_change(&self, _: &Callsign) -> Option<SituationChange> {
        self.change
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
