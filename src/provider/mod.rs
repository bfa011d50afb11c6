//! Situation, parts and elevation sources the interpolation pulls from
use std::sync::Arc;

use uom::si::f64::Length;

use crate::prelude::{Callsign, ElevationPlane, Parts, Situation, SituationChange};

mod store;

pub use store::{RemoteAircraftStore, StoreEvent};

/// Immutable snapshot of the recent situations of one aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationWindow {
    /// Situations, oldest first
    pub situations: Arc<[Situation]>,
    /// Increases every time the situations of this aircraft change
    pub revision: u64,
}

impl Default for SituationWindow {
    fn default() -> Self {
        Self {
            situations: Arc::from(Vec::new()),
            revision: 0,
        }
    }
}

impl SituationWindow {
    pub fn len(&self) -> usize {
        self.situations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.situations.is_empty()
    }
}

/// Thread safe source of remote aircraft data, populated by the network.
/// Every read must be an atomic and self consistent snapshot.
pub trait SituationProvider {
    /// Most recent situations of this aircraft, oldest first
    fn situations(&self, callsign: &Callsign) -> SituationWindow;

    /// Most recent received [Parts], None if never received
    fn latest_parts(&self, callsign: &Callsign) -> Option<Parts>;

    /// Recent received [Parts], oldest first
    fn parts(&self, callsign: &Callsign) -> Arc<[Parts]> {
        Arc::from(self.latest_parts(callsign).into_iter().collect::<Vec<_>>())
    }

    /// Summary of the recent situations
    fn situation_change(&self, callsign: &Callsign) -> Option<SituationChange>;
}

/// Ground elevation source (simulator terrain probe, elevation cache..)
pub trait ElevationProvider {
    /// Closest known elevation plane within `range` of this situation
    fn find_closest_elevation_within_range(
        &self,
        situation: &Situation,
        range: Length,
    ) -> Option<ElevationPlane>;
}

impl<F> ElevationProvider for F
where
    F: Fn(&Situation, Length) -> Option<ElevationPlane>,
{
    fn find_closest_elevation_within_range(
        &self,
        situation: &Situation,
        range: Length,
    ) -> Option<ElevationPlane> {
        self(situation, range)
    }
}
