use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, RwLock,
    },
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::{
    constants::SITUATION_WINDOW_SIZE,
    prelude::{Callsign, Error, Parts, Situation, SituationChange},
    provider::{SituationProvider, SituationWindow},
};

/// Number of parts samples kept per aircraft
const PARTS_CAPACITY: usize = 3;

/// Notifications sent to [RemoteAircraftStore] subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    AircraftAdded(Callsign),
    SituationsChanged(Callsign),
    PartsChanged(Callsign),
    AircraftRemoved(Callsign),
}

#[derive(Debug, Clone)]
struct AircraftEntry {
    situations: Arc<[Situation]>,
    parts: Arc<[Parts]>,
    change: Option<SituationChange>,
    revision: u64,
}

impl Default for AircraftEntry {
    fn default() -> Self {
        Self {
            situations: Arc::from(Vec::new()),
            parts: Arc::from(Vec::new()),
            change: None,
            revision: 0,
        }
    }
}

/// Inserts `item` sorted by `key`, replacing an item with the same key,
/// and keeps the `capacity` most recent ones.
fn insert_sorted<T: Clone, K: PartialOrd, F: Fn(&T) -> K>(
    items: &[T],
    item: T,
    capacity: usize,
    key: F,
) -> Vec<T> {
    let mut items = items
        .iter()
        .filter(|existing| key(existing) != key(&item))
        .cloned()
        .collect::<Vec<_>>();
    let position = items
        .iter()
        .position(|existing| key(existing) > key(&item))
        .unwrap_or(items.len());
    items.insert(position, item);
    if items.len() > capacity {
        items.drain(..items.len() - capacity);
    }
    items
}

/// Reference [SituationProvider]: the network thread inserts received data,
/// the interpolation reads immutable snapshots. Lists are swapped, never
/// modified in place, so a reader never observes a partial update.
#[derive(Debug)]
pub struct RemoteAircraftStore {
    capacity: usize,
    aircraft: RwLock<HashMap<Callsign, AircraftEntry>>,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
    /// Last revision handed out, shared by all aircraft so that
    /// a removed then re-added aircraft never reuses one
    revision: AtomicU64,
}

impl Default for RemoteAircraftStore {
    fn default() -> Self {
        Self::new(SITUATION_WINDOW_SIZE)
    }
}

impl RemoteAircraftStore {
    /// Builds new [RemoteAircraftStore] keeping `capacity` situations per aircraft
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            aircraft: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Returns a new [StoreEvent] channel
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn notify(&self, events: Vec<StoreEvent>) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for event in events {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    /// Stores a new [Situation] received for `callsign`
    pub fn insert_situation(&self, callsign: &Callsign, situation: Situation) -> Result<(), Error> {
        if situation.callsign() != callsign {
            return Err(Error::WrongAircraft {
                expected: callsign.clone(),
                found: situation.callsign().clone(),
            });
        }

        let added = {
            let mut aircraft = self.aircraft.write().unwrap_or_else(PoisonError::into_inner);
            let added = !aircraft.contains_key(callsign);
            let entry = aircraft.entry(callsign.clone()).or_default();

            let situations = insert_sorted(
                &entry.situations,
                situation,
                self.capacity,
                Situation::adjusted_epoch,
            );
            entry.change = Some(SituationChange::new(&situations));
            entry.situations = Arc::from(situations);
            entry.revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
            added
        };

        let mut events = Vec::with_capacity(2);
        if added {
            info!("{}: new remote aircraft", callsign);
            events.push(StoreEvent::AircraftAdded(callsign.clone()));
        }
        events.push(StoreEvent::SituationsChanged(callsign.clone()));
        self.notify(events);
        Ok(())
    }

    /// Stores new [Parts] received for `callsign`.
    /// Parts of an aircraft never seen are discarded.
    pub fn insert_parts(&self, callsign: &Callsign, parts: Parts) -> bool {
        {
            let mut aircraft = self.aircraft.write().unwrap_or_else(PoisonError::into_inner);
            let entry = match aircraft.get_mut(callsign) {
                Some(entry) => entry,
                None => {
                    debug!("{}: parts of unknown aircraft discarded", callsign);
                    return false;
                },
            };
            let parts = insert_sorted(&entry.parts, parts, PARTS_CAPACITY, Parts::adjusted_epoch);
            entry.parts = Arc::from(parts);
        }
        self.notify(vec![StoreEvent::PartsChanged(callsign.clone())]);
        true
    }

    /// Removes an aircraft that left the session
    pub fn remove_aircraft(&self, callsign: &Callsign) -> bool {
        let removed = self
            .aircraft
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(callsign)
            .is_some();
        if removed {
            info!("{}: remote aircraft removed", callsign);
            self.notify(vec![StoreEvent::AircraftRemoved(callsign.clone())]);
        }
        removed
    }

    /// All known aircraft, sorted
    pub fn callsigns(&self) -> Vec<Callsign> {
        let mut callsigns = self
            .aircraft
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        callsigns.sort();
        callsigns
    }

    fn entry(&self, callsign: &Callsign) -> Option<AircraftEntry> {
        self.aircraft
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(callsign)
            .cloned()
    }
}

impl SituationProvider for RemoteAircraftStore {
    fn situations(&self, callsign: &Callsign) -> SituationWindow {
        match self.entry(callsign) {
            Some(entry) => SituationWindow {
                situations: entry.situations,
                revision: entry.revision,
            },
            None => SituationWindow::default(),
        }
    }

    fn latest_parts(&self, callsign: &Callsign) -> Option<Parts> {
        self.entry(callsign)
            .and_then(|entry| entry.parts.last().cloned())
    }

    fn parts(&self, callsign: &Callsign) -> Arc<[Parts]> {
        match self.entry(callsign) {
            Some(entry) => entry.parts,
            None => Arc::from(Vec::new()),
        }
    }

    fn situation_change(&self, callsign: &Callsign) -> Option<SituationChange> {
        self.entry(callsign).and_then(|entry| entry.change)
    }
}
