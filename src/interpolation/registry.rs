use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use crossbeam_channel::Receiver;

use log::{debug, error, info};

use crate::{
    interpolation::{InterpolationLogger, InterpolationResult, Interpolator},
    prelude::{
        AircraftModel, Callsign, Config, ElevationProvider, Epoch, Error, Setup,
        SituationProvider, StoreEvent,
    },
};

/// [InterpolatorRegistry] maintains one [Interpolator] per remote aircraft,
/// following the [StoreEvent]s of the network side.
pub struct InterpolatorRegistry {
    cfg: Config,
    provider: Arc<dyn SituationProvider + Send + Sync>,
    elevation: Option<Arc<dyn ElevationProvider + Send + Sync>>,
    logger: Option<Arc<dyn InterpolationLogger>>,
    events: Receiver<StoreEvent>,
    default_setup: Setup,
    setups: HashMap<Callsign, Setup>,
    models: HashMap<Callsign, AircraftModel>,
    /// Sorted by callsign, defines the aircraft sequence numbers
    interpolators: BTreeMap<Callsign, Interpolator>,
}

impl InterpolatorRegistry {
    /// Builds new [InterpolatorRegistry]
    /// - cfg: global [Config] shared by all interpolators
    /// - provider: [SituationProvider] populated by the network
    /// - events: [StoreEvent]s of that provider
    /// - elevation: optional [ElevationProvider]
    pub fn new(
        cfg: Config,
        provider: Arc<dyn SituationProvider + Send + Sync>,
        events: Receiver<StoreEvent>,
        elevation: Option<Arc<dyn ElevationProvider + Send + Sync>>,
    ) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            provider,
            elevation,
            events,
            logger: None,
            default_setup: Setup::default(),
            setups: HashMap::new(),
            models: HashMap::new(),
            interpolators: BTreeMap::new(),
        })
    }

    /// Copies and returns [InterpolatorRegistry] with [Setup] applying
    /// to aircraft without dedicated setup
    pub fn with_default_setup(mut self, setup: Setup) -> Self {
        self.default_setup = setup;
        self
    }

    /// Attaches an [InterpolationLogger] to current and future interpolators
    pub fn attach_logger(&mut self, logger: Arc<dyn InterpolationLogger>) {
        for interpolator in self.interpolators.values_mut() {
            interpolator.attach_logger(logger.clone());
        }
        self.logger = Some(logger);
    }

    /// Defines the [Setup] of one aircraft
    pub fn set_setup(&mut self, callsign: Callsign, setup: Setup) {
        self.setups.insert(callsign, setup);
    }

    /// Defines the [AircraftModel] of one aircraft
    pub fn set_model(&mut self, callsign: Callsign, model: AircraftModel) {
        if let Some(interpolator) = self.interpolators.get_mut(&callsign) {
            interpolator.set_aircraft_model(model);
        }
        self.models.insert(callsign, model);
    }

    pub fn len(&self) -> usize {
        self.interpolators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpolators.is_empty()
    }

    pub fn callsigns(&self) -> Vec<Callsign> {
        self.interpolators.keys().cloned().collect()
    }

    pub fn get(&self, callsign: &Callsign) -> Option<&Interpolator> {
        self.interpolators.get(callsign)
    }

    pub fn get_mut(&mut self, callsign: &Callsign) -> Option<&mut Interpolator> {
        self.interpolators.get_mut(callsign)
    }

    /// Creates the [Interpolator] of `callsign`, if not already known
    pub fn add(&mut self, callsign: Callsign) {
        if self.interpolators.contains_key(&callsign) {
            return;
        }
        let model = self.models.get(&callsign).copied().unwrap_or_default();
        match Interpolator::new(
            callsign.clone(),
            self.cfg.clone(),
            model,
            self.provider.clone(),
            self.elevation.clone(),
        ) {
            Ok(mut interpolator) => {
                if let Some(logger) = &self.logger {
                    interpolator.attach_logger(logger.clone());
                }
                info!("{}: interpolator created", callsign);
                self.interpolators.insert(callsign, interpolator);
            },
            Err(e) => error!("{}: failed to create interpolator: {}", callsign, e),
        }
    }

    /// Drops all state related to `callsign`
    pub fn remove(&mut self, callsign: &Callsign) -> bool {
        self.setups.remove(callsign);
        self.models.remove(callsign);
        let removed = self.interpolators.remove(callsign).is_some();
        if removed {
            info!("{}: interpolator removed", callsign);
        }
        removed
    }

    /// Consumes pending [StoreEvent]s. Returns the number of events.
    pub fn sync(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            count += 1;
            match event {
                StoreEvent::AircraftAdded(callsign) => self.add(callsign),
                StoreEvent::AircraftRemoved(callsign) => {
                    self.remove(&callsign);
                },
                StoreEvent::SituationsChanged(_) | StoreEvent::PartsChanged(_) => {},
            }
        }
        if count > 0 {
            debug!("registry: {} event(s), {} aircraft", count, self.len());
        }
        count
    }

    /// Interpolates all aircraft at `t`, after synchronization.
    /// Aircraft are numbered in callsign order.
    pub fn interpolate_all(&mut self, t: Epoch) -> Vec<(Callsign, InterpolationResult)> {
        self.sync();
        let mut results = Vec::with_capacity(self.interpolators.len());
        for (number, (callsign, interpolator)) in self.interpolators.iter_mut().enumerate() {
            let setup = self.setups.get(callsign).unwrap_or(&self.default_setup);
            let result = interpolator.get_interpolation(t, setup, number as u32);
            results.push((callsign.clone(), result));
        }
        results
    }
}
