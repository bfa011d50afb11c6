use std::sync::Arc;

use log::{debug, error, warn};

use uom::si::f64::Length;

use crate::{
    interpolation::{
        bracket,
        parts::PartsContext,
        sample_times, Interpolant, InterpolantKind, InterpolationLogger, InterpolationResult,
        InterpolationStatus, InterpolatorStats, LinearInterpolant, LinearPbh, PartsInterpolator,
        PartsLog, PartsStatus, SituationLog, SplineCoefficients, SplineInterpolant,
    },
    prelude::{
        AircraftModel, AltitudeCorrection, Callsign, Config, Duration, ElevationPolicy,
        ElevationProvider, Epoch, Error, GroundDetails, GroundElevation, InterpolatorMode,
        OnGroundInfo, Parts, Setup, Situation, SituationChange, SituationProvider,
    },
    situation::{normalize_deg, ElevationStats},
};

/// Details of one step, for diagnostics
struct StepDetails {
    interpolant: Option<InterpolantKind>,
    fraction: f64,
    delta_sample_time: Duration,
    interpolated_time: Option<Epoch>,
    recalculated: bool,
    ground_factor: Option<f64>,
    altitude_correction: Option<AltitudeCorrection>,
}

impl Default for StepDetails {
    fn default() -> Self {
        Self {
            interpolant: None,
            fraction: 0.0,
            delta_sample_time: Duration::ZERO,
            interpolated_time: None,
            recalculated: false,
            ground_factor: None,
            altitude_correction: None,
        }
    }
}

/// Last step, returned as is when queried again with unchanged inputs
struct LastStep {
    t: Epoch,
    setup: Setup,
    revision: u64,
    received: Arc<[Parts]>,
    result: InterpolationResult,
}

/// [Interpolator] of one remote aircraft.
/// Invoked once per frame from the simulation thread, it turns the sparse
/// situations received for this aircraft into a situation (and parts)
/// at any requested instant. It owns its state exclusively, only the
/// [SituationProvider] is shared with the network thread.
pub struct Interpolator {
    callsign: Callsign,
    cfg: Config,
    model: AircraftModel,
    policy: ElevationPolicy,
    provider: Arc<dyn SituationProvider + Send + Sync>,
    elevation: Option<Arc<dyn ElevationProvider + Send + Sync>>,
    logger: Option<Arc<dyn InterpolationLogger>>,
    parts: PartsInterpolator,
    /// Sanitized and backfilled window, oldest first
    window: Vec<Situation>,
    /// (revision, scenery fix) the window was built for
    window_key: Option<(u64, bool)>,
    change: Option<SituationChange>,
    spline: Option<SplineCoefficients>,
    scenery_offset: Option<Length>,
    elevation_stats: ElevationStats,
    last_situation: Option<Situation>,
    last_query: Option<Epoch>,
    last_step: Option<LastStep>,
    /// Frame counter
    counter: u64,
    stats: InterpolatorStats,
}

impl Interpolator {
    /// Builds new [Interpolator] for `callsign`
    /// - cfg: validated global [Config]
    /// - model: [AircraftModel] resolved by the host
    /// - provider: [SituationProvider] populated by the network
    /// - elevation: optional [ElevationProvider]
    pub fn new(
        callsign: Callsign,
        cfg: Config,
        model: AircraftModel,
        provider: Arc<dyn SituationProvider + Send + Sync>,
        elevation: Option<Arc<dyn ElevationProvider + Send + Sync>>,
    ) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            policy: ElevationPolicy::new(&cfg),
            parts: PartsInterpolator::new(&cfg),
            callsign,
            cfg,
            model,
            provider,
            elevation,
            logger: None,
            window: Vec::new(),
            window_key: None,
            change: None,
            spline: None,
            scenery_offset: None,
            elevation_stats: ElevationStats::default(),
            last_situation: None,
            last_query: None,
            last_step: None,
            counter: 0,
            stats: InterpolatorStats::default(),
        })
    }

    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    pub fn aircraft_model(&self) -> &AircraftModel {
        &self.model
    }

    /// Updates the [AircraftModel], once the host has matched one
    pub fn set_aircraft_model(&mut self, model: AircraftModel) {
        self.model = model;
        self.window_key = None;
        self.last_step = None;
    }

    /// Attaches an [InterpolationLogger] receiving one record per step
    pub fn attach_logger(&mut self, logger: Arc<dyn InterpolationLogger>) {
        self.logger = Some(logger);
    }

    pub fn detach_logger(&mut self) {
        self.logger = None;
    }

    /// Number of degenerate steps so far
    pub fn invalid_situations(&self) -> u64 {
        self.stats.invalid_situations
    }

    pub fn stats(&self) -> &InterpolatorStats {
        &self.stats
    }

    /// Last valid situation
    pub fn last_situation(&self) -> Option<&Situation> {
        self.last_situation.as_ref()
    }

    /// Last evaluated [Parts]
    pub fn last_parts(&self) -> Option<&Parts> {
        self.parts.last_parts()
    }

    /// Forgets the last interpolation: the next query behaves like the first one
    pub fn reset_last_interpolation(&mut self) {
        self.last_situation = None;
        self.last_query = None;
        self.last_step = None;
        self.parts.reset();
    }

    /// Human readable summary
    pub fn interpolator_info(&self) -> String {
        format!(
            "Callsign: {} situations: {} parts: {} 1st interpolation: {} {}",
            self.callsign,
            self.provider.situations(&self.callsign).len(),
            self.provider.parts(&self.callsign).len(),
            if self.last_situation.is_none() {
                "yes"
            } else {
                "no"
            },
            self.stats,
        )
    }

    /// Interpolates the situation (and parts) of this aircraft at `t`.
    /// - t: query [Epoch], must not decrease from one call to the next
    /// - setup: per aircraft [Setup]
    /// - aircraft_number: sequence number of this aircraft, staggers
    ///   the parts evaluation of many aircraft across frames
    ///
    /// Never fails: degenerate input produces a held result and is counted.
    /// Querying the same instant twice, with unchanged provider data,
    /// returns the same result.
    pub fn get_interpolation(
        &mut self,
        t: Epoch,
        setup: &Setup,
        aircraft_number: u32,
    ) -> InterpolationResult {
        if let Some(last) = self.last_query {
            if t < last {
                return self.non_monotonic(t, last, setup);
            }
        }
        if let Some(last) = &self.last_step {
            if last.t == t && last.setup == *setup && self.is_unchanged(last) {
                return last.result.clone();
            }
        }

        if self.last_query != Some(t) {
            self.counter += 1;
        }
        self.last_query = Some(t);

        let mut degenerate = self.update_window(setup);
        let mut step = StepDetails::default();
        let mut status = InterpolationStatus {
            situations: self.window.len(),
            ..Default::default()
        };

        let situation = match self.window.len() {
            0 => {
                degenerate = true;
                status.same_situation = true;
                self.last_situation.clone()
            },
            1 => {
                degenerate = true;
                status.same_situation = true;
                Some(self.window[0].clone())
            },
            _ if !setup.force_full_interpolation && self.is_parked() => {
                status.same_situation = true;
                self.parked(setup)
            },
            _ => match self.interpolate(t, setup, &mut status, &mut step) {
                Some(situation) => {
                    status.interpolated = true;
                    self.stats.interpolations += 1;
                    Some(situation)
                },
                None => {
                    degenerate = true;
                    status.same_situation = true;
                    self.last_situation.clone()
                },
            },
        };

        status.degenerate = degenerate || status.clamped;
        if status.degenerate {
            self.invalid_situation(t);
        }

        if let Some(situation) = &situation {
            self.last_situation = Some(situation.clone());
        }

        let received = self.provider.parts(&self.callsign);

        let (parts, parts_status) = if setup.parts_enabled {
            self.evaluate_parts(t, aircraft_number, situation.as_ref(), &received)
        } else {
            (None, PartsStatus::default())
        };

        if let Some(logger) = &self.logger {
            logger.log_situation(SituationLog {
                callsign: self.callsign.clone(),
                t,
                counter: self.counter,
                situations: self.window.clone(),
                interpolant: step.interpolant,
                delta_sample_time: step.delta_sample_time,
                fraction: step.fraction,
                interpolated_time: step.interpolated_time,
                recalculated: step.recalculated,
                ground_factor: step.ground_factor,
                altitude_correction: step.altitude_correction,
                elevation: situation
                    .as_ref()
                    .map(|s| s.elevation)
                    .unwrap_or_else(GroundElevation::none),
                elevations_found_missed: (self.elevation_stats.found, self.elevation_stats.missed),
                scenery_offset: self.scenery_offset,
                invalid_situations: self.stats.invalid_situations,
                change: self.change.clone(),
                result: situation.clone(),
            });
            if setup.parts_enabled {
                logger.log_parts(PartsLog {
                    callsign: self.callsign.clone(),
                    t,
                    counter: self.counter,
                    parts: parts.clone(),
                    status: parts_status,
                });
            }
        }

        let result = InterpolationResult {
            situation: Self::ground_flag(situation, setup),
            parts,
            status,
            parts_status,
        };

        self.last_step = Some(LastStep {
            t,
            received,
            setup: setup.clone(),
            revision: self.window_key.map(|(revision, _)| revision).unwrap_or_default(),
            result: result.clone(),
        });
        result
    }

    fn is_unchanged(&self, last: &LastStep) -> bool {
        self.provider.situations(&self.callsign).revision == last.revision
            && *self.provider.parts(&self.callsign) == *last.received
    }

    fn ground_flag(situation: Option<Situation>, setup: &Setup) -> Option<Situation> {
        if setup.send_ground_flag {
            situation
        } else {
            situation.map(|mut situation| {
                situation.on_ground = OnGroundInfo::unknown();
                situation
            })
        }
    }

    /// Query in the past: hold the last result
    fn non_monotonic(&mut self, t: Epoch, last: Epoch, setup: &Setup) -> InterpolationResult {
        debug!("{}: query {} precedes {}", self.callsign, t, last);
        self.invalid_situation(t);

        let (parts, parts_status) = if setup.parts_enabled {
            self.parts.reuse()
        } else {
            (None, PartsStatus::default())
        };

        InterpolationResult {
            situation: Self::ground_flag(self.last_situation.clone(), setup),
            parts,
            parts_status,
            status: InterpolationStatus {
                same_situation: true,
                degenerate: true,
                situations: self.window.len(),
                ..Default::default()
            },
        }
    }

    fn invalid_situation(&mut self, t: Epoch) {
        self.stats.invalid_situations += 1;
        // the first one may be a regular log off
        if self.stats.invalid_situations == 2 {
            warn!(
                "{}: invalid situation #{} at {} (window: {})",
                self.callsign,
                self.stats.invalid_situations,
                t,
                self.window.len()
            );
        } else {
            debug!(
                "{}: invalid situation #{} at {}",
                self.callsign, self.stats.invalid_situations, t
            );
        }
    }

    /// Rebuilds the window when the provider data changed.
    /// Returns true when corrupt situations had to be dropped.
    fn update_window(&mut self, setup: &Setup) -> bool {
        let snapshot = self.provider.situations(&self.callsign);
        let key = (snapshot.revision, setup.fix_scenery_offset);
        if self.window_key == Some(key) && !setup.force_full_interpolation {
            return false;
        }
        self.window_key = Some(key);
        self.spline = None;

        let mut dropped = 0;
        let mut window: Vec<Situation> = Vec::with_capacity(snapshot.len());

        for situation in snapshot.situations.iter() {
            debug_assert_eq!(
                situation.callsign(),
                &self.callsign,
                "situation window of another aircraft"
            );
            if situation.callsign() != &self.callsign {
                error!(
                    "{}: situation of {} ignored",
                    self.callsign,
                    situation.callsign()
                );
                continue;
            }
            let increasing = window
                .last()
                .map(|last| situation.adjusted_epoch() > last.adjusted_epoch())
                .unwrap_or(true);
            if !situation.is_valid() || !increasing {
                dropped += 1;
                continue;
            }
            window.push(situation.clone());
        }

        if window.len() > self.cfg.window_size {
            window.drain(..window.len() - self.cfg.window_size);
        }

        let change = self
            .provider
            .situation_change(&self.callsign)
            .unwrap_or_else(|| SituationChange::new(&window));

        let elevation = self
            .elevation
            .as_deref()
            .map(|provider| provider as &dyn ElevationProvider);

        self.elevation_stats = self.policy.backfill(&mut window, elevation);
        self.stats.elevations_found += self.elevation_stats.found;
        self.stats.elevations_missed += self.elevation_stats.missed;

        self.scenery_offset = None;
        if setup.fix_scenery_offset {
            if let Some(cg) = self.model.cg {
                self.scenery_offset = SituationChange::scenery_deviation(
                    &window,
                    cg,
                    self.policy.allowed_deviation(),
                );
            }
        }
        if let Some(offset) = self.scenery_offset {
            debug!("{}: scenery offset {:?}", self.callsign, offset);
            for situation in window.iter_mut() {
                situation.altitude -= offset;
            }
        }

        self.change = Some(change);
        self.window = window;

        if dropped > 0 {
            debug!("{}: {} corrupt situation(s) dropped", self.callsign, dropped);
        }
        dropped > 0
    }

    /// Same position and attitude across the window
    fn is_parked(&self) -> bool {
        match self.window.last() {
            Some(newest) => self
                .window
                .iter()
                .all(|situation| situation.equal_pbh_and_position(newest)),
            None => false,
        }
    }

    fn parked(&self, setup: &Setup) -> Option<Situation> {
        let mut situation = self.window.last()?.clone();
        if situation.is_on_ground() {
            if let Some(pitch_deg) = setup.pitch_on_ground_deg {
                situation.pitch_deg = normalize_deg(pitch_deg);
            }
        }
        Some(situation)
    }

    fn interpolate(
        &mut self,
        t: Epoch,
        setup: &Setup,
        status: &mut InterpolationStatus,
        step: &mut StepDetails,
    ) -> Option<Situation> {
        let times = sample_times(&self.window);
        let x = (t - self.window.first()?.adjusted_epoch()).to_seconds();
        let (i, fraction, clamped) = bracket(&times, x)?;
        status.clamped = clamped;

        let pbh = LinearPbh::new(fraction, &self.window[i], &self.window[i + 1]);
        let cg = self.model.cg;

        if setup.mode == InterpolatorMode::Spline && self.window.len() > 2 {
            let recalculated = self.spline.is_none() || setup.force_full_interpolation;
            if recalculated {
                self.spline = SplineCoefficients::new(&self.window, cg);
                self.stats.recalculations += 1;
            }
            let spline = self.spline.as_ref().and_then(|coefficients| {
                SplineInterpolant::new(coefficients, &self.window, i, x, pbh, recalculated)
            });
            match spline {
                Some(interpolant) => return self.evaluate(&interpolant, i, setup, status, step),
                None => debug!("{}: degenerate spline, linear fallback", self.callsign),
            }
        }

        let interpolant = LinearInterpolant::new(&self.window[i], &self.window[i + 1], pbh, cg);
        self.evaluate(&interpolant, i, setup, status, step)
    }

    /// Completes the interpolated situation: attitude, elevation, ground contact
    fn evaluate<I: Interpolant>(
        &self,
        interpolant: &I,
        i: usize,
        setup: &Setup,
        status: &mut InterpolationStatus,
        step: &mut StepDetails,
    ) -> Option<Situation> {
        let (start, end) = (&self.window[i], &self.window[i + 1]);
        let pbh = interpolant.pbh();
        let fraction = pbh.fraction();

        status.interpolant = Some(interpolant.kind());
        status.recalculated = interpolant.is_recalculated();
        step.interpolant = Some(interpolant.kind());
        step.recalculated = interpolant.is_recalculated();
        step.fraction = fraction;
        step.delta_sample_time = end.adjusted_epoch() - start.adjusted_epoch();
        step.interpolated_time = Some(interpolant.interpolated_time());

        let position = interpolant.position().normalized()?;

        let mut situation = Situation {
            position,
            callsign: self.callsign.clone(),
            altitude: interpolant.altitude(),
            heading_deg: pbh.heading_deg(),
            pitch_deg: pbh.pitch_deg(),
            bank_deg: pbh.bank_deg(),
            ground_speed: pbh.ground_speed(),
            velocity: end.velocity,
            on_ground: OnGroundInfo::unknown(),
            elevation: GroundElevation::none(),
            cg: self.model.cg,
            t: interpolant.interpolated_time(),
            offset: start.offset + (end.offset - start.offset) * fraction,
        };

        if !situation.is_valid() {
            return None;
        }

        let change = self.change.as_ref();

        if !situation.can_likely_skip_near_ground_interpolation() {
            self.policy
                .preset(&mut situation, start, end, change, fraction);
            if situation.ground_elevation().is_none() {
                if let Some(provider) = &self.elevation {
                    self.policy.lookup(&mut situation, provider.as_ref());
                }
            }
        }

        let interpolate_gnd = start.on_ground.has_ground_details_for_interpolation()
            && end.on_ground.has_ground_details_for_interpolation();

        if interpolate_gnd {
            let gf = interpolant.ground_factor();
            situation.on_ground = OnGroundInfo::from_factor(gf);
            step.ground_factor = Some(gf);
        } else {
            let unknown = SituationChange::default();
            change
                .unwrap_or(&unknown)
                .guess_on_ground(&mut situation, &self.model);
        }

        if !interpolate_gnd && situation.on_ground.details() != GroundDetails::ByGuessing {
            let (altitude, correction) = situation.corrected_altitude(None, true);
            situation.altitude = altitude;
            step.altitude_correction = Some(correction);
        }

        if situation.is_on_ground() {
            if let Some(pitch_deg) = setup.pitch_on_ground_deg {
                situation.pitch_deg = normalize_deg(pitch_deg);
            }
        }

        Some(situation)
    }

    fn evaluate_parts(
        &mut self,
        t: Epoch,
        aircraft_number: u32,
        situation: Option<&Situation>,
        received: &[Parts],
    ) -> (Option<Parts>, PartsStatus) {
        let ctx = PartsContext {
            t,
            situation,
            aircraft_number,
            counter: self.counter,
            received,
            change: self.change.as_ref(),
            model: &self.model,
        };

        let (parts, status) = self.parts.get_parts(&ctx);

        if status.reused {
            self.stats.parts_reused += 1;
        } else if status.guessed {
            self.stats.parts_guessed += 1;
        } else if parts.is_some() {
            self.stats.parts_received += 1;
        }
        (parts, status)
    }
}
