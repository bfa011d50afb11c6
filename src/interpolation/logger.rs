use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use uom::si::{f64::Length, length::foot};

use crate::{
    constants::DEFAULT_LOGGER_CAPACITY,
    interpolation::{InterpolantKind, PartsStatus},
    prelude::{
        AltitudeCorrection, Callsign, Duration, Epoch, GroundElevation, Parts, Situation,
        SituationChange,
    },
};

/// Diagnostic record of one situation interpolation step
#[derive(Debug, Clone, PartialEq)]
pub struct SituationLog {
    pub callsign: Callsign,
    /// Query [Epoch]
    pub t: Epoch,
    /// Frame counter
    pub counter: u64,
    /// Window used, after elevation backfill
    pub situations: Vec<Situation>,
    pub interpolant: Option<InterpolantKind>,
    /// Time between the two bounding situations
    pub delta_sample_time: Duration,
    /// Time fraction between the two bounding situations
    pub fraction: f64,
    pub interpolated_time: Option<Epoch>,
    pub recalculated: bool,
    pub ground_factor: Option<f64>,
    pub altitude_correction: Option<AltitudeCorrection>,
    /// Elevation of the interpolated situation
    pub elevation: GroundElevation,
    /// Window elevations found / missed at the last backfill
    pub elevations_found_missed: (u64, u64),
    pub scenery_offset: Option<Length>,
    pub invalid_situations: u64,
    pub change: Option<SituationChange>,
    pub result: Option<Situation>,
}

impl std::fmt::Display for SituationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{} #{} @ {} [{}] fraction: {:.3} dt: {} invalid: {}",
            self.callsign,
            self.counter,
            self.t,
            self.interpolant.map(|k| k.as_char()).unwrap_or('-'),
            self.fraction,
            self.delta_sample_time,
            self.invalid_situations,
        )?;
        for (i, situation) in self.situations.iter().enumerate() {
            writeln!(f, "  [{}] {}", i, situation)?;
        }
        if let Some(change) = &self.change {
            writeln!(f, "  change: {}", change)?;
        }
        write!(
            f,
            "  elevation: {} found/missed: {}/{}",
            self.elevation, self.elevations_found_missed.0, self.elevations_found_missed.1
        )?;
        if let Some(correction) = self.altitude_correction {
            write!(f, " correction: {}", correction)?;
        }
        if let Some(offset) = self.scenery_offset {
            write!(f, " scenery offset: {:.1}ft", offset.get::<foot>())?;
        }
        if let Some(gf) = self.ground_factor {
            write!(f, " gf: {:.2}", gf)?;
        }
        if self.recalculated {
            write!(f, " (recalculated)")?;
        }
        match &self.result {
            Some(result) => write!(f, "\n  => {}", result),
            None => write!(f, "\n  => none"),
        }
    }
}

/// Diagnostic record of one parts step
#[derive(Debug, Clone, PartialEq)]
pub struct PartsLog {
    pub callsign: Callsign,
    pub t: Epoch,
    pub counter: u64,
    pub parts: Option<Parts>,
    pub status: PartsStatus,
}

impl std::fmt::Display for PartsLog {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} #{} @ {} {}", self.callsign, self.counter, self.t, self.status)?;
        match &self.parts {
            Some(parts) => write!(f, " => {}", parts),
            None => write!(f, " => none"),
        }
    }
}

/// Receives diagnostic records of an interpolator
pub trait InterpolationLogger: Send + Sync {
    fn log_situation(&self, log: SituationLog);
    fn log_parts(&self, log: PartsLog);
}

/// [InterpolationLogger] keeping the most recent records in memory
#[derive(Debug)]
pub struct MemoryLogger {
    capacity: usize,
    situations: Mutex<VecDeque<SituationLog>>,
    parts: Mutex<VecDeque<PartsLog>>,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_CAPACITY)
    }
}

impl MemoryLogger {
    /// Builds new [MemoryLogger] retaining `capacity` records of each kind
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            situations: Mutex::new(VecDeque::new()),
            parts: Mutex::new(VecDeque::new()),
        }
    }

    pub fn situation_logs(&self) -> Vec<SituationLog> {
        self.situations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn parts_logs(&self) -> Vec<PartsLog> {
        self.parts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.situations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.parts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push<T>(&self, records: &Mutex<VecDeque<T>>, record: T) {
        let mut records = records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}

impl InterpolationLogger for MemoryLogger {
    fn log_situation(&self, log: SituationLog) {
        self.push(&self.situations, log);
    }

    fn log_parts(&self, log: PartsLog) {
        self.push(&self.parts, log);
    }
}
