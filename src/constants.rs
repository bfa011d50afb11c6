/// Mean Earth radius (meters), used for great circle distances
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Number of situations a window holds at most
pub const SITUATION_WINDOW_SIZE: usize = 3;

/// Default parts evaluation ratio: parts are (re-)interpolated every n-th step
pub const DEFAULT_PARTS_RATIO: u32 = 2;

/// Default parts guessing ratio: parts are (re-)guessed every n-th step
pub const DEFAULT_GUESSING_RATIO: u32 = 5;

/// Ratios must stay in 1..=[MAX_RATIO]
pub const MAX_RATIO: u32 = 10;

/// Two ground elevations farther apart than this (feet) are not interpolated
pub const MAX_DELTA_ELEVATION_FT: f64 = 25.0;

/// Allowed elevation / scenery deviation (feet)
pub const ALLOWED_ALTITUDE_DEVIATION_FT: f64 = 3.0;

/// Elevations found within this radius (meters) are valid for a position
pub const SINGLE_POINT_RADIUS_M: f64 = 100.0;

/// Distance travelled during this time span (milliseconds) still counts as "same place"
pub const MIN_TRANSFER_TIME_MS: f64 = 250.0;

/// Below this height above ground (meters) an aircraft is considered on ground
pub const DELTA_NEAR_GROUND_M: f64 = 0.5;

/// Above this height above ground (meters) near ground work is skipped
pub const SKIP_NEAR_GROUND_HEIGHT_M: f64 = 400.0;

/// Above this ground speed (knots) near ground work is skipped
pub const SKIP_NEAR_GROUND_SPEED_KTS: f64 = 225.0;

/// Minimum ground speed (km/h) of a moving aircraft
pub const MOVING_SPEED_KMH: f64 = 2.5;

/// Rotate speed (knots) used when the aircraft model does not provide one
pub const DEFAULT_ROTATE_SPEED_KTS: f64 = 100.0;

/// Above this ground speed (knots) an aircraft with unknown rotate speed is airborne
pub const SURE_ROTATE_SPEED_KTS: f64 = 130.0;

/// Safety factor applied to the rotate speed when guessing "surely airborne"
pub const SURE_ROTATE_FACTOR: f64 = 1.25;

/// Ground factor above which the aircraft is on ground
pub const GROUND_FACTOR_THRESHOLD: f64 = 0.95;

/// Tolerance of the ground factor predicates
pub const GROUND_FACTOR_EPSILON: f64 = 1.0E-6;

/// Stored angles are normalized to +/- this value (degrees)
pub const HALF_TURN_DEG: f64 = 180.0;

/// Landing lights are guessed on below this altitude (feet)
pub const LANDING_LIGHTS_ALTITUDE_FT: f64 = 10_000.0;

/// Default capacity of the in-memory diagnostic logger
pub const DEFAULT_LOGGER_CAPACITY: usize = 1000;
