//! Electrical model constants for the station. Anything tuned against the
//! real hardware lives here, not inline at the use site.

/// Usable battery capacity: a 12 V, 7 Ah pack.
pub const CAPACITY_WH: f64 = 84.0;

/// Constant load drawn by the controller and sensors.
pub const LOAD_W: f64 = 5.0;

/// EMA weight on the newest estimate.
pub const EMA_ALPHA: f64 = 0.3;

/// Below this wind speed the turbine produces no current.
pub const CUT_IN_SPEED: f64 = 2.0;

/// Battery voltage at 0 % state of charge.
pub const V_BAT_MIN: f64 = 7.0;

/// Battery voltage at 100 % state of charge.
pub const V_BAT_MAX: f64 = 8.4;

/// Upper bound of the wind-speed estimate.
pub const WIND_SPEED_MAX: f64 = 10.0;

/// Nominal device cadence: one block per second.
pub const READER_DT_HOURS: f64 = 1.0 / 3600.0;

/// Synthetic generator cadence.
pub const SIM_INTERVAL_SECS: u64 = 2;

/// [`SIM_INTERVAL_SECS`] expressed in hours for the energy integration.
pub const SIM_DT_HOURS: f64 = 2.0 / 3600.0;
