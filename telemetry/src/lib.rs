use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw electrical readings for one complete measurement block, before any
/// derived quantity has been estimated. Currents are in amps (the solar
/// current arrives in milliamps on the wire and is converted at extraction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReadings {
    pub v_pv: f64,
    pub i_pv: f64,
    pub v_wind: f64,
    pub i_wind: f64,
    pub lux: f64,
    pub fan_pwm: f64,
}

/// One fully-derived, timestamped telemetry record.
///
/// Immutable once built: both producers construct it through
/// [`TelemetrySample::from_parts`], which applies the rounding policy, and
/// append it to storage exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TelemetrySample {
    pub timestamp: i64,
    pub v_pv: f64,
    pub i_pv: f64,
    pub v_wind: f64,
    pub i_wind: f64,
    pub v_bat: f64,
    pub soc: f64,
    pub wind_speed: f64,
    pub lux: f64,
    pub fan_pwm: f64,
}

impl TelemetrySample {
    /// Builds a sample from raw readings plus the estimated battery and wind
    /// quantities, rounding every field to its stored precision: voltages and
    /// wind speed to 2 decimals, currents to 3, soc and fan duty to 1, lux to
    /// a whole number.
    pub fn from_parts(
        timestamp: i64,
        raw: &RawReadings,
        v_bat: f64,
        soc: f64,
        wind_speed: f64,
    ) -> Self {
        Self {
            timestamp,
            v_pv: round_to(raw.v_pv, 2),
            i_pv: round_to(raw.i_pv, 3),
            v_wind: round_to(raw.v_wind, 2),
            i_wind: round_to(raw.i_wind, 3),
            v_bat: round_to(v_bat, 2),
            soc: round_to(soc, 1),
            wind_speed: round_to(wind_speed, 2),
            lux: round_to(raw.lux, 0),
            fan_pwm: round_to(raw.fan_pwm, 1),
        }
    }
}

/// Rounds to the given number of decimal places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
