//! Reconstruction of the quantities the sensor board does not measure.
//!
//! The board reports panel and turbine voltage/current, light level and fan
//! duty. Battery voltage, state of charge and wind speed are estimated here
//! from an energy-integration model, smoothed against the previous sample.
//! The same model runs behind the serial reader and the simulator so the two
//! data paths are indistinguishable downstream.

pub mod constants;

use crate::constants::{CAPACITY_WH, EMA_ALPHA, LOAD_W, V_BAT_MAX, V_BAT_MIN, WIND_SPEED_MAX};
use telemetry::RawReadings;

/// Smoothing state carried from one sample to the next. Lives for the
/// process lifetime; nothing is persisted across restarts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorState {
    pub v_bat: f64,
    pub soc: f64,
    pub wind_speed: f64,
}

impl Default for EstimatorState {
    fn default() -> Self {
        Self {
            v_bat: 7.5,
            soc: 50.0,
            wind_speed: 0.0,
        }
    }
}

impl EstimatorState {
    /// Applies the result of one estimation step. Called exactly once per
    /// emitted sample.
    pub fn advance(&mut self, derived: &Derived) {
        self.v_bat = derived.v_bat;
        self.soc = derived.soc;
        self.wind_speed = derived.wind_speed;
    }
}

/// The estimated quantities for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub v_bat: f64,
    pub soc: f64,
    pub wind_speed: f64,
}

/// Exponential moving average with the station-wide [`EMA_ALPHA`] weight on
/// the new estimate. Both the wind-speed estimator and the simulator's wind
/// walk go through this one function.
pub fn smooth(previous: f64, estimate: f64) -> f64 {
    (1.0 - EMA_ALPHA) * previous + EMA_ALPHA * estimate
}

/// Wind speed estimated from turbine electrical power.
///
/// For a small turbine `v ≈ 2·sqrt(P)` is a serviceable fit; the raw
/// estimate is clamped to the plausible range and then smoothed against the
/// previous value.
pub fn wind_speed_from_power(p_wind: f64, previous: f64) -> f64 {
    let estimate = if p_wind > 0.0 {
        (2.0 * p_wind.sqrt()).clamp(0.0, WIND_SPEED_MAX)
    } else {
        0.0
    };
    smooth(previous, estimate)
}

/// One energy-integration step for the battery.
///
/// Net power is generation minus the constant load; the state of charge
/// integrates it over `dt_hours` against the pack capacity. Voltage is a
/// pure linear function of state of charge between [`V_BAT_MIN`] and
/// [`V_BAT_MAX`], with no internal-resistance or hysteresis term.
pub fn battery_step(previous_soc: f64, p_pv: f64, p_wind: f64, dt_hours: f64) -> (f64, f64) {
    let p_net = p_pv + p_wind - LOAD_W;
    let delta_wh = p_net * dt_hours;
    let soc = (previous_soc + delta_wh / CAPACITY_WH * 100.0).clamp(0.0, 100.0);
    let v_bat = (V_BAT_MIN + (soc / 100.0) * (V_BAT_MAX - V_BAT_MIN)).clamp(V_BAT_MIN, V_BAT_MAX);
    (v_bat, soc)
}

/// Runs the full model over one block of raw readings. Pure: the caller
/// decides when to [`EstimatorState::advance`].
pub fn estimate(raw: &RawReadings, state: &EstimatorState, dt_hours: f64) -> Derived {
    let p_wind = raw.v_wind * raw.i_wind;
    let wind_speed = wind_speed_from_power(p_wind, state.wind_speed);

    let p_pv = raw.v_pv * raw.i_pv;
    let (v_bat, soc) = battery_step(state.soc, p_pv, p_wind, dt_hours);

    Derived {
        v_bat,
        soc,
        wind_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::READER_DT_HOURS;

    fn raw(v_pv: f64, i_pv: f64, v_wind: f64, i_wind: f64) -> RawReadings {
        RawReadings {
            v_pv,
            i_pv,
            v_wind,
            i_wind,
            lux: 0.0,
            fan_pwm: 0.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wind_speed_worked_example() {
        // p_wind = 100 W: raw estimate 2·10 clamps to 10, smoothed from a
        // standstill that gives 0.7·0 + 0.3·10 = 3.0.
        let speed = wind_speed_from_power(100.0, 0.0);
        assert!(close(speed, 3.0), "got {speed}");
    }

    #[test]
    fn no_wind_power_decays_toward_zero() {
        let speed = wind_speed_from_power(0.0, 4.0);
        assert!(close(speed, 2.8), "got {speed}");
    }

    #[test]
    fn zero_net_power_leaves_soc_unchanged() {
        // 5 W of PV exactly cancels the 5 W load.
        let state = EstimatorState::default();
        let derived = estimate(&raw(5.0, 1.0, 0.0, 0.0), &state, READER_DT_HOURS);
        assert_eq!(derived.soc, state.soc);
    }

    #[test]
    fn soc_and_voltage_stay_clamped() {
        let (v_hi, soc_hi) = battery_step(99.9, 10_000.0, 10_000.0, 1.0);
        assert_eq!(soc_hi, 100.0);
        assert_eq!(v_hi, 8.4);

        let (v_lo, soc_lo) = battery_step(0.1, 0.0, 0.0, 1.0);
        assert_eq!(soc_lo, 0.0);
        assert_eq!(v_lo, 7.0);
    }

    #[test]
    fn voltage_is_a_pure_function_of_soc() {
        let (v, soc) = battery_step(50.0, 5.0, 0.0, 0.0);
        assert_eq!(soc, 50.0);
        assert!(close(v, 7.0 + 1.4 * 0.5));
    }

    #[test]
    fn integration_is_linear_in_dt() {
        let dt = 0.5;
        let (_, soc_full) = battery_step(50.0, 12.0, 3.0, dt);

        let (_, soc_half) = battery_step(50.0, 12.0, 3.0, dt / 2.0);
        let (_, soc_two_halves) = battery_step(soc_half, 12.0, 3.0, dt / 2.0);

        assert!(close(soc_full, soc_two_halves));
    }

    #[test]
    fn smoothing_bounds_are_preserved() {
        // With prev and estimate both in range, the EMA cannot leave it.
        let mut state = EstimatorState::default();
        for _ in 0..1000 {
            let derived = estimate(&raw(18.0, 1.5, 20.0, 1.0), &state, READER_DT_HOURS);
            assert!((0.0..=100.0).contains(&derived.soc));
            assert!((7.0..=8.4).contains(&derived.v_bat));
            assert!((0.0..=10.0).contains(&derived.wind_speed));
            state.advance(&derived);
        }
    }

    #[test]
    fn state_advances_to_the_derived_values() {
        let mut state = EstimatorState::default();
        let derived = estimate(&raw(18.0, 1.2, 12.0, 0.5), &state, READER_DT_HOURS);
        state.advance(&derived);
        assert_eq!(state.v_bat, derived.v_bat);
        assert_eq!(state.soc, derived.soc);
        assert_eq!(state.wind_speed, derived.wind_speed);
    }
}
