//! Synthetic telemetry for development without the sensor board attached.
//!
//! The generator produces raw electrical readings from a diurnal solar
//! profile and a smoothed wind random walk, then runs them through the same
//! battery model as the serial path, so simulated and real streams are
//! indistinguishable to the API and dashboard.

use estimator::constants::{CUT_IN_SPEED, SIM_DT_HOURS, V_BAT_MAX, V_BAT_MIN, WIND_SPEED_MAX};
use estimator::{Derived, EstimatorState, battery_step, smooth};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use telemetry::{RawReadings, TelemetrySample};

/// Panel open-circuit voltage.
const V_PV_MAX: f64 = 18.0;
/// Panel short-circuit current.
const I_PV_MAX: f64 = 1.5;
/// Full-sun light level.
const LUX_MAX: f64 = 100_000.0;
/// Turbine voltage ceiling.
const V_WIND_MAX: f64 = 20.0;
/// Turbine current ceiling.
const I_WIND_MAX: f64 = 1.0;
/// Night-time solar factor stays below this fraction of full sun.
const NIGHT_FACTOR: f64 = 0.05;
/// Gaussian noise on the panel voltage, in volts.
const SOLAR_NOISE_SD: f64 = 0.5;
/// Gaussian noise on the modeled battery voltage, in volts.
const V_BAT_NOISE_SD: f64 = 0.05;
/// Fan duty floor while the fan runs.
const FAN_MIN_DUTY: f64 = 50.0;
/// Wind speed the random walk starts from.
const INITIAL_WIND_SPEED: f64 = 5.0;

/// Stateful sample generator. One call to [`Generator::next_sample`] per
/// tick yields one complete sample and advances the estimator state exactly
/// once, mirroring the ingestion path.
pub struct Generator {
    rng: StdRng,
    state: EstimatorState,
}

impl Generator {
    /// A fixed seed reproduces the full sample sequence; `None` seeds from
    /// the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            state: EstimatorState {
                wind_speed: INITIAL_WIND_SPEED,
                ..EstimatorState::default()
            },
        }
    }

    pub fn next_sample(&mut self, timestamp: i64, elapsed_hours: f64) -> TelemetrySample {
        let hour = elapsed_hours % 24.0;

        let (v_pv, i_pv, lux) = self.solar(hour);
        let (wind_speed, v_wind, i_wind) = self.wind();

        let p_pv = v_pv * i_pv;
        let p_wind = v_wind * i_wind;
        let (v_bat, soc) = battery_step(self.state.soc, p_pv, p_wind, SIM_DT_HOURS);
        let noise: f64 = self.rng.sample(StandardNormal);
        let v_bat = (v_bat + noise * V_BAT_NOISE_SD).clamp(V_BAT_MIN, V_BAT_MAX);

        let fan_pwm = self.fan(v_bat, soc);

        self.state.advance(&Derived {
            v_bat,
            soc,
            wind_speed,
        });

        let raw = RawReadings {
            v_pv,
            i_pv,
            v_wind,
            i_wind,
            lux,
            fan_pwm,
        };
        TelemetrySample::from_parts(timestamp, &raw, v_bat, soc, wind_speed)
    }

    /// Day/night cycle: a sine profile peaking at noon between 06:00 and
    /// 18:00, a small noise floor at night.
    fn solar(&mut self, hour: f64) -> (f64, f64, f64) {
        let factor = if (6.0..=18.0).contains(&hour) {
            ((hour - 6.0) * PI / 12.0).sin()
        } else {
            NIGHT_FACTOR * self.rng.random::<f64>()
        };

        let noise: f64 = self.rng.sample(StandardNormal);
        let v_pv = (3.0 + 15.0 * factor + noise * SOLAR_NOISE_SD).clamp(0.0, V_PV_MAX);
        let i_pv = (I_PV_MAX * factor * (0.8 + 0.4 * self.rng.random::<f64>())).clamp(0.0, I_PV_MAX);
        let lux = (LUX_MAX * factor * (0.9 + 0.2 * self.rng.random::<f64>())).clamp(0.0, LUX_MAX);

        (v_pv, i_pv, lux)
    }

    /// Bounded random walk toward a uniform target, smoothed with the
    /// shared EMA. No current below the cut-in speed.
    fn wind(&mut self) -> (f64, f64, f64) {
        let target = self.rng.random_range(0.0..WIND_SPEED_MAX);
        let wind_speed = smooth(self.state.wind_speed, target).clamp(0.0, WIND_SPEED_MAX);

        let v_wind =
            (2.0 * wind_speed * (0.8 + 0.4 * self.rng.random::<f64>())).clamp(0.0, V_WIND_MAX);
        let i_wind = if wind_speed > CUT_IN_SPEED {
            ((wind_speed / WIND_SPEED_MAX) * (0.7 + 0.6 * self.rng.random::<f64>()))
                .clamp(0.0, I_WIND_MAX)
        } else {
            0.0
        };

        (wind_speed, v_wind, i_wind)
    }

    /// Ventilation kicks in while the battery is nearly full.
    fn fan(&mut self, v_bat: f64, soc: f64) -> f64 {
        if soc > 80.0 || v_bat > 8.0 {
            self.rng.random_range(FAN_MIN_DUTY..100.0)
        } else {
            0.0
        }
    }
}
