use serde::Serialize;
use telemetry::TelemetrySample;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[derive(Debug, Serialize)]
pub struct TelemetryResponse {
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

impl From<TelemetrySample> for TelemetryResponse {
    fn from(sample: TelemetrySample) -> Self {
        Self {
            timestamp: sample.timestamp,
            v_pv: sample.v_pv,
            i_pv: sample.i_pv,
            v_wind: sample.v_wind,
            i_wind: sample.i_wind,
            v_bat: sample.v_bat,
            soc: sample.soc,
            wind_speed: sample.wind_speed,
            lux: sample.lux,
            fan_pwm: sample.fan_pwm,
        }
    }
}

/// Average/minimum/maximum of one field over the summary window.
#[derive(ToSchema)]
#[derive(Debug, Serialize)]
pub struct StatRange {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(ToSchema)]
#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub voltage: StatRange,
    pub current: StatRange,
    pub power_avg: f64,
}

#[derive(ToSchema)]
#[derive(Debug, Serialize)]
pub struct BatterySummary {
    pub voltage: StatRange,
    pub soc: StatRange,
}

#[derive(ToSchema)]
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: String,
    pub sample_count: i64,
    pub pv: SourceSummary,
    pub wind: SourceSummary,
    pub battery: BatterySummary,
    pub wind_speed: StatRange,
    pub lux: StatRange,
    pub fan_pwm: StatRange,
    pub total_power_avg: f64,
}
