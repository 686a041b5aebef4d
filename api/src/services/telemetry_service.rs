use crate::models::responses::{
    BatterySummary, SourceSummary, StatRange, SummaryResponse, TelemetryResponse,
};
use chrono::Utc;
use storage::{SummaryRow, TelemetryRepository};
use telemetry::round_to;

/// Window covered by the summary endpoint, in seconds.
const SUMMARY_WINDOW_SECS: i64 = 3600;

pub struct TelemetryService {
    repository: TelemetryRepository,
}

impl TelemetryService {
    pub fn new(repository: TelemetryRepository) -> Self {
        Self { repository }
    }

    pub async fn live(
        &self,
    ) -> Result<Option<TelemetryResponse>, Box<dyn std::error::Error + Send + Sync>> {
        let sample = self.repository.latest().await?;
        Ok(sample.map(TelemetryResponse::from))
    }

    pub async fn history(
        &self,
        start_ts: Option<i64>,
        end_ts: Option<i64>,
        limit: i64,
    ) -> Result<Vec<TelemetryResponse>, Box<dyn std::error::Error + Send + Sync>> {
        let samples = self.repository.history(start_ts, end_ts, limit).await?;
        Ok(samples.into_iter().map(TelemetryResponse::from).collect())
    }

    /// Aggregates over the last hour, or `None` when the window is empty.
    pub async fn summary(
        &self,
    ) -> Result<Option<SummaryResponse>, Box<dyn std::error::Error + Send + Sync>> {
        let since = Utc::now().timestamp() - SUMMARY_WINDOW_SECS;
        let row = self.repository.summary(since).await?;

        if row.count == 0 {
            return Ok(None);
        }
        Ok(Some(shape_summary(&row)))
    }
}

fn shape_summary(row: &SummaryRow) -> SummaryResponse {
    // Average power is the product of the average voltage and current, the
    // same estimate the dashboard has always displayed.
    let avg_p_pv = row.avg_v_pv.unwrap_or(0.0) * row.avg_i_pv.unwrap_or(0.0);
    let avg_p_wind = row.avg_v_wind.unwrap_or(0.0) * row.avg_i_wind.unwrap_or(0.0);

    SummaryResponse {
        period: "last 1 hour".to_string(),
        sample_count: row.count,
        pv: SourceSummary {
            voltage: stat(row.avg_v_pv, row.min_v_pv, row.max_v_pv, 2),
            current: stat(row.avg_i_pv, row.min_i_pv, row.max_i_pv, 3),
            power_avg: round_to(avg_p_pv, 2),
        },
        wind: SourceSummary {
            voltage: stat(row.avg_v_wind, row.min_v_wind, row.max_v_wind, 2),
            current: stat(row.avg_i_wind, row.min_i_wind, row.max_i_wind, 3),
            power_avg: round_to(avg_p_wind, 2),
        },
        battery: BatterySummary {
            voltage: stat(row.avg_v_bat, row.min_v_bat, row.max_v_bat, 2),
            soc: stat(row.avg_soc, row.min_soc, row.max_soc, 1),
        },
        wind_speed: stat(
            row.avg_wind_speed,
            row.min_wind_speed,
            row.max_wind_speed,
            2,
        ),
        lux: stat(row.avg_lux, row.min_lux, row.max_lux, 0),
        fan_pwm: stat(row.avg_fan_pwm, row.min_fan_pwm, row.max_fan_pwm, 1),
        total_power_avg: round_to(avg_p_pv + avg_p_wind, 2),
    }
}

fn stat(avg: Option<f64>, min: Option<f64>, max: Option<f64>, decimals: u32) -> StatRange {
    StatRange {
        avg: round_to(avg.unwrap_or(0.0), decimals),
        min: round_to(min.unwrap_or(0.0), decimals),
        max: round_to(max.unwrap_or(0.0), decimals),
    }
}
