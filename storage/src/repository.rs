use sqlx::{FromRow, Pool, Sqlite};
use telemetry::TelemetrySample;

const SAMPLE_COLUMNS: &str =
    "timestamp, v_pv, i_pv, v_wind, i_wind, v_bat, soc, wind_speed, lux, fan_pwm";

/// Append-only access to the telemetry table.
#[derive(Clone)]
pub struct TelemetryRepository {
    pool: Pool<Sqlite>,
}

/// Aggregates over a time window, one avg/min/max triple per stored field.
/// The aggregate columns are NULL when the window is empty.
#[derive(Debug, FromRow)]
pub struct SummaryRow {
    pub count: i64,
    pub avg_v_pv: Option<f64>,
    pub min_v_pv: Option<f64>,
    pub max_v_pv: Option<f64>,
    pub avg_i_pv: Option<f64>,
    pub min_i_pv: Option<f64>,
    pub max_i_pv: Option<f64>,
    pub avg_v_wind: Option<f64>,
    pub min_v_wind: Option<f64>,
    pub max_v_wind: Option<f64>,
    pub avg_i_wind: Option<f64>,
    pub min_i_wind: Option<f64>,
    pub max_i_wind: Option<f64>,
    pub avg_v_bat: Option<f64>,
    pub min_v_bat: Option<f64>,
    pub max_v_bat: Option<f64>,
    pub avg_soc: Option<f64>,
    pub min_soc: Option<f64>,
    pub max_soc: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub min_wind_speed: Option<f64>,
    pub max_wind_speed: Option<f64>,
    pub avg_lux: Option<f64>,
    pub min_lux: Option<f64>,
    pub max_lux: Option<f64>,
    pub avg_fan_pwm: Option<f64>,
    pub min_fan_pwm: Option<f64>,
    pub max_fan_pwm: Option<f64>,
}

impl TelemetryRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Appends one sample as its own commit.
    pub async fn save(&self, sample: &TelemetrySample) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO telemetry ({SAMPLE_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        sqlx::query(&sql)
            .bind(sample.timestamp)
            .bind(sample.v_pv)
            .bind(sample.i_pv)
            .bind(sample.v_wind)
            .bind(sample.i_wind)
            .bind(sample.v_bat)
            .bind(sample.soc)
            .bind(sample.wind_speed)
            .bind(sample.lux)
            .bind(sample.fan_pwm)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// The most recent sample, if any.
    pub async fn latest(&self) -> Result<Option<TelemetrySample>, sqlx::Error> {
        let sql = format!(
            "SELECT {SAMPLE_COLUMNS} FROM telemetry ORDER BY timestamp DESC LIMIT 1"
        );
        sqlx::query_as::<_, TelemetrySample>(&sql)
            .fetch_optional(&self.pool)
            .await
    }

    /// Samples in `[start_ts, end_ts]`, ascending, capped at `limit`.
    /// Either bound may be omitted.
    pub async fn history(
        &self,
        start_ts: Option<i64>,
        end_ts: Option<i64>,
        limit: i64,
    ) -> Result<Vec<TelemetrySample>, sqlx::Error> {
        let mut sql = format!("SELECT {SAMPLE_COLUMNS} FROM telemetry WHERE 1=1");
        if start_ts.is_some() {
            sql.push_str(" AND timestamp >= ?");
        }
        if end_ts.is_some() {
            sql.push_str(" AND timestamp <= ?");
        }
        sql.push_str(" ORDER BY timestamp ASC LIMIT ?");

        let mut query = sqlx::query_as::<_, TelemetrySample>(&sql);
        if let Some(start) = start_ts {
            query = query.bind(start);
        }
        if let Some(end) = end_ts {
            query = query.bind(end);
        }
        query.bind(limit).fetch_all(&self.pool).await
    }

    /// Count/avg/min/max per field for samples at or after `since_ts`.
    pub async fn summary(&self, since_ts: i64) -> Result<SummaryRow, sqlx::Error> {
        sqlx::query_as::<_, SummaryRow>(
            "SELECT \
                COUNT(*) AS count, \
                AVG(v_pv) AS avg_v_pv, MIN(v_pv) AS min_v_pv, MAX(v_pv) AS max_v_pv, \
                AVG(i_pv) AS avg_i_pv, MIN(i_pv) AS min_i_pv, MAX(i_pv) AS max_i_pv, \
                AVG(v_wind) AS avg_v_wind, MIN(v_wind) AS min_v_wind, MAX(v_wind) AS max_v_wind, \
                AVG(i_wind) AS avg_i_wind, MIN(i_wind) AS min_i_wind, MAX(i_wind) AS max_i_wind, \
                AVG(v_bat) AS avg_v_bat, MIN(v_bat) AS min_v_bat, MAX(v_bat) AS max_v_bat, \
                AVG(soc) AS avg_soc, MIN(soc) AS min_soc, MAX(soc) AS max_soc, \
                AVG(wind_speed) AS avg_wind_speed, MIN(wind_speed) AS min_wind_speed, \
                MAX(wind_speed) AS max_wind_speed, \
                AVG(lux) AS avg_lux, MIN(lux) AS min_lux, MAX(lux) AS max_lux, \
                AVG(fan_pwm) AS avg_fan_pwm, MIN(fan_pwm) AS min_fan_pwm, MAX(fan_pwm) AS max_fan_pwm \
             FROM telemetry WHERE timestamp >= ?",
        )
        .bind(since_ts)
        .fetch_one(&self.pool)
        .await
    }
}
