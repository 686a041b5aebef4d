//! Durable store for completed telemetry samples.
//!
//! One sample is one committed row; the producers append, the API reads.
//! Processes never talk to each other directly; the SQLite file is the only
//! coupling between them.

mod repository;

pub use repository::{SummaryRow, TelemetryRepository};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Opens (creating if necessary) the station database and runs migrations.
pub async fn create_pool(database_path: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    if let Some(parent) = Path::new(database_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
