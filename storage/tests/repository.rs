use storage::{TelemetryRepository, create_pool};
use telemetry::{RawReadings, TelemetrySample};

fn sample(timestamp: i64, v_pv: f64) -> TelemetrySample {
    let raw = RawReadings {
        v_pv,
        i_pv: 1.204,
        v_wind: 12.3,
        i_wind: 0.5,
        lux: 45000.0,
        fan_pwm: 75.0,
    };
    TelemetrySample::from_parts(timestamp, &raw, 7.81, 55.6, 3.46)
}

async fn test_repo(dir: &tempfile::TempDir) -> TelemetryRepository {
    let path = dir.path().join("telemetry.db");
    let pool = create_pool(path.to_str().expect("utf-8 temp path"))
        .await
        .expect("pool");
    TelemetryRepository::new(pool)
}

#[tokio::test]
async fn round_trip_preserves_rounded_values_exactly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    let written = sample(1_700_000_000, 18.51);
    repo.save(&written).await.expect("save");

    let read = repo.latest().await.expect("latest").expect("one sample");
    assert_eq!(read, written);
}

#[tokio::test]
async fn latest_returns_newest_by_timestamp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    for ts in [100, 300, 200] {
        repo.save(&sample(ts, 10.0)).await.expect("save");
    }

    let latest = repo.latest().await.expect("latest").expect("samples");
    assert_eq!(latest.timestamp, 300);
}

#[tokio::test]
async fn latest_on_empty_table_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    assert!(repo.latest().await.expect("latest").is_none());
}

#[tokio::test]
async fn history_filters_window_and_orders_ascending() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    for ts in [100, 200, 300, 400] {
        repo.save(&sample(ts, 10.0)).await.expect("save");
    }

    let rows = repo
        .history(Some(150), Some(350), 500)
        .await
        .expect("history");
    let timestamps: Vec<i64> = rows.iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, vec![200, 300]);

    let unbounded = repo.history(None, None, 500).await.expect("history");
    assert_eq!(unbounded.len(), 4);

    let capped = repo.history(None, None, 2).await.expect("history");
    assert_eq!(capped.len(), 2);
}

#[tokio::test]
async fn summary_aggregates_the_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    repo.save(&sample(100, 10.0)).await.expect("save");
    repo.save(&sample(200, 20.0)).await.expect("save");
    // Outside the window.
    repo.save(&sample(10, 99.0)).await.expect("save");

    let summary = repo.summary(50).await.expect("summary");
    assert_eq!(summary.count, 2);
    assert_eq!(summary.min_v_pv, Some(10.0));
    assert_eq!(summary.max_v_pv, Some(20.0));
    assert_eq!(summary.avg_v_pv, Some(15.0));
}

#[tokio::test]
async fn summary_of_empty_window_has_zero_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = test_repo(&dir).await;

    let summary = repo.summary(0).await.expect("summary");
    assert_eq!(summary.count, 0);
    assert_eq!(summary.avg_v_pv, None);
}
