use crate::models::requests::HistoryRequest;
use crate::models::responses::{SummaryResponse, TelemetryResponse};
use crate::services::telemetry_service::TelemetryService;
use actix_web::{HttpResponse, Responder, Result, get, web};
use log::error;
use serde_json::json;
use std::sync::Arc;

const DEFAULT_HISTORY_LIMIT: i64 = 500;

/// Most recent telemetry sample
#[utoipa::path(
    get,
    path = "/live",
    responses(
        (status = 200, description = "Success", body = TelemetryResponse),
        (status = 500, description = "Internal Server Error", body = String)
    ),
    tag = "Telemetry"
)]
#[get("/live")]
pub async fn get_live(service: web::Data<Arc<TelemetryService>>) -> Result<impl Responder> {
    match service.live().await {
        Ok(Some(sample)) => Ok(HttpResponse::Ok().json(sample)),
        Ok(None) => Ok(HttpResponse::Ok().json(json!({"error": "No telemetry data available"}))),
        Err(e) => {
            error!("Error fetching live telemetry: {}", e);
            Err(actix_web::error::ErrorInternalServerError(
                "Failed to fetch telemetry data",
            ))
        }
    }
}

/// Historical telemetry with optional window filtering
#[utoipa::path(
    get,
    path = "/history",
    params(HistoryRequest),
    responses(
        (status = 200, description = "Success", body = Vec<TelemetryResponse>),
        (status = 500, description = "Internal Server Error", body = String)
    ),
    tag = "Telemetry"
)]
#[get("/history")]
pub async fn get_history(
    req: web::Query<HistoryRequest>,
    service: web::Data<Arc<TelemetryService>>,
) -> Result<impl Responder> {
    let req = req.into_inner();
    let limit = req.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    match service.history(req.start_ts, req.end_ts, limit).await {
        Ok(samples) => Ok(HttpResponse::Ok().json(samples)),
        Err(e) => {
            error!("Error fetching telemetry history: {}", e);
            Err(actix_web::error::ErrorInternalServerError(
                "Failed to fetch telemetry data",
            ))
        }
    }
}

/// Aggregated statistics over the last hour
#[utoipa::path(
    get,
    path = "/summary",
    responses(
        (status = 200, description = "Success", body = SummaryResponse),
        (status = 500, description = "Internal Server Error", body = String)
    ),
    tag = "Telemetry"
)]
#[get("/summary")]
pub async fn get_summary(service: web::Data<Arc<TelemetryService>>) -> Result<impl Responder> {
    match service.summary().await {
        Ok(Some(summary)) => Ok(HttpResponse::Ok().json(summary)),
        Ok(None) => Ok(HttpResponse::Ok().json(json!({
            "error": "No data available in the last hour",
            "period": "last 1 hour"
        }))),
        Err(e) => {
            error!("Error computing telemetry summary: {}", e);
            Err(actix_web::error::ErrorInternalServerError(
                "Failed to compute telemetry summary",
            ))
        }
    }
}
