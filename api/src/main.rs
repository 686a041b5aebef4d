mod config;
mod models;
mod routes;
mod services;

use crate::config::Config;
use crate::services::telemetry_service::TelemetryService;
use actix_cors::Cors;
use actix_web::{App, HttpServer, Responder, Result, get, web};
use serde_json::json;
use std::sync::Arc;
use storage::{TelemetryRepository, create_pool};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Success")
    ),
    tag = "Telemetry"
)]
#[get("/")]
async fn root() -> Result<impl Responder> {
    Ok(web::Json(json!({
        "message": "Hybrid Solar-Wind Station API",
        "version": "1.0.0",
        "endpoints": {
            "/live": "Get latest telemetry sample",
            "/history": "Get historical telemetry data",
            "/summary": "Get aggregated statistics"
        }
    })))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        routes::telemetry::get_live,
        routes::telemetry::get_history,
        routes::telemetry::get_summary
    ),
    components(schemas(
        models::responses::TelemetryResponse,
        models::responses::SummaryResponse,
        models::responses::SourceSummary,
        models::responses::BatterySummary,
        models::responses::StatRange
    )),
    tags(
        (name = "Telemetry", description = "Read-only station telemetry endpoints")
    ),
    info(
        title = "Hybrid Solar-Wind Station API",
        version = "1.0.0",
        description = "REST API over the station's telemetry store"
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });
    let server_address = config.server_address();

    let pool = match create_pool(&config.database.path).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Failed to open database {}: {}", config.database.path, err);
            std::process::exit(1);
        }
    };
    let service = Arc::new(TelemetryService::new(TelemetryRepository::new(pool)));

    println!("Starting hybrid station API server...");
    println!("API endpoints:");
    println!("  - GET /live");
    println!("  - GET /history");
    println!("  - GET /summary");
    println!("  - GET /swagger-ui/ - Swagger UI documentation");
    println!("Server address: {}", server_address);

    HttpServer::new(move || {
        App::new()
            // The dashboard polls from the browser; it has no credentials.
            .wrap(Cors::permissive())
            .app_data(web::Data::new(service.clone()))
            .service(root)
            .service(routes::telemetry::get_live)
            .service(routes::telemetry::get_history)
            .service(routes::telemetry::get_summary)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(server_address)?
    .run()
    .await
}
