use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use admin_cell::router::admin_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use hospital_cell::router::hospital_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use shared_database::AppState;
use shared_models::error::AppError;

async fn health() -> Json<Value> {
    Json(json!({ "message": "Hospital booking API is running" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .nest(
            "/hospitals",
            hospital_routes(state.clone()).merge(appointment_routes(state.clone())),
        )
        .nest("/users", booking_routes(state.clone()))
        .nest("/patients", patient_routes(state));

    Router::new()
        .route("/", get(health))
        .nest("/api", api)
        .fallback(not_found)
}

/// Any origin when none are configured.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = if config.cors_allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring unparsable CORS origin {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
