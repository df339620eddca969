use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_hospital};

use crate::handlers;

/// Profile and catalog routes for the authenticated hospital.
pub fn hospital_routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(handlers::get_profile))
        .route("/surgeries", post(handlers::add_surgery))
        .route(
            "/surgeries/{surgery_id}",
            put(handlers::update_surgery).delete(handlers::delete_surgery),
        )
        .route("/health-issues", post(handlers::add_health_issue))
        .route(
            "/health-issues/{service_id}",
            put(handlers::update_health_issue).delete(handlers::delete_health_issue),
        )
        .route_layer(middleware::from_fn(require_hospital))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
