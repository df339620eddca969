use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_hospital};

use crate::handlers;

/// Patient routes of the authenticated hospital, merged under `/hospitals`.
pub fn appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/patients", get(handlers::list_patients))
        .route(
            "/patients/filter/surgery-status",
            get(handlers::list_by_surgery_status),
        )
        .route("/patients/{patient_id}", get(handlers::get_patient))
        .route("/patients/{patient_id}/comments", patch(handlers::update_comments))
        .route("/patients/{patient_id}/approval", patch(handlers::update_approval))
        .route(
            "/patients/{patient_id}/surgery-status",
            patch(handlers::update_surgery_status),
        )
        .route_layer(middleware::from_fn(require_hospital))
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
