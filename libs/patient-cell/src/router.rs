use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

/// Appointment lookup for any authenticated principal. The bearer token is
/// read by the handler itself.
pub fn patient_routes(state: AppState) -> Router {
    Router::new()
        .route("/{patient_id}", get(handlers::get_patient))
        .with_state(state)
}
