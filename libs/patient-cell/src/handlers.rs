use axum::extract::{rejection::PathRejection, Json, Path, State};
use axum_extra::typed_header::{TypedHeader, TypedHeaderRejection};
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::appointment::AppointmentView;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::services::PatientService;

fn principal(
    state: &AppState,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<Principal, AppError> {
    let TypedHeader(auth) = auth.map_err(|rejection| {
        if rejection.is_missing() {
            AppError::Auth("Missing authorization header".to_string())
        } else {
            AppError::Auth("Invalid authorization header format".to_string())
        }
    })?;
    validate_token(auth.token(), &state.config.jwt_secret).map_err(|e| AppError::Auth(e.to_string()))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AppointmentView>, AppError> {
    let principal = principal(&state, auth)?;
    let Path(patient_id) = path?;
    let patient = PatientService::new(&state)
        .get_patient(&principal, patient_id)
        .await?;
    Ok(Json(patient))
}
