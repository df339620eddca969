use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use tracing::debug;
use uuid::Uuid;

use auth_cell::models::HospitalSignupRequest;
use shared_database::AppState;
use shared_models::appointment::AppointmentView;
use shared_models::error::AppError;
use shared_models::hospital::PublicHospital;
use shared_models::user::PublicUser;

use crate::models::{
    DashboardStats, HospitalDetail, HospitalMessage, HospitalUpdateRequest, MessageResponse,
    PatientQuery, UserQuery,
};
use crate::services::{DashboardService, HospitalAdminService, PatientAdminService};

// ==============================================================================
// HOSPITALS
// ==============================================================================

pub async fn list_hospitals(State(state): State<AppState>) -> Result<Json<Vec<PublicHospital>>, AppError> {
    Ok(Json(HospitalAdminService::new(&state).list().await?))
}

pub async fn get_hospital(
    State(state): State<AppState>,
    WithRejection(Path(hospital_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<HospitalDetail>, AppError> {
    Ok(Json(HospitalAdminService::new(&state).get(hospital_id).await?))
}

pub async fn create_hospital(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<HospitalSignupRequest>, AppError>,
) -> Result<(StatusCode, Json<HospitalMessage>), AppError> {
    let hospital = HospitalAdminService::new(&state).create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(HospitalMessage {
            message: "Hospital created successfully".to_string(),
            hospital,
        }),
    ))
}

pub async fn update_hospital(
    State(state): State<AppState>,
    WithRejection(Path(hospital_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<HospitalUpdateRequest>, AppError>,
) -> Result<Json<HospitalMessage>, AppError> {
    let hospital = HospitalAdminService::new(&state)
        .update(hospital_id, request)
        .await?;
    Ok(Json(HospitalMessage {
        message: "Hospital updated successfully".to_string(),
        hospital,
    }))
}

pub async fn delete_hospital(
    State(state): State<AppState>,
    WithRejection(Path(hospital_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    HospitalAdminService::new(&state).delete(hospital_id).await?;
    Ok(Json(MessageResponse {
        message: "Hospital deleted successfully".to_string(),
    }))
}

// ==============================================================================
// PATIENTS & USERS
// ==============================================================================

pub async fn list_patients(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PatientQuery>, AppError>,
) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let filter = query.to_filter()?;
    Ok(Json(PatientAdminService::new(&state).list_patients(&filter).await?))
}

pub async fn get_patient(
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<AppointmentView>, AppError> {
    Ok(Json(PatientAdminService::new(&state).get_patient(patient_id).await?))
}

pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, AppError>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let filter = query.to_filter()?;
    debug!("Listing users, narrowed: {}", filter.is_some());
    let users = PatientAdminService::new(&state)
        .list_users(filter.as_ref())
        .await?;
    Ok(Json(users))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(DashboardService::new(&state).stats().await?))
}
