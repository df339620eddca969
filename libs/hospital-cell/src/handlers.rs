use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::hospital::{NonSurgeryService, PublicHospital, Surgery};

use crate::models::{HealthIssueRequest, ServicesResponse, SurgeriesResponse, SurgeryRequest};
use crate::services::{CatalogService, ProfileService};

fn surgeries(message: &str, surgeries: Vec<Surgery>) -> Json<SurgeriesResponse> {
    Json(SurgeriesResponse {
        message: message.to_string(),
        surgeries,
    })
}

fn services(
    message: &str,
    non_surgery_services: Vec<NonSurgeryService>,
) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        message: message.to_string(),
        non_surgery_services,
    })
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<PublicHospital>, AppError> {
    Ok(Json(ProfileService::new(&state).get_profile(&principal).await?))
}

pub async fn add_surgery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(request), _): WithRejection<Json<SurgeryRequest>, AppError>,
) -> Result<(StatusCode, Json<SurgeriesResponse>), AppError> {
    let list = CatalogService::new(&state).add_surgery(&principal, request).await?;
    Ok((StatusCode::CREATED, surgeries("Surgery added successfully", list)))
}

pub async fn update_surgery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(surgery_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<SurgeryRequest>, AppError>,
) -> Result<Json<SurgeriesResponse>, AppError> {
    let list = CatalogService::new(&state)
        .update_surgery(&principal, surgery_id, request)
        .await?;
    Ok(surgeries("Surgery updated successfully", list))
}

pub async fn delete_surgery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(surgery_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<SurgeriesResponse>, AppError> {
    let list = CatalogService::new(&state)
        .delete_surgery(&principal, surgery_id)
        .await?;
    Ok(surgeries("Surgery deleted successfully", list))
}

pub async fn add_health_issue(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(request), _): WithRejection<Json<HealthIssueRequest>, AppError>,
) -> Result<(StatusCode, Json<ServicesResponse>), AppError> {
    let list = CatalogService::new(&state)
        .add_health_issue(&principal, request)
        .await?;
    Ok((StatusCode::CREATED, services("Health issue added successfully", list)))
}

pub async fn update_health_issue(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(service_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<HealthIssueRequest>, AppError>,
) -> Result<Json<ServicesResponse>, AppError> {
    let list = CatalogService::new(&state)
        .update_health_issue(&principal, service_id, request)
        .await?;
    Ok(services("Health issue updated successfully", list))
}

pub async fn delete_health_issue(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(service_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<ServicesResponse>, AppError> {
    let list = CatalogService::new(&state)
        .delete_health_issue(&principal, service_id)
        .await?;
    Ok(services("Health issue deleted successfully", list))
}
