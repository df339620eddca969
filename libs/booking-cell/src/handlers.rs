use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::appointment::Appointment;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::hospital::PublicHospital;

use crate::models::{
    BookingRequest, BookingResponse, HealthIssueSearchQuery, ServiceSearchResult,
    SurgerySearchQuery, SurgerySearchResult,
};
use crate::services::{BookingService, SearchService};

pub async fn search_hospitals(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SurgerySearchQuery>, AppError>,
) -> Result<Json<Vec<SurgerySearchResult>>, AppError> {
    Ok(Json(SearchService::new(&state).search_by_surgery(&query).await?))
}

pub async fn search_non_surgery(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<HealthIssueSearchQuery>, AppError>,
) -> Result<Json<Vec<ServiceSearchResult>>, AppError> {
    let results = SearchService::new(&state)
        .search_by_health_issue(query.health_issue.as_deref())
        .await?;
    Ok(Json(results))
}

pub async fn get_hospital(
    State(state): State<AppState>,
    WithRejection(Path(hospital_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<PublicHospital>, AppError> {
    Ok(Json(SearchService::new(&state).get_hospital(hospital_id).await?))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(request), _): WithRejection<Json<BookingRequest>, AppError>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let patient = BookingService::new(&state).book(&principal, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Appointment booked successfully".to_string(),
            patient,
        }),
    ))
}

pub async fn my_appointments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(BookingService::new(&state).my_appointments(&principal).await?))
}
