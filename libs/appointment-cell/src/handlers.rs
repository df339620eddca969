use axum::extract::{Extension, Json, Path, Query, State};
use axum_extra::extract::WithRejection;
use tracing::debug;
use uuid::Uuid;

use shared_database::AppState;
use shared_models::appointment::AppointmentView;
use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::models::{
    ApprovalRequest, CommentsRequest, CompletionRequest, PatientListQuery, PatientResponse,
    SurgeryStatusQuery,
};
use crate::services::AppointmentLifecycleService;

fn updated(message: &str, patient: AppointmentView) -> Json<PatientResponse> {
    Json(PatientResponse {
        message: message.to_string(),
        patient,
    })
}

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Query(query), _): WithRejection<Query<PatientListQuery>, AppError>,
) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let surgery_done = query.surgery_done();
    let patients = AppointmentLifecycleService::new(&state)
        .list(&principal, surgery_done, query.search)
        .await?;
    Ok(Json(patients))
}

pub async fn list_by_surgery_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Query(query), _): WithRejection<Query<SurgeryStatusQuery>, AppError>,
) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let done = query.done()?;
    debug!("Filtering patients by surgeryDone={}", done);
    let patients = AppointmentLifecycleService::new(&state)
        .list(&principal, Some(done), None)
        .await?;
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<AppointmentView>, AppError> {
    let patient = AppointmentLifecycleService::new(&state)
        .get(&principal, patient_id)
        .await?;
    Ok(Json(patient))
}

pub async fn update_comments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<CommentsRequest>, AppError>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = AppointmentLifecycleService::new(&state)
        .set_comments(&principal, patient_id, request.comments)
        .await?;
    Ok(updated("Comments updated successfully", patient))
}

pub async fn update_approval(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<ApprovalRequest>, AppError>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = AppointmentLifecycleService::new(&state)
        .set_approval(&principal, patient_id, request.approved_for_surgery.as_deref())
        .await?;
    Ok(updated("Approval status updated successfully", patient))
}

pub async fn update_surgery_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<CompletionRequest>, AppError>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = AppointmentLifecycleService::new(&state)
        .set_completion(&principal, patient_id, request.surgery_done, request.surgery_done_by)
        .await?;
    Ok(updated("Surgery status updated successfully", patient))
}
