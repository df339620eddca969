use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use tracing::debug;

use shared_database::AppState;
use shared_models::error::AppError;
use shared_models::user::{Role, UserProfile};

use crate::models::{
    HospitalAuthResponse, HospitalSignupRequest, LoginRequest, SignupRequest, UserAuthResponse,
};
use crate::services::CredentialService;

pub async fn user_signup(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<(StatusCode, Json<UserAuthResponse>), AppError> {
    debug!("User signup");
    let (token, user) = CredentialService::new(&state)
        .register_user(request, Role::User)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserAuthResponse {
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

pub async fn user_login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<UserAuthResponse>, AppError> {
    let (token, user) = CredentialService::new(&state)
        .authenticate_user(request, false)
        .await?;

    Ok(Json(UserAuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

pub async fn admin_signup(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<(StatusCode, Json<UserAuthResponse>), AppError> {
    debug!("Admin signup");
    let (token, user) = CredentialService::new(&state)
        .register_user(request, Role::Admin)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserAuthResponse {
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

pub async fn admin_login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<UserAuthResponse>, AppError> {
    let (token, user) = CredentialService::new(&state)
        .authenticate_user(request, true)
        .await?;

    Ok(Json(UserAuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

pub async fn hospital_signup(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<HospitalSignupRequest>, AppError>,
) -> Result<(StatusCode, Json<HospitalAuthResponse>), AppError> {
    debug!("Hospital signup");
    let (token, hospital) = CredentialService::new(&state)
        .register_hospital(request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(HospitalAuthResponse {
            token,
            hospital: (&hospital).into(),
        }),
    ))
}

pub async fn hospital_login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<HospitalAuthResponse>, AppError> {
    let (token, hospital) = CredentialService::new(&state)
        .authenticate_hospital(request)
        .await?;

    Ok(Json(HospitalAuthResponse {
        token,
        hospital: (&hospital).into(),
    }))
}
