use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use shared_config::AppConfig;
use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Resolves the bearer token into a [`Principal`] request extension.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let principal = validate_token(token, &config.jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

pub fn extract_principal<B>(request: &Request<B>) -> Result<Principal, AppError> {
    request
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Principal not found in request extensions".to_string()))
}

async fn guard(
    request: Request<Body>,
    next: Next,
    allowed: fn(&Principal) -> bool,
    denial: &str,
) -> Result<Response, AppError> {
    let principal = extract_principal(&request)?;
    if !allowed(&principal) {
        warn!("{} {} denied: {}", principal.kind, principal.id, denial);
        return Err(AppError::Forbidden(denial.to_string()));
    }
    Ok(next.run(request).await)
}

/// End-user routes. Admins are user-kind principals and pass as well.
pub async fn require_user(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    guard(request, next, Principal::is_user, "User access required").await
}

pub async fn require_hospital(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    guard(request, next, Principal::is_hospital, "Hospital access required").await
}

pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    guard(request, next, Principal::is_admin, "Admin access required").await
}
