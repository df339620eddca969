//! Fixtures shared by the cell test suites.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_database::AppState;
use shared_models::appointment::{Appointment, AppointmentKind, ApprovalStatus};
use shared_models::auth::{Principal, Role};
use shared_models::hospital::{Doctor, Hospital, Surgery, DEFAULT_COUNTRY};
use shared_models::user::User;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_validity_days: 7,
            port: 0,
            store_backend: StoreBackend::Memory,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            cors_allowed_origins: Vec::new(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Fresh in-memory state per test.
    pub fn to_state(&self) -> AppState {
        AppState::in_memory(self.to_arc())
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn token_for(principal: &Principal, secret: &str) -> String {
        issue_token(principal, secret, Duration::days(7)).expect("test secret is set")
    }

    pub fn create_expired_token(principal: &Principal, secret: &str) -> String {
        issue_token(principal, secret, Duration::hours(-1)).expect("test secret is set")
    }

    pub fn create_invalid_signature_token(principal: &Principal) -> String {
        Self::token_for(principal, "wrong-secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    /// Correctly signed token whose subject is not a uuid.
    pub fn create_foreign_subject_token(secret: &str) -> String {
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let payload = json!({
            "sub": "not-a-uuid",
            "type": "user",
            "role": "admin",
            "exp": (Utc::now() + Duration::hours(1)).timestamp()
        });
        let signing_input = format!(
            "{}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(header.to_string()),
            general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{}.{}", signing_input, signature)
    }
}

/// Records written straight into the store, bypassing the HTTP surface.
pub struct Fixtures;

impl Fixtures {
    pub async fn user(state: &AppState, email: &str, role: Role) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: format!("User {}", email),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            created_at: Utc::now(),
        };
        state.directory.insert_user(user).await.expect("seed user")
    }

    pub async fn hospital(state: &AppState, email: &str) -> Hospital {
        let hospital = Hospital {
            id: Uuid::new_v4(),
            name: format!("Hospital {}", email),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            state: "Kerala".to_string(),
            district: "Ernakulam".to_string(),
            landmark: None,
            establish_year: 1990,
            opd_charge: vec![300.0],
            location: None,
            surgeries: vec![Surgery {
                id: Uuid::new_v4(),
                surgery_type: "Knee Replacement".to_string(),
                price: 150000.0,
                availability: true,
                doctor: Doctor {
                    name: "Dr. Menon".to_string(),
                    degree: "MS Ortho".to_string(),
                },
            }],
            non_surgery_services: Vec::new(),
            created_at: Utc::now(),
        };
        state.directory.insert_hospital(hospital).await.expect("seed hospital")
    }

    pub async fn appointment(state: &AppState, hospital: &Hospital, booker: Option<&User>) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            name: "Ravi Kumar".to_string(),
            age: 54,
            kind: AppointmentKind::Surgery {
                surgery_type: "Knee Replacement".to_string(),
            },
            description: String::new(),
            date: Utc::now(),
            weight: None,
            height: None,
            address: "MG Road".to_string(),
            mobile_no: "9876543210".to_string(),
            email_address: None,
            booked_by_user: booker.map(|u| u.id),
            hospital_id: hospital.id,
            hospital_name: hospital.name.clone(),
            hospital_location: hospital.location_label(),
            approved_for_surgery: ApprovalStatus::Pending,
            surgery_done: false,
            surgery_done_by: String::new(),
            consultation_done: false,
            comments: String::new(),
            created_at: Utc::now(),
        };
        state
            .appointments
            .insert_appointment(appointment)
            .await
            .expect("seed appointment")
    }
}

/// Sends one JSON request through `app` and decodes the JSON reply
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_raw(app, method, uri, token, body.map(|b| b.to_string())).await
}

/// Like [`send_json`], but sends `body` verbatim as `application/json`.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
