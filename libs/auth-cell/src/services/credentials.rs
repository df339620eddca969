use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{AppState, DirectoryStore, StoreError};
use shared_models::auth::{Principal, Role};
use shared_models::hospital::{Hospital, DEFAULT_COUNTRY};
use shared_models::user::User;
use shared_utils::jwt::issue_token;
use shared_utils::validation::{non_empty, normalize_email};

use crate::models::{AuthError, HospitalSignupRequest, LoginRequest, SignupRequest};
use crate::services::password::PasswordService;

/// Registration, login and token issuance for users, admins and hospitals.
pub struct CredentialService {
    directory: Arc<dyn DirectoryStore>,
    config: Arc<AppConfig>,
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl CredentialService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            config: state.config.clone(),
        }
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        Ok(issue_token(principal, &self.config.jwt_secret, self.config.token_validity())?)
    }

    fn hash(password: &str) -> Result<String, AuthError> {
        PasswordService::hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn password_matches(password: &str, hash: &str) -> bool {
        PasswordService::verify_password(password, hash).unwrap_or_else(|e| {
            warn!("Stored password hash could not be parsed: {}", e);
            false
        })
    }

    /// Creates a user with `role` and returns it with a fresh token.
    pub async fn register_user(
        &self,
        request: SignupRequest,
        role: Role,
    ) -> Result<(String, User), AuthError> {
        request.validate().map_err(AuthError::Validation)?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        debug!("Registering {} account for {}", role, email);

        if self.directory.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail("User already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: text(request.name),
            email,
            password_hash: Self::hash(request.password.as_deref().unwrap_or_default())?,
            role,
            created_at: Utc::now(),
        };

        let user = self.directory.insert_user(user).await.map_err(|e| match e {
            StoreError::DuplicateKey(_) => AuthError::DuplicateEmail("User already exists".to_string()),
            other => AuthError::Store(other),
        })?;

        info!("Registered {} {}", user.role, user.id);
        let token = self.issue(&Principal::user(user.id, user.role).with_email(&user.email))?;
        Ok((token, user))
    }

    /// Logs a user in. With `admin_only`, non-admin accounts are refused.
    pub async fn authenticate_user(
        &self,
        request: LoginRequest,
        admin_only: bool,
    ) -> Result<(String, User), AuthError> {
        request.validate().map_err(AuthError::Validation)?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());

        let user = match self.directory.find_user_by_email(&email).await? {
            Some(user) if !admin_only || user.role == Role::Admin => user,
            Some(_) | None => {
                warn!("Login refused for {}", email);
                let message = if admin_only {
                    "Invalid credentials or not an admin"
                } else {
                    "Invalid credentials"
                };
                return Err(AuthError::InvalidCredentials(message.to_string()));
            }
        };

        if !Self::password_matches(request.password.as_deref().unwrap_or_default(), &user.password_hash) {
            warn!("Wrong password for {}", email);
            return Err(AuthError::InvalidCredentials("Invalid credentials".to_string()));
        }

        let token = self.issue(&Principal::user(user.id, user.role).with_email(&user.email))?;
        Ok((token, user))
    }

    /// Validates and stores a hospital record without issuing a token.
    pub async fn create_hospital(&self, request: HospitalSignupRequest) -> Result<Hospital, AuthError> {
        request.validate().map_err(AuthError::Validation)?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        debug!("Creating hospital account for {}", email);

        if self.directory.find_hospital_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail("Hospital already exists".to_string()));
        }

        let hospital = Hospital {
            id: Uuid::new_v4(),
            name: text(request.name),
            email,
            password_hash: Self::hash(request.password.as_deref().unwrap_or_default())?,
            country: non_empty(request.country.as_deref())
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string(),
            state: text(request.state),
            district: text(request.district),
            landmark: non_empty(request.landmark.as_deref()).map(String::from),
            // validate() bounds the year to 1800..=current
            establish_year: request.establish_year.unwrap_or_default() as i32,
            opd_charge: request.opd_charge.unwrap_or_default(),
            location: request.location,
            surgeries: Vec::new(),
            non_surgery_services: Vec::new(),
            created_at: Utc::now(),
        };

        let hospital = self.directory.insert_hospital(hospital).await.map_err(|e| match e {
            StoreError::DuplicateKey(_) => AuthError::DuplicateEmail("Hospital already exists".to_string()),
            other => AuthError::Store(other),
        })?;

        info!("Created hospital {} ({})", hospital.id, hospital.name);
        Ok(hospital)
    }

    pub async fn register_hospital(
        &self,
        request: HospitalSignupRequest,
    ) -> Result<(String, Hospital), AuthError> {
        let hospital = self.create_hospital(request).await?;
        let token = self.issue(&Principal::hospital(hospital.id).with_email(&hospital.email))?;
        Ok((token, hospital))
    }

    pub async fn authenticate_hospital(
        &self,
        request: LoginRequest,
    ) -> Result<(String, Hospital), AuthError> {
        request.validate().map_err(AuthError::Validation)?;
        let email = normalize_email(request.email.as_deref().unwrap_or_default());

        let hospital = self
            .directory
            .find_hospital_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid credentials".to_string()))?;

        if !Self::password_matches(request.password.as_deref().unwrap_or_default(), &hospital.password_hash) {
            warn!("Wrong password for hospital {}", email);
            return Err(AuthError::InvalidCredentials("Invalid credentials".to_string()));
        }

        let token = self.issue(&Principal::hospital(hospital.id).with_email(&hospital.email))?;
        Ok((token, hospital))
    }
}
