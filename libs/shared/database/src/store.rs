use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use shared_models::hospital::{Hospital, HospitalFilter};
use shared_models::user::{Role, User};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Hospital and user records.
///
/// Listing methods return newest records first. Emails are compared exactly,
/// callers normalise them before they reach the store.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateKey`] when the email is taken.
    async fn insert_hospital(&self, hospital: Hospital) -> StoreResult<Hospital>;
    async fn get_hospital(&self, id: Uuid) -> StoreResult<Option<Hospital>>;
    async fn find_hospital_by_email(&self, email: &str) -> StoreResult<Option<Hospital>>;
    async fn list_hospitals(&self, filter: &HospitalFilter) -> StoreResult<Vec<Hospital>>;
    /// Replaces the whole record. `None` when no hospital has that id.
    async fn replace_hospital(&self, hospital: Hospital) -> StoreResult<Option<Hospital>>;
    /// `false` when nothing was deleted.
    async fn delete_hospital(&self, id: Uuid) -> StoreResult<bool>;
    async fn count_hospitals(&self) -> StoreResult<u64>;

    /// Fails with [`StoreError::DuplicateKey`] when the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn count_users(&self, role: Option<Role>) -> StoreResult<u64>;
}

/// Appointment (patient) records.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, appointment: Appointment) -> StoreResult<Appointment>;
    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>>;
    /// Newest first by creation time.
    async fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>>;
    /// Applies `update` to the appointment with `id` owned by `hospital_id`.
    /// `None` when no such pair exists.
    async fn update_appointment(
        &self,
        id: Uuid,
        hospital_id: Uuid,
        update: &AppointmentUpdate,
    ) -> StoreResult<Option<Appointment>>;
    /// Returns the number of removed records.
    async fn delete_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64>;
    async fn count_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64>;
}
