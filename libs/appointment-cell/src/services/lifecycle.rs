use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::joins::{with_booker, with_bookers};
use shared_database::{AppState, AppointmentStore, DirectoryStore};
use shared_models::appointment::{AppointmentFilter, AppointmentUpdate, AppointmentView, ApprovalStatus};
use shared_models::auth::Principal;

use crate::models::LifecycleError;

/// Hospital-side view of its own appointments: listing, approval, completion
/// and comments. Every operation is scoped to the caller's hospital id.
pub struct AppointmentLifecycleService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    fn owner(principal: &Principal) -> Result<Uuid, LifecycleError> {
        principal.hospital_id().ok_or(LifecycleError::NotHospital)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        surgery_done: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<AppointmentView>, LifecycleError> {
        let hospital_id = Self::owner(principal)?;
        debug!("Listing appointments for hospital {}", hospital_id);

        let filter = AppointmentFilter {
            hospital_id: Some(hospital_id),
            surgery_done,
            search: search.filter(|s| !s.trim().is_empty()),
            ..Default::default()
        };
        let found = self.appointments.find_appointments(&filter).await?;
        Ok(with_bookers(self.directory.as_ref(), found).await?)
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<AppointmentView, LifecycleError> {
        let hospital_id = Self::owner(principal)?;
        let appointment = self
            .appointments
            .get_appointment(id)
            .await?
            .filter(|a| a.hospital_id == hospital_id)
            .ok_or(LifecycleError::NotFound)?;
        Ok(with_booker(self.directory.as_ref(), appointment).await?)
    }

    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> Result<AppointmentView, LifecycleError> {
        let hospital_id = Self::owner(principal)?;
        let updated = self
            .appointments
            .update_appointment(id, hospital_id, &update)
            .await?
            .ok_or_else(|| {
                warn!("Hospital {} tried to update appointment {} outside its scope", hospital_id, id);
                LifecycleError::NotFound
            })?;

        info!("Appointment {} updated by hospital {}: {:?}", id, hospital_id, update);
        Ok(with_booker(self.directory.as_ref(), updated).await?)
    }

    pub async fn set_comments(
        &self,
        principal: &Principal,
        id: Uuid,
        comments: String,
    ) -> Result<AppointmentView, LifecycleError> {
        self.apply(principal, id, AppointmentUpdate::Comments(comments)).await
    }

    /// Unknown statuses are rejected before the store is touched.
    pub async fn set_approval(
        &self,
        principal: &Principal,
        id: Uuid,
        status: Option<&str>,
    ) -> Result<AppointmentView, LifecycleError> {
        let status: ApprovalStatus = status.unwrap_or_default().parse()?;
        self.apply(principal, id, AppointmentUpdate::Approval(status)).await
    }

    pub async fn set_completion(
        &self,
        principal: &Principal,
        id: Uuid,
        done: Option<bool>,
        done_by: Option<String>,
    ) -> Result<AppointmentView, LifecycleError> {
        let done = done.ok_or_else(|| LifecycleError::Validation("surgeryDone is required".to_string()))?;
        let done_by = done_by.map(|b| b.trim().to_string());
        self.apply(principal, id, AppointmentUpdate::Completion { done, done_by })
            .await
    }
}
