use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use auth_cell::models::HospitalSignupRequest;
use auth_cell::CredentialService;
use shared_database::{AppState, AppointmentStore, DirectoryStore, StoreError};
use shared_models::appointment::{AppointmentFilter, ApprovalStatus};
use shared_models::hospital::{HospitalFilter, PublicHospital};

use crate::models::{AdminError, HospitalDetail, HospitalStats, HospitalUpdateRequest};

pub struct HospitalAdminService {
    credentials: CredentialService,
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl HospitalAdminService {
    pub fn new(state: &AppState) -> Self {
        Self {
            credentials: CredentialService::new(state),
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<PublicHospital>, AdminError> {
        let hospitals = self.directory.list_hospitals(&HospitalFilter::default()).await?;
        Ok(hospitals.into_iter().map(PublicHospital::from).collect())
    }

    /// Hospital with patient counts computed at read time.
    pub async fn get(&self, id: Uuid) -> Result<HospitalDetail, AdminError> {
        let hospital = self
            .directory
            .get_hospital(id)
            .await?
            .ok_or(AdminError::HospitalNotFound)?;

        let scope = AppointmentFilter::for_hospital(id);
        let stats = HospitalStats {
            total_patients: self.appointments.count_appointments(&scope).await?,
            surgeries_done: self
                .appointments
                .count_appointments(&scope.clone().surgery_done(true))
                .await?,
            approved: self
                .appointments
                .count_appointments(&scope.approval(ApprovalStatus::Approved))
                .await?,
        };

        Ok(HospitalDetail {
            hospital: hospital.into(),
            stats,
        })
    }

    pub async fn create(&self, request: HospitalSignupRequest) -> Result<PublicHospital, AdminError> {
        let hospital = self.credentials.create_hospital(request).await?;
        Ok(hospital.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: HospitalUpdateRequest,
    ) -> Result<PublicHospital, AdminError> {
        request.validate().map_err(AdminError::Validation)?;
        let mut hospital = self
            .directory
            .get_hospital(id)
            .await?
            .ok_or(AdminError::HospitalNotFound)?;

        if let Some(email) = request.email() {
            let taken = self.directory.find_hospital_by_email(&email).await?;
            if taken.is_some_and(|other| other.id != id) {
                warn!("Hospital {} update refused, email {} in use", id, email);
                return Err(AdminError::DuplicateEmail);
            }
        }

        request.apply(&mut hospital);
        let updated = self
            .directory
            .replace_hospital(hospital)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey(_) => AdminError::DuplicateEmail,
                other => AdminError::Store(other),
            })?
            .ok_or(AdminError::HospitalNotFound)?;

        info!("Hospital {} updated", id);
        Ok(updated.into())
    }

    /// Deletes the hospital, then its appointments. The two steps are
    /// separate store calls; a failure in the second leaves orphans.
    pub async fn delete(&self, id: Uuid) -> Result<u64, AdminError> {
        if !self.directory.delete_hospital(id).await? {
            return Err(AdminError::HospitalNotFound);
        }
        debug!("Hospital {} removed, deleting its appointments", id);

        let removed = self
            .appointments
            .delete_appointments(&AppointmentFilter::for_hospital(id))
            .await?;
        info!("Hospital {} deleted with {} appointments", id, removed);
        Ok(removed)
    }
}
