use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use shared_database::joins::with_booker;
use shared_database::{AppState, AppointmentStore, DirectoryStore};
use shared_models::appointment::AppointmentView;
use shared_models::auth::Principal;

use crate::models::PatientError;

pub struct PatientService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    /// Any authenticated principal may read any appointment by id.
    pub async fn get_patient(
        &self,
        principal: &Principal,
        patient_id: Uuid,
    ) -> Result<AppointmentView, PatientError> {
        debug!("{} {} reads appointment {}", principal.kind, principal.id, patient_id);
        let appointment = self
            .appointments
            .get_appointment(patient_id)
            .await?
            .ok_or(PatientError::NotFound)?;
        Ok(with_booker(self.directory.as_ref(), appointment).await?)
    }
}
