use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use shared_database::joins::{with_booker, with_bookers};
use shared_database::{AppState, AppointmentStore, DirectoryStore};
use shared_models::appointment::{AppointmentFilter, AppointmentView};
use shared_models::user::PublicUser;

use crate::models::AdminError;

/// Cross-hospital appointment and user reads.
pub struct PatientAdminService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl PatientAdminService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    pub async fn list_patients(&self, filter: &AppointmentFilter) -> Result<Vec<AppointmentView>, AdminError> {
        debug!("Admin patient listing with {:?}", filter);
        let found = self.appointments.find_appointments(filter).await?;
        Ok(with_bookers(self.directory.as_ref(), found).await?)
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<AppointmentView, AdminError> {
        let appointment = self
            .appointments
            .get_appointment(id)
            .await?
            .ok_or(AdminError::PatientNotFound)?;
        Ok(with_booker(self.directory.as_ref(), appointment).await?)
    }

    /// All users, or with `booked` only those who booked at least one
    /// matching appointment (each user once).
    pub async fn list_users(&self, booked: Option<&AppointmentFilter>) -> Result<Vec<PublicUser>, AdminError> {
        let users = match booked {
            None => self.directory.list_users().await?,
            Some(filter) => {
                let mut ids: Vec<Uuid> = self
                    .appointments
                    .find_appointments(filter)
                    .await?
                    .iter()
                    .filter_map(|a| a.booked_by_user)
                    .collect();
                ids.sort();
                ids.dedup();
                self.directory.find_users_by_ids(&ids).await?
            }
        };
        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::user::Role;
    use shared_utils::test_utils::{Fixtures, TestConfig};

    #[tokio::test]
    async fn user_join_is_deduplicated() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let other = Fixtures::hospital(&state, "o@x.com").await;
        let frequent = Fixtures::user(&state, "frequent@x.com", Role::User).await;
        let elsewhere = Fixtures::user(&state, "elsewhere@x.com", Role::User).await;
        Fixtures::user(&state, "idle@x.com", Role::User).await;
        Fixtures::appointment(&state, &hospital, Some(&frequent)).await;
        Fixtures::appointment(&state, &hospital, Some(&frequent)).await;
        Fixtures::appointment(&state, &other, Some(&elsewhere)).await;
        let service = PatientAdminService::new(&state);

        let all = service.list_users(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let filter = AppointmentFilter::for_hospital(hospital.id);
        let booked = service.list_users(Some(&filter)).await.unwrap();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].email, "frequent@x.com");
    }

    #[tokio::test]
    async fn listing_joins_bookers() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let user = Fixtures::user(&state, "u@x.com", Role::User).await;
        Fixtures::appointment(&state, &hospital, Some(&user)).await;

        let views = PatientAdminService::new(&state)
            .list_patients(&AppointmentFilter::default())
            .await
            .unwrap();
        assert_eq!(views[0].booker.as_ref().map(|b| b.id), Some(user.id));
    }
}
