use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentUpdate};
use shared_models::hospital::{Hospital, HospitalFilter};
use shared_models::user::{Role, User};

use crate::store::{AppointmentStore, DirectoryStore, StoreError, StoreResult};

/// In-process store. Each call takes one lock, so a call is atomic on its
/// own but nothing is atomic across calls.
#[derive(Default)]
pub struct MemoryStore {
    hospitals: RwLock<Vec<Hospital>>,
    users: RwLock<Vec<User>>,
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Insertion order reversed, then a stable sort, keeps ties newest first.
fn newest_first<T>(
    items: impl DoubleEndedIterator<Item = T>,
    created: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by(|a, b| created(b).cmp(&created(a)));
    out
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn insert_hospital(&self, hospital: Hospital) -> StoreResult<Hospital> {
        let mut hospitals = self.hospitals.write().await;
        if hospitals.iter().any(|h| h.email == hospital.email) {
            return Err(StoreError::DuplicateKey(hospital.email));
        }
        debug!("Inserting hospital {}", hospital.id);
        hospitals.push(hospital.clone());
        Ok(hospital)
    }

    async fn get_hospital(&self, id: Uuid) -> StoreResult<Option<Hospital>> {
        Ok(self.hospitals.read().await.iter().find(|h| h.id == id).cloned())
    }

    async fn find_hospital_by_email(&self, email: &str) -> StoreResult<Option<Hospital>> {
        Ok(self
            .hospitals
            .read()
            .await
            .iter()
            .find(|h| h.email == email)
            .cloned())
    }

    async fn list_hospitals(&self, filter: &HospitalFilter) -> StoreResult<Vec<Hospital>> {
        let hospitals = self.hospitals.read().await;
        Ok(newest_first(
            hospitals.iter().filter(|h| filter.matches(h)).cloned(),
            |h| h.created_at,
        ))
    }

    async fn replace_hospital(&self, hospital: Hospital) -> StoreResult<Option<Hospital>> {
        let mut hospitals = self.hospitals.write().await;
        if hospitals
            .iter()
            .any(|h| h.id != hospital.id && h.email == hospital.email)
        {
            return Err(StoreError::DuplicateKey(hospital.email));
        }
        match hospitals.iter_mut().find(|h| h.id == hospital.id) {
            Some(slot) => {
                *slot = hospital.clone();
                Ok(Some(hospital))
            }
            None => Ok(None),
        }
    }

    async fn delete_hospital(&self, id: Uuid) -> StoreResult<bool> {
        let mut hospitals = self.hospitals.write().await;
        let before = hospitals.len();
        hospitals.retain(|h| h.id != id);
        Ok(hospitals.len() != before)
    }

    async fn count_hospitals(&self) -> StoreResult<u64> {
        Ok(self.hospitals.read().await.len() as u64)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey(user.email));
        }
        debug!("Inserting user {}", user.id);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(newest_first(
            users.iter().filter(|u| ids.contains(&u.id)).cloned(),
            |u| u.created_at,
        ))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(newest_first(users.iter().cloned(), |u| u.created_at))
    }

    async fn count_users(&self, role: Option<Role>) -> StoreResult<u64> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .count() as u64)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert_appointment(&self, appointment: Appointment) -> StoreResult<Appointment> {
        debug!("Inserting appointment {}", appointment.id);
        self.appointments.write().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        Ok(self
            .appointments
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(newest_first(
            appointments.iter().filter(|a| filter.matches(a)).cloned(),
            |a| a.created_at,
        ))
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        hospital_id: Uuid,
        update: &AppointmentUpdate,
    ) -> StoreResult<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments
            .iter_mut()
            .find(|a| a.id == id && a.hospital_id == hospital_id)
            .map(|a| {
                update.apply(a);
                a.clone()
            }))
    }

    async fn delete_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64> {
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| !filter.matches(a));
        Ok((before - appointments.len()) as u64)
    }

    async fn count_appointments(&self, filter: &AppointmentFilter) -> StoreResult<u64> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().filter(|a| filter.matches(a)).count() as u64)
    }
}
