use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, AppointmentStore, DirectoryStore};
use shared_models::appointment::{Appointment, AppointmentFilter, ApprovalStatus};
use shared_models::auth::Principal;
use shared_utils::validation::{non_empty, parse_date, DayBound};

use crate::models::{BookingError, BookingRequest};

fn text(value: Option<&str>) -> String {
    non_empty(value).unwrap_or_default().to_string()
}

pub struct BookingService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    /// Books an appointment for the calling user. The hospital's name and
    /// location label are copied onto the record as they are right now.
    pub async fn book(
        &self,
        principal: &Principal,
        request: BookingRequest,
    ) -> Result<Appointment, BookingError> {
        if !principal.is_user() {
            return Err(BookingError::NotUser);
        }
        let kind = request.validate().map_err(BookingError::Validation)?;

        let date = match non_empty(request.date.as_deref()) {
            Some(raw) => parse_date(raw, DayBound::Start).ok_or(BookingError::InvalidDate)?,
            None => Utc::now(),
        };

        let hospital_id = request
            .hospital_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
            .ok_or(BookingError::HospitalNotFound)?;
        let hospital = self
            .directory
            .get_hospital(hospital_id)
            .await?
            .ok_or_else(|| {
                warn!("Booking against unknown hospital {}", hospital_id);
                BookingError::HospitalNotFound
            })?;
        debug!("User {} booking at hospital {}", principal.id, hospital.id);

        let appointment = Appointment {
            id: Uuid::new_v4(),
            name: text(request.name.as_deref()),
            age: request.age.unwrap_or_default(),
            kind,
            description: text(request.description.as_deref()),
            date,
            weight: request.weight,
            height: request.height,
            address: text(request.address.as_deref()),
            mobile_no: text(request.mobile_no.as_deref()),
            email_address: non_empty(request.email_address.as_deref()).map(str::to_string),
            booked_by_user: Some(principal.id),
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

        let appointment = self.appointments.insert_appointment(appointment).await?;
        info!("Appointment {} booked at hospital {}", appointment.id, hospital.id);
        Ok(appointment)
    }

    /// The caller's bookings, newest first.
    pub async fn my_appointments(&self, principal: &Principal) -> Result<Vec<Appointment>, BookingError> {
        if !principal.is_user() {
            return Err(BookingError::NotUser);
        }
        Ok(self
            .appointments
            .find_appointments(&AppointmentFilter::booked_by(principal.id))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::appointment::AppointmentKind;
    use shared_models::user::Role;
    use shared_utils::test_utils::{Fixtures, TestConfig};

    fn request(hospital_id: Uuid) -> BookingRequest {
        BookingRequest {
            name: Some("Ravi".into()),
            age: Some(54),
            appointment_type: Some("non-surgery".into()),
            health_issue: Some("Migraine".into()),
            address: Some("MG Road".into()),
            mobile_no: Some("9876543210".into()),
            hospital_id: Some(hospital_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn booking_snapshots_hospital_and_starts_pending() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let user = Fixtures::user(&state, "u@x.com", Role::User).await;
        let principal = Principal::user(user.id, user.role);

        let booked = BookingService::new(&state)
            .book(&principal, request(hospital.id))
            .await
            .unwrap();

        assert_eq!(booked.hospital_name, hospital.name);
        assert_eq!(booked.hospital_location, "Ernakulam, Kerala");
        assert_eq!(booked.booked_by_user, Some(user.id));
        assert_eq!(booked.approved_for_surgery, ApprovalStatus::Pending);
        assert!(!booked.surgery_done);
        assert_matches!(booked.kind, AppointmentKind::NonSurgery { ref health_issue } if health_issue == "Migraine");
    }

    #[tokio::test]
    async fn unknown_or_malformed_hospital_is_not_found() {
        let state = TestConfig::default().to_state();
        let principal = Principal::user(Uuid::new_v4(), Role::User);
        let service = BookingService::new(&state);

        assert_matches!(
            service.book(&principal, request(Uuid::new_v4())).await,
            Err(BookingError::HospitalNotFound)
        );

        let mut malformed = request(Uuid::new_v4());
        malformed.hospital_id = Some("64f1c2".into());
        assert_matches!(service.book(&principal, malformed).await, Err(BookingError::HospitalNotFound));
    }

    #[tokio::test]
    async fn my_appointments_are_newest_first_and_private() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let me = Principal::user(Uuid::new_v4(), Role::User);
        let someone = Principal::user(Uuid::new_v4(), Role::User);
        let service = BookingService::new(&state);

        let first = service.book(&me, request(hospital.id)).await.unwrap();
        let second = service.book(&me, request(hospital.id)).await.unwrap();
        service.book(&someone, request(hospital.id)).await.unwrap();

        let mine: Vec<Uuid> = service
            .my_appointments(&me)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(mine, vec![second.id, first.id]);
    }
}
