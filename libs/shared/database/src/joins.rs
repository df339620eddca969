use std::collections::HashMap;

use anyhow::anyhow;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentView};
use shared_models::user::UserSummary;

use crate::store::{DirectoryStore, StoreResult};

/// Resolves `bookedByUser` on each appointment with one directory lookup.
pub async fn with_bookers(
    directory: &dyn DirectoryStore,
    appointments: Vec<Appointment>,
) -> StoreResult<Vec<AppointmentView>> {
    let mut ids: Vec<Uuid> = appointments.iter().filter_map(|a| a.booked_by_user).collect();
    ids.sort();
    ids.dedup();

    let users: HashMap<Uuid, UserSummary> = directory
        .find_users_by_ids(&ids)
        .await?
        .iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect();

    Ok(appointments
        .into_iter()
        .map(|appointment| {
            let booker = appointment
                .booked_by_user
                .and_then(|id| users.get(&id).cloned());
            AppointmentView { appointment, booker }
        })
        .collect())
}

pub async fn with_booker(
    directory: &dyn DirectoryStore,
    appointment: Appointment,
) -> StoreResult<AppointmentView> {
    with_bookers(directory, vec![appointment])
        .await?
        .pop()
        .ok_or_else(|| anyhow!("booker join dropped the appointment").into())
}
