use std::sync::Arc;

use shared_database::{AppState, AppointmentStore, DirectoryStore};
use shared_models::appointment::{AppointmentFilter, ApprovalStatus};
use shared_models::user::Role;

use crate::models::{AdminError, DashboardStats};

pub struct DashboardService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl DashboardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            appointments: state.appointments.clone(),
        }
    }

    async fn count(&self, filter: AppointmentFilter) -> Result<u64, AdminError> {
        Ok(self.appointments.count_appointments(&filter).await?)
    }

    /// Each figure is its own count; they are not read from one snapshot.
    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        let all = AppointmentFilter::default;
        Ok(DashboardStats {
            total_hospitals: self.directory.count_hospitals().await?,
            total_users: self.directory.count_users(Some(Role::User)).await?,
            total_patients: self.count(all()).await?,
            surgeries_done: self.count(all().surgery_done(true)).await?,
            pending_surgeries: self.count(all().surgery_done(false)).await?,
            approved_patients: self.count(all().approval(ApprovalStatus::Approved)).await?,
            rejected_patients: self.count(all().approval(ApprovalStatus::Rejected)).await?,
            pending_approvals: self.count(all().approval(ApprovalStatus::Pending)).await?,
        })
    }
}
