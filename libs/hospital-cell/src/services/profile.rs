use std::sync::Arc;

use shared_database::{AppState, DirectoryStore};
use shared_models::auth::Principal;
use shared_models::hospital::PublicHospital;

use crate::models::CatalogError;

pub struct ProfileService {
    directory: Arc<dyn DirectoryStore>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
        }
    }

    /// The calling hospital's own record, password hash removed.
    pub async fn get_profile(&self, principal: &Principal) -> Result<PublicHospital, CatalogError> {
        let hospital_id = principal.hospital_id().ok_or(CatalogError::NotHospital)?;
        self.directory
            .get_hospital(hospital_id)
            .await?
            .map(PublicHospital::from)
            .ok_or(CatalogError::HospitalNotFound)
    }
}
