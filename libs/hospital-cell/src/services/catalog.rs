use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, DirectoryStore};
use shared_models::auth::Principal;
use shared_models::hospital::{Hospital, NonSurgeryService, Surgery};

use crate::models::{CatalogError, HealthIssueRequest, SurgeryRequest};

/// Maintains the surgery and non-surgery catalogs embedded in the calling
/// hospital's record. Every mutation rewrites the whole record.
pub struct CatalogService {
    directory: Arc<dyn DirectoryStore>,
}

impl CatalogService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
        }
    }

    async fn mutate<R, F>(&self, principal: &Principal, change: F) -> Result<R, CatalogError>
    where
        F: FnOnce(&mut Hospital) -> Result<R, CatalogError> + Send,
        R: Send,
    {
        let hospital_id = principal.hospital_id().ok_or(CatalogError::NotHospital)?;
        let mut hospital = self
            .directory
            .get_hospital(hospital_id)
            .await?
            .ok_or(CatalogError::HospitalNotFound)?;

        let result = change(&mut hospital)?;

        self.directory
            .replace_hospital(hospital)
            .await?
            .ok_or(CatalogError::HospitalNotFound)?;
        Ok(result)
    }

    pub async fn add_surgery(
        &self,
        principal: &Principal,
        request: SurgeryRequest,
    ) -> Result<Vec<Surgery>, CatalogError> {
        let entry = request.into_entry()?;
        info!("Hospital {} adds surgery {}", principal.id, entry.surgery_type);
        self.mutate(principal, move |hospital| {
            hospital.surgeries.push(entry);
            Ok(hospital.surgeries.clone())
        })
        .await
    }

    pub async fn update_surgery(
        &self,
        principal: &Principal,
        surgery_id: Uuid,
        request: SurgeryRequest,
    ) -> Result<Vec<Surgery>, CatalogError> {
        debug!("Hospital {} updates surgery {}", principal.id, surgery_id);
        self.mutate(principal, move |hospital| {
            let entry = hospital
                .surgeries
                .iter_mut()
                .find(|s| s.id == surgery_id)
                .ok_or(CatalogError::EntryNotFound("Surgery"))?;
            request.merge_into(entry);
            Ok(hospital.surgeries.clone())
        })
        .await
    }

    /// Deleting an id that is not in the catalog is not an error.
    pub async fn delete_surgery(
        &self,
        principal: &Principal,
        surgery_id: Uuid,
    ) -> Result<Vec<Surgery>, CatalogError> {
        self.mutate(principal, move |hospital| {
            hospital.surgeries.retain(|s| s.id != surgery_id);
            Ok(hospital.surgeries.clone())
        })
        .await
    }

    pub async fn add_health_issue(
        &self,
        principal: &Principal,
        request: HealthIssueRequest,
    ) -> Result<Vec<NonSurgeryService>, CatalogError> {
        let entry = request.into_entry()?;
        info!("Hospital {} adds health issue {}", principal.id, entry.health_issue);
        self.mutate(principal, move |hospital| {
            hospital.non_surgery_services.push(entry);
            Ok(hospital.non_surgery_services.clone())
        })
        .await
    }

    pub async fn update_health_issue(
        &self,
        principal: &Principal,
        service_id: Uuid,
        request: HealthIssueRequest,
    ) -> Result<Vec<NonSurgeryService>, CatalogError> {
        debug!("Hospital {} updates health issue {}", principal.id, service_id);
        self.mutate(principal, move |hospital| {
            let entry = hospital
                .non_surgery_services
                .iter_mut()
                .find(|s| s.id == service_id)
                .ok_or(CatalogError::EntryNotFound("Health issue"))?;
            request.merge_into(entry);
            Ok(hospital.non_surgery_services.clone())
        })
        .await
    }

    pub async fn delete_health_issue(
        &self,
        principal: &Principal,
        service_id: Uuid,
    ) -> Result<Vec<NonSurgeryService>, CatalogError> {
        self.mutate(principal, move |hospital| {
            hospital.non_surgery_services.retain(|s| s.id != service_id);
            Ok(hospital.non_surgery_services.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoctorInput;
    use assert_matches::assert_matches;
    use shared_models::user::Role;
    use shared_utils::test_utils::{Fixtures, TestConfig};

    fn cataract() -> SurgeryRequest {
        SurgeryRequest {
            surgery_type: Some("Cataract".into()),
            price: Some(25000.0),
            availability: None,
            doctor: Some(DoctorInput {
                name: Some("Dr. Iyer".into()),
                degree: Some("MS Ophthalmology".into()),
            }),
        }
    }

    #[tokio::test]
    async fn add_then_update_then_delete_surgery() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let principal = Principal::hospital(hospital.id);
        let service = CatalogService::new(&state);

        let surgeries = service.add_surgery(&principal, cataract()).await.unwrap();
        assert_eq!(surgeries.len(), 2);
        let added = surgeries[1].clone();
        assert!(added.availability);

        let update = SurgeryRequest {
            price: Some(30000.0),
            ..Default::default()
        };
        let surgeries = service.update_surgery(&principal, added.id, update).await.unwrap();
        assert_eq!(surgeries[1].price, 30000.0);
        assert_eq!(surgeries[1].surgery_type, "Cataract");

        let surgeries = service.delete_surgery(&principal, added.id).await.unwrap();
        assert_eq!(surgeries.len(), 1);

        let stored = state.directory.get_hospital(hospital.id).await.unwrap().unwrap();
        assert_eq!(stored.surgeries, surgeries);
    }

    #[tokio::test]
    async fn deleting_unknown_entry_leaves_catalog_alone() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let principal = Principal::hospital(hospital.id);

        let surgeries = CatalogService::new(&state)
            .delete_surgery(&principal, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(surgeries, hospital.surgeries);
    }

    #[tokio::test]
    async fn updating_unknown_entry_is_not_found() {
        let state = TestConfig::default().to_state();
        let hospital = Fixtures::hospital(&state, "h@x.com").await;
        let principal = Principal::hospital(hospital.id);

        let result = CatalogService::new(&state)
            .update_health_issue(&principal, Uuid::new_v4(), HealthIssueRequest::default())
            .await;
        assert_matches!(result, Err(CatalogError::EntryNotFound("Health issue")));
    }

    #[tokio::test]
    async fn users_cannot_touch_catalogs() {
        let state = TestConfig::default().to_state();
        let principal = Principal::user(Uuid::new_v4(), Role::User);

        let result = CatalogService::new(&state).add_surgery(&principal, cataract()).await;
        assert_matches!(result, Err(CatalogError::NotHospital));
    }
}
