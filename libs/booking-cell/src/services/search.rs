use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use shared_database::{AppState, DirectoryStore};
use shared_models::hospital::{HospitalFilter, PublicHospital};
use shared_utils::validation::non_empty;

use crate::geo::haversine_km;
use crate::models::{
    BookingError, HospitalCard, ServiceSearchResult, SurgerySearchQuery, SurgerySearchResult,
};

pub struct SearchService {
    directory: Arc<dyn DirectoryStore>,
}

/// Nearest first; hospitals without a distance go last.
fn by_distance(a: &SurgerySearchResult, b: &SurgerySearchResult) -> Ordering {
    match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl SearchService {
    pub fn new(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
        }
    }

    /// Hospitals offering a surgery whose type contains the query text.
    ///
    /// With caller coordinates the results carry a distance and come back
    /// nearest first; `max_distance` then drops everything farther away,
    /// including hospitals with no stored location.
    pub async fn search_by_surgery(
        &self,
        query: &SurgerySearchQuery,
    ) -> Result<Vec<SurgerySearchResult>, BookingError> {
        let text = non_empty(query.surgery_type.as_deref())
            .ok_or(BookingError::MissingQuery("Surgery type is required"))?;
        debug!("Searching hospitals for surgery '{}'", text);

        let origin = query.origin();
        let hospitals = self
            .directory
            .list_hospitals(&HospitalFilter::offering_surgery(text))
            .await?;

        let mut results: Vec<SurgerySearchResult> = hospitals
            .iter()
            .map(|hospital| SurgerySearchResult {
                hospital: HospitalCard::from(hospital),
                surgeries: hospital.matching_surgeries(text),
                distance: origin
                    .zip(hospital.location)
                    .map(|(from, to)| haversine_km(from, to)),
            })
            .collect();

        if origin.is_some() {
            results.sort_by(by_distance);
            if let Some(max) = query.max_distance {
                results.retain(|r| r.distance.is_some_and(|d| d <= max));
            }
        }

        Ok(results)
    }

    pub async fn search_by_health_issue(
        &self,
        health_issue: Option<&str>,
    ) -> Result<Vec<ServiceSearchResult>, BookingError> {
        let text = non_empty(health_issue).ok_or(BookingError::MissingQuery("Health issue is required"))?;
        debug!("Searching hospitals for health issue '{}'", text);

        let hospitals = self
            .directory
            .list_hospitals(&HospitalFilter::offering_health_issue(text))
            .await?;

        Ok(hospitals
            .iter()
            .map(|hospital| ServiceSearchResult {
                hospital: HospitalCard::from(hospital),
                non_surgery_services: hospital.matching_services(text),
            })
            .collect())
    }

    pub async fn get_hospital(&self, id: Uuid) -> Result<PublicHospital, BookingError> {
        self.directory
            .get_hospital(id)
            .await?
            .map(PublicHospital::from)
            .ok_or(BookingError::HospitalNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::hospital::GeoPoint;
    use shared_utils::test_utils::{Fixtures, TestConfig};

    async fn place(state: &AppState, email: &str, location: Option<GeoPoint>) -> Uuid {
        let mut hospital = Fixtures::hospital(state, email).await;
        hospital.location = location;
        state.directory.replace_hospital(hospital.clone()).await.unwrap();
        hospital.id
    }

    #[tokio::test]
    async fn surgery_search_is_case_insensitive_substring() {
        let state = TestConfig::default().to_state();
        Fixtures::hospital(&state, "h@x.com").await;
        let service = SearchService::new(&state);

        for text in ["knee", "REPLACEMENT", "Knee Replacement"] {
            let query = SurgerySearchQuery {
                surgery_type: Some(text.into()),
                ..Default::default()
            };
            let results = service.search_by_surgery(&query).await.unwrap();
            assert_eq!(results.len(), 1, "query {}", text);
            assert_eq!(results[0].surgeries[0].surgery_type, "Knee Replacement");
            assert!(results[0].distance.is_none());
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let state = TestConfig::default().to_state();
        let service = SearchService::new(&state);

        let query = SurgerySearchQuery {
            surgery_type: Some("  ".into()),
            ..Default::default()
        };
        assert_matches!(
            service.search_by_surgery(&query).await,
            Err(BookingError::MissingQuery("Surgery type is required"))
        );
        assert_matches!(
            service.search_by_health_issue(None).await,
            Err(BookingError::MissingQuery("Health issue is required"))
        );
    }

    #[tokio::test]
    async fn distance_sorts_and_cuts_off() {
        let state = TestConfig::default().to_state();
        let far = place(&state, "tvm@x.com", Some(GeoPoint { lat: 8.5241, lng: 76.9366 })).await;
        let near = place(&state, "kochi@x.com", Some(GeoPoint { lat: 9.95, lng: 76.27 })).await;
        let nowhere = place(&state, "nowhere@x.com", None).await;
        let service = SearchService::new(&state);

        let mut query = SurgerySearchQuery {
            surgery_type: Some("knee".into()),
            lat: Some(9.9312),
            lng: Some(76.2673),
            max_distance: None,
        };
        let ids: Vec<Uuid> = service
            .search_by_surgery(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.hospital.id)
            .collect();
        assert_eq!(ids, vec![near, far, nowhere]);

        query.max_distance = Some(50.0);
        let results = service.search_by_surgery(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hospital.id, near);
        assert!(results[0].distance.unwrap() < 5.0);
    }
}
