use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contains_ignore_case;

pub const DEFAULT_COUNTRY: &str = "India";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub degree: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub id: Uuid,
    pub surgery_type: String,
    pub price: f64,
    pub availability: bool,
    pub doctor: Doctor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonSurgeryService {
    pub id: Uuid,
    pub health_issue: String,
    pub consultation_fee: f64,
    pub availability: bool,
    pub doctor: Doctor,
}

/// Stored hospital record, catalogs embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub landmark: Option<String>,
    pub establish_year: i32,
    #[serde(default)]
    pub opd_charge: Vec<f64>,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub surgeries: Vec<Surgery>,
    #[serde(default)]
    pub non_surgery_services: Vec<NonSurgeryService>,
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    /// Snapshot string copied onto appointments at booking time.
    pub fn location_label(&self) -> String {
        if self.district.trim().is_empty() {
            "N/A".to_string()
        } else {
            format!("{}, {}", self.district, self.state)
        }
    }

    pub fn matching_surgeries(&self, needle: &str) -> Vec<Surgery> {
        self.surgeries
            .iter()
            .filter(|s| contains_ignore_case(&s.surgery_type, needle))
            .cloned()
            .collect()
    }

    pub fn matching_services(&self, needle: &str) -> Vec<NonSurgeryService> {
        self.non_surgery_services
            .iter()
            .filter(|s| contains_ignore_case(&s.health_issue, needle))
            .cloned()
            .collect()
    }
}

/// Hospital as returned over the API: everything but the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicHospital {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub landmark: Option<String>,
    pub establish_year: i32,
    pub opd_charge: Vec<f64>,
    pub location: Option<GeoPoint>,
    pub surgeries: Vec<Surgery>,
    pub non_surgery_services: Vec<NonSurgeryService>,
    pub created_at: DateTime<Utc>,
}

impl From<Hospital> for PublicHospital {
    fn from(h: Hospital) -> Self {
        Self {
            id: h.id,
            name: h.name,
            email: h.email,
            country: h.country,
            state: h.state,
            district: h.district,
            landmark: h.landmark,
            establish_year: h.establish_year,
            opd_charge: h.opd_charge,
            location: h.location,
            surgeries: h.surgeries,
            non_surgery_services: h.non_surgery_services,
            created_at: h.created_at,
        }
    }
}

/// Short form returned by hospital signup/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub landmark: Option<String>,
    pub location: Option<GeoPoint>,
}

impl From<&Hospital> for HospitalSummary {
    fn from(h: &Hospital) -> Self {
        Self {
            id: h.id,
            name: h.name.clone(),
            email: h.email.clone(),
            country: h.country.clone(),
            state: h.state.clone(),
            district: h.district.clone(),
            landmark: h.landmark.clone(),
            location: h.location,
        }
    }
}

/// Substring predicates over the embedded catalogs.
#[derive(Debug, Clone, Default)]
pub struct HospitalFilter {
    pub surgery_type: Option<String>,
    pub health_issue: Option<String>,
}

impl HospitalFilter {
    pub fn offering_surgery(text: impl Into<String>) -> Self {
        Self {
            surgery_type: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn offering_health_issue(text: impl Into<String>) -> Self {
        Self {
            health_issue: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, hospital: &Hospital) -> bool {
        if let Some(text) = &self.surgery_type {
            if !hospital
                .surgeries
                .iter()
                .any(|s| contains_ignore_case(&s.surgery_type, text))
            {
                return false;
            }
        }
        if let Some(text) = &self.health_issue {
            if !hospital
                .non_surgery_services
                .iter()
                .any(|s| contains_ignore_case(&s.health_issue, text))
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital_with(surgeries: &[&str]) -> Hospital {
        Hospital {
            id: Uuid::new_v4(),
            name: "City Care".into(),
            email: "city@care.in".into(),
            password_hash: "hash".into(),
            country: DEFAULT_COUNTRY.into(),
            state: "Kerala".into(),
            district: "Ernakulam".into(),
            landmark: None,
            establish_year: 1990,
            opd_charge: vec![],
            location: None,
            surgeries: surgeries
                .iter()
                .map(|t| Surgery {
                    id: Uuid::new_v4(),
                    surgery_type: t.to_string(),
                    price: 1000.0,
                    availability: true,
                    doctor: Doctor {
                        name: "Dr. A".into(),
                        degree: "MS".into(),
                    },
                })
                .collect(),
            non_surgery_services: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn surgery_filter_is_case_insensitive_substring() {
        let hospital = hospital_with(&["Knee Replacement", "Appendectomy"]);
        assert!(HospitalFilter::offering_surgery("knee").matches(&hospital));
        assert!(HospitalFilter::offering_surgery("REPLACEMENT").matches(&hospital));
        assert!(!HospitalFilter::offering_surgery("cataract").matches(&hospital));

        let subset = hospital.matching_surgeries("KNEE");
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].surgery_type, "Knee Replacement");
    }

    #[test]
    fn location_label_falls_back_without_district() {
        let mut hospital = hospital_with(&[]);
        assert_eq!(hospital.location_label(), "Ernakulam, Kerala");
        hospital.district = String::new();
        assert_eq!(hospital.location_label(), "N/A");
    }

    #[test]
    fn public_view_drops_password_hash() {
        let value = serde_json::to_value(PublicHospital::from(hospital_with(&[]))).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["establishYear"], 1990);
    }
}
