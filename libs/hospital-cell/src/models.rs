use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::{AppError, FieldError};
use shared_models::hospital::{Doctor, NonSurgeryService, Surgery};
use shared_utils::validation::{non_empty, FieldErrors};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorInput {
    pub name: Option<String>,
    pub degree: Option<String>,
}

impl DoctorInput {
    fn require(&self, errors: &mut FieldErrors) {
        errors.require_text("doctor.name", self.name.as_deref(), "Doctor name is required");
        errors.require_text("doctor.degree", self.degree.as_deref(), "Doctor degree is required");
    }

    fn to_doctor(&self) -> Doctor {
        Doctor {
            name: non_empty(self.name.as_deref()).unwrap_or_default().to_string(),
            degree: non_empty(self.degree.as_deref()).unwrap_or_default().to_string(),
        }
    }

    /// Overwrites each doctor sub-field that was supplied.
    fn merge_into(&self, doctor: &mut Doctor) {
        if let Some(name) = non_empty(self.name.as_deref()) {
            doctor.name = name.to_string();
        }
        if let Some(degree) = non_empty(self.degree.as_deref()) {
            doctor.degree = degree.to_string();
        }
    }
}

fn positive(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a > 0.0)
}

fn require_doctor(doctor: &Option<DoctorInput>, errors: &mut FieldErrors) {
    match doctor {
        Some(doctor) => doctor.require(errors),
        None => errors.push("doctor", "Doctor details are required"),
    }
}

/// Body of the add/update surgery routes. For updates every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeryRequest {
    pub surgery_type: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
    pub doctor: Option<DoctorInput>,
}

impl SurgeryRequest {
    pub fn into_entry(self) -> Result<Surgery, CatalogError> {
        let mut errors = FieldErrors::new();
        errors.require_text("surgeryType", self.surgery_type.as_deref(), "Surgery type is required");
        if positive(self.price).is_none() {
            errors.push("price", "Price is required");
        }
        require_doctor(&self.doctor, &mut errors);
        errors.into_result().map_err(CatalogError::MissingFields)?;

        Ok(Surgery {
            id: Uuid::new_v4(),
            surgery_type: non_empty(self.surgery_type.as_deref()).unwrap_or_default().to_string(),
            price: positive(self.price).unwrap_or_default(),
            availability: self.availability.unwrap_or(true),
            doctor: self.doctor.as_ref().map(DoctorInput::to_doctor).unwrap_or_default(),
        })
    }

    pub fn merge_into(&self, entry: &mut Surgery) {
        if let Some(surgery_type) = non_empty(self.surgery_type.as_deref()) {
            entry.surgery_type = surgery_type.to_string();
        }
        if let Some(price) = positive(self.price) {
            entry.price = price;
        }
        if let Some(availability) = self.availability {
            entry.availability = availability;
        }
        if let Some(doctor) = &self.doctor {
            doctor.merge_into(&mut entry.doctor);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssueRequest {
    pub health_issue: Option<String>,
    pub consultation_fee: Option<f64>,
    pub availability: Option<bool>,
    pub doctor: Option<DoctorInput>,
}

impl HealthIssueRequest {
    pub fn into_entry(self) -> Result<NonSurgeryService, CatalogError> {
        let mut errors = FieldErrors::new();
        errors.require_text("healthIssue", self.health_issue.as_deref(), "Health issue is required");
        if positive(self.consultation_fee).is_none() {
            errors.push("consultationFee", "Consultation fee is required");
        }
        require_doctor(&self.doctor, &mut errors);
        errors.into_result().map_err(CatalogError::MissingFields)?;

        Ok(NonSurgeryService {
            id: Uuid::new_v4(),
            health_issue: non_empty(self.health_issue.as_deref()).unwrap_or_default().to_string(),
            consultation_fee: positive(self.consultation_fee).unwrap_or_default(),
            availability: self.availability.unwrap_or(true),
            doctor: self.doctor.as_ref().map(DoctorInput::to_doctor).unwrap_or_default(),
        })
    }

    pub fn merge_into(&self, entry: &mut NonSurgeryService) {
        if let Some(health_issue) = non_empty(self.health_issue.as_deref()) {
            entry.health_issue = health_issue.to_string();
        }
        if let Some(fee) = positive(self.consultation_fee) {
            entry.consultation_fee = fee;
        }
        if let Some(availability) = self.availability {
            entry.availability = availability;
        }
        if let Some(doctor) = &self.doctor {
            doctor.merge_into(&mut entry.doctor);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurgeriesResponse {
    pub message: String,
    pub surgeries: Vec<Surgery>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesResponse {
    pub message: String,
    pub non_surgery_services: Vec<NonSurgeryService>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Hospital access required")]
    NotHospital,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error("{0} not found")]
    EntryNotFound(&'static str),

    #[error("Missing catalog fields")]
    MissingFields(Vec<FieldError>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotHospital => AppError::Forbidden(err.to_string()),
            CatalogError::HospitalNotFound | CatalogError::EntryNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CatalogError::MissingFields(errors) => AppError::InvalidFields(errors),
            CatalogError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
