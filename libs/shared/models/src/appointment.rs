use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::contains_ignore_case;
use crate::user::UserSummary;

/// What the appointment is for. Exactly one of surgery type / health issue
/// exists, selected by `appointmentType` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "appointmentType")]
pub enum AppointmentKind {
    #[serde(rename = "surgery", rename_all = "camelCase")]
    Surgery { surgery_type: String },
    #[serde(rename = "non-surgery", rename_all = "camelCase")]
    NonSurgery { health_issue: String },
}

impl AppointmentKind {
    pub fn surgery_type(&self) -> Option<&str> {
        match self {
            AppointmentKind::Surgery { surgery_type } => Some(surgery_type),
            AppointmentKind::NonSurgery { .. } => None,
        }
    }

    pub fn health_issue(&self) -> Option<&str> {
        match self {
            AppointmentKind::NonSurgery { health_issue } => Some(health_issue),
            AppointmentKind::Surgery { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid approval status: {0}")]
pub struct InvalidApprovalStatus(pub String);

impl FromStr for ApprovalStatus {
    type Err = InvalidApprovalStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(InvalidApprovalStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A patient's booking against one hospital. Approval and completion are
/// independent: nothing here ties `surgery_done` to `approved_for_surgery`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    #[serde(flatten)]
    pub kind: AppointmentKind,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub address: String,
    pub mobile_no: String,
    pub email_address: Option<String>,
    pub booked_by_user: Option<Uuid>,
    pub hospital_id: Uuid,
    pub hospital_name: String,
    pub hospital_location: String,
    #[serde(default)]
    pub approved_for_surgery: ApprovalStatus,
    #[serde(default)]
    pub surgery_done: bool,
    #[serde(default)]
    pub surgery_done_by: String,
    #[serde(default)]
    pub consultation_done: bool,
    #[serde(default)]
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Appointment with the booking user resolved.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub booker: Option<UserSummary>,
}

/// One field-level mutation from the hospital workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentUpdate {
    Comments(String),
    Approval(ApprovalStatus),
    Completion {
        done: bool,
        done_by: Option<String>,
    },
}

impl AppointmentUpdate {
    pub fn apply(&self, appointment: &mut Appointment) {
        match self {
            AppointmentUpdate::Comments(comments) => {
                appointment.comments = comments.trim().to_string();
            }
            AppointmentUpdate::Approval(status) => {
                appointment.approved_for_surgery = *status;
            }
            AppointmentUpdate::Completion { done, done_by } => {
                appointment.surgery_done = *done;
                if let Some(by) = done_by.as_deref().filter(|b| !b.is_empty()) {
                    appointment.surgery_done_by = by.to_string();
                }
            }
        }
    }
}

/// Conjunction of optional predicates; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub hospital_id: Option<Uuid>,
    pub booked_by: Option<Uuid>,
    pub surgery_done: Option<bool>,
    pub approval: Option<ApprovalStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl AppointmentFilter {
    pub fn for_hospital(hospital_id: Uuid) -> Self {
        Self {
            hospital_id: Some(hospital_id),
            ..Default::default()
        }
    }

    pub fn booked_by(user_id: Uuid) -> Self {
        Self {
            booked_by: Some(user_id),
            ..Default::default()
        }
    }

    pub fn surgery_done(mut self, done: bool) -> Self {
        self.surgery_done = Some(done);
        self
    }

    pub fn approval(mut self, status: ApprovalStatus) -> Self {
        self.approval = Some(status);
        self
    }

    pub fn matches(&self, a: &Appointment) -> bool {
        if self.hospital_id.is_some_and(|id| id != a.hospital_id) {
            return false;
        }
        if self.booked_by.is_some() && self.booked_by != a.booked_by_user {
            return false;
        }
        if self.surgery_done.is_some_and(|done| done != a.surgery_done) {
            return false;
        }
        if self.approval.is_some_and(|s| s != a.approved_for_surgery) {
            return false;
        }
        if self.date_from.is_some_and(|from| a.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| a.date > to) {
            return false;
        }
        match self.search.as_deref() {
            Some(text) if !text.is_empty() => search_fields(a)
                .into_iter()
                .any(|field| contains_ignore_case(field, text)),
            _ => true,
        }
    }
}

fn search_fields(a: &Appointment) -> Vec<&str> {
    let mut fields = vec![
        a.name.as_str(),
        a.address.as_str(),
        a.mobile_no.as_str(),
        a.hospital_name.as_str(),
    ];
    fields.extend(a.kind.surgery_type());
    fields.extend(a.kind.health_issue());
    fields
}
