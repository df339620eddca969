use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use shared_models::error::{AppError, FieldError};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Emails are stored and looked up trimmed and lower-cased.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Which end of a bare calendar day a `YYYY-MM-DD` value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates (UTC).
pub fn parse_date(value: &str, bound: DayBound) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
    };
    Some(day.and_time(time).and_utc())
}

/// Collects every rejected field of one request.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn require_text(&mut self, field: &str, value: Option<&str>, message: &str) {
        if non_empty(value).is_none() {
            self.push(field, message);
        }
    }

    pub fn require_email(&mut self, field: &str, value: Option<&str>) {
        if !value.is_some_and(is_valid_email) {
            self.push(field, "Valid email is required");
        }
    }

    pub fn require_min_len(&mut self, field: &str, value: Option<&str>, min: usize, message: &str) {
        if value.map_or(0, |v| v.chars().count()) < min {
            self.push(field, message);
        }
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        self.0.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    pub fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::InvalidFields(errors.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("h@x.com"));
        assert!(is_valid_email(" first.last+tag@mail.example.in "));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  H@X.Com "), "h@x.com");
    }

    #[test]
    fn bare_dates_expand_to_day_bounds() {
        let start = parse_date("2024-03-01", DayBound::Start).unwrap();
        let end = parse_date("2024-03-01", DayBound::End).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(end > start && end.date_naive() == start.date_naive());

        let instant = parse_date("2024-03-01T10:30:00+05:30", DayBound::End).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-03-01T05:00:00+00:00");
        assert!(parse_date("01/03/2024", DayBound::Start).is_none());
    }

    #[test]
    fn collects_every_failure() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", Some("   "), "Name is required");
        errors.require_email("email", None);
        errors.require_min_len("password", Some("12345"), 6, "Password must be at least 6 characters");
        errors.require_text("state", Some("Kerala"), "State/UT is required");

        let fields: Vec<String> = errors.into_inner().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }
}
