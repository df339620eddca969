use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub role: Option<Role>,
}

/// Which record a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Hospital,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::User => write!(f, "user"),
            PrincipalKind::Hospital => write!(f, "hospital"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated caller, resolved from a verified token and handed
/// explicitly to every service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub kind: PrincipalKind,
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl Principal {
    pub fn user(id: Uuid, role: Role) -> Self {
        Self {
            id,
            kind: PrincipalKind::User,
            role: Some(role),
            email: None,
        }
    }

    pub fn hospital(id: Uuid) -> Self {
        Self {
            id,
            kind: PrincipalKind::Hospital,
            role: None,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_user(&self) -> bool {
        self.kind == PrincipalKind::User
    }

    pub fn is_hospital(&self) -> bool {
        self.kind == PrincipalKind::Hospital
    }

    pub fn is_admin(&self) -> bool {
        self.is_user() && self.role == Some(Role::Admin)
    }

    /// The caller's hospital id, if the caller is a hospital.
    pub fn hospital_id(&self) -> Option<Uuid> {
        self.is_hospital().then_some(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_requires_user_kind() {
        let admin = Principal::user(Uuid::new_v4(), Role::Admin);
        assert!(admin.is_admin());
        assert!(admin.is_user());

        let hospital = Principal {
            role: Some(Role::Admin),
            ..Principal::hospital(Uuid::new_v4())
        };
        assert!(!hospital.is_admin());
        assert_eq!(hospital.hospital_id(), Some(hospital.id));
    }

    #[test]
    fn claims_use_type_key_for_kind() {
        let claims = JwtClaims {
            sub: "abc".into(),
            exp: Some(1),
            iat: Some(0),
            email: None,
            kind: PrincipalKind::Hospital,
            role: None,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "hospital");
    }
}
