use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, JwtHeader, Principal, PrincipalKind};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Invalid claims format")]
    InvalidClaims,

    #[error("Token expired")]
    Expired,
}

fn mac_for(jwt_secret: &str) -> Result<HmacSha256, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| TokenError::MissingSecret)
}

/// Signs an HS256 token for `principal`, valid for `validity` from now.
pub fn issue_token(
    principal: &Principal,
    jwt_secret: &str,
    validity: Duration,
) -> Result<String, TokenError> {
    let mut mac = mac_for(jwt_secret)?;

    let now = Utc::now();
    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };
    let claims = JwtClaims {
        sub: principal.id.to_string(),
        exp: Some((now + validity).timestamp().max(0) as u64),
        iat: Some(now.timestamp().max(0) as u64),
        email: principal.email.clone(),
        kind: principal.kind,
        role: match principal.kind {
            PrincipalKind::User => principal.role,
            PrincipalKind::Hospital => None,
        },
    };

    let header_json = serde_json::to_vec(&header).map_err(|_| TokenError::InvalidClaims)?;
    let claims_json = serde_json::to_vec(&claims).map_err(|_| TokenError::InvalidClaims)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Principal, TokenError> {
    let mut mac = mac_for(jwt_secret)?;

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::Malformed
    })?;

    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let header: JwtHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(TokenError::Malformed)?;
    if header.alg != ALGORITHM {
        debug!("Unexpected token algorithm {}", header.alg);
        return Err(TokenError::Malformed);
    }

    let claims: JwtClaims = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::InvalidClaims)
        .and_then(|bytes| {
            serde_json::from_slice(&bytes).map_err(|e| {
                debug!("Failed to parse claims: {}", e);
                TokenError::InvalidClaims
            })
        })?;

    // Every token we issue carries an expiry
    let exp = claims.exp.ok_or(TokenError::InvalidClaims)?;
    let now = Utc::now().timestamp().max(0) as u64;
    if exp < now {
        debug!("Token expired at {} (now: {})", exp, now);
        return Err(TokenError::Expired);
    }

    let id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidClaims)?;

    let principal = Principal {
        id,
        kind: claims.kind,
        role: match claims.kind {
            PrincipalKind::User => claims.role,
            PrincipalKind::Hospital => None,
        },
        email: claims.email,
    };

    debug!("Token validated successfully for {} {}", principal.kind, principal.id);
    Ok(principal)
}
