use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_TOKEN_VALIDITY_DAYS: i64 = 7;
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "" => Ok(StoreBackend::Memory),
            "supabase" | "postgrest" => Ok(StoreBackend::Supabase),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_validity_days: i64,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_validity_days: env::var("TOKEN_VALIDITY_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_VALIDITY_DAYS),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            store_backend: env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(backend) => Some(backend),
                    Err(e) => {
                        warn!("{}, falling back to in-memory store", e);
                        None
                    }
                })
                .unwrap_or(StoreBackend::Memory),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| String::new()),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| String::new()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        if self.jwt_secret.is_empty() {
            return false;
        }
        match self.store_backend {
            StoreBackend::Memory => true,
            StoreBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
            }
        }
    }

    pub fn token_validity(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_validity_days)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_backend_names() {
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!("Supabase".parse::<StoreBackend>(), Ok(StoreBackend::Supabase));
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert!(parse_origins("*").is_empty());
        assert_eq!(
            parse_origins("http://localhost:3000, https://example.org"),
            vec!["http://localhost:3000".to_string(), "https://example.org".to_string()]
        );
    }
}
