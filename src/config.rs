// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Default token lifetime: 24 hours.
pub const DEFAULT_JWT_EXPIRATION: u64 = 60 * 60 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            cors_origins,
            admin_name: env::var("ADMIN_NAME").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// Minimal config for tests and local tooling.
    pub fn for_secret(jwt_secret: &str) -> Self {
        Self {
            database_url: None,
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration: DEFAULT_JWT_EXPIRATION,
            rust_log: "error".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            admin_name: None,
            admin_email: None,
            admin_password: None,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://localhost:5173 ,, https://quiz.example.com ");
        assert_eq!(
            origins,
            vec!["http://localhost:5173".to_string(), "https://quiz.example.com".to_string()]
        );
    }

    #[test]
    fn blank_origins_mean_any() {
        assert!(parse_origins("").is_empty());
    }
}
