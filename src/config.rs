use std::env;

use thiserror::Error;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Signing and gate settings shared by token issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens.
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Static PIN that grants admin access without a user token.
    pub admin_pin: Option<String>,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_DAYS * 24 * 60 * 60,
            admin_pin: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_ttl_secs = ttl_days_to_secs(parse_or("TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080)?,
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl_secs,
                admin_pin: env::var("ADMIN_PIN").ok().filter(|pin| !pin.is_empty()),
            },
            seed_demo_data: parse_or("SEED_DEMO_DATA", false)?,
        })
    }
}

/// Token lifetime in seconds; the day count must be positive and small
/// enough that the product fits an `i64`.
fn ttl_days_to_secs(days: i64) -> Result<i64, ConfigError> {
    days.checked_mul(24 * 60 * 60)
        .filter(|_| days > 0)
        .ok_or(ConfigError::Invalid {
            key: "TOKEN_TTL_DAYS",
            value: days.to_string(),
        })
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
