//! Centralized configuration (environment variables + defaults).
//!
//! The configuration is read once at startup into an [`AppConfig`] and handed
//! to the components that need it. Nothing reads the environment afterwards.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | unset (in-memory store) |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `APP_ENV` | `Development` |
//! | `CORS_ALLOWED_ORIGIN` | unset (any origin) |
//! | `LEGACY_VALIDATOR` | `stub` |
//! | `LEGACY_VALIDATOR_TIMEOUT_MS` | `30000` (`0` disables) |
//! | `SEED_DEMO_DATA` | `true` |

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ENVIRONMENT: &str = "Development";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_VALIDATOR_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which external validator implementation to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorMode {
    /// Always approves.
    Stub,
    /// Rule-based simulation of the legacy program.
    Simulated,
}

impl FromStr for ValidatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stub" => Ok(Self::Stub),
            "simulated" | "mock" => Ok(Self::Simulated),
            other => Err(format!("unknown validator mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    /// Environment name reported by `/health`.
    pub environment: String,
    /// Service version reported by `/health`.
    pub version: String,
    /// Single origin allowed by CORS. `None` allows any origin.
    pub cors_allowed_origin: Option<HeaderValue>,
    pub validator_mode: ValidatorMode,
    /// Upper bound on a single external validation call. `None` waits forever.
    pub validator_timeout: Option<Duration>,
    /// Seed the in-memory store with demo customers.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: default_bind_addr(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cors_allowed_origin: None,
            validator_mode: ValidatorMode::Stub,
            validator_timeout: Some(Duration::from_millis(DEFAULT_VALIDATOR_TIMEOUT_MS)),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), default_bind_addr())?;
        let db_max_connections: u32 =
            parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?
                .max(1);
        let validator_mode =
            parse_or("LEGACY_VALIDATOR", get("LEGACY_VALIDATOR"), ValidatorMode::Stub)?;
        let timeout_ms: u64 = parse_or(
            "LEGACY_VALIDATOR_TIMEOUT_MS",
            get("LEGACY_VALIDATOR_TIMEOUT_MS"),
            DEFAULT_VALIDATOR_TIMEOUT_MS,
        )?;
        let cors_allowed_origin = match get("CORS_ALLOWED_ORIGIN") {
            None => None,
            Some(v) => Some(HeaderValue::from_str(v.trim()).map_err(|e| {
                ConfigError::InvalidEnvVar("CORS_ALLOWED_ORIGIN".to_string(), format!("{}: {}", v, e))
            })?),
        };
        let seed_demo_data = match get("SEED_DEMO_DATA") {
            None => true,
            Some(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::InvalidEnvVar("SEED_DEMO_DATA".to_string(), v.clone())
            })?,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            db_max_connections,
            bind_addr,
            environment: get("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cors_allowed_origin,
            validator_mode,
            validator_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            seed_demo_data,
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), format!("{}: {}", v, e))),
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
