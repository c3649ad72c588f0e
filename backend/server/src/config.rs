use std::{env, fmt::Display, str::FromStr};

use axum::http::HeaderName;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_REDIS_KEY: &str = "recipes";
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid {key} value `{value}`: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Redis store when set, in-memory store otherwise.
    pub redis_url: Option<String>,
    pub redis_key: String,
    /// Header an upstream auth proxy fills with the caller's user id.
    pub identity_header: HeaderName,
    pub seed_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            redis_url: None,
            redis_key: DEFAULT_REDIS_KEY.to_string(),
            identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
            seed_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", DEFAULT_PORT)?,
            redis_url: optional(&lookup, "REDIS_URL"),
            redis_key: try_load(&lookup, "REDIS_KEY", DEFAULT_REDIS_KEY)?,
            identity_header: try_load(&lookup, "IDENTITY_HEADER", DEFAULT_IDENTITY_HEADER)?,
            seed_path: optional(&lookup, "SEED_PATH"),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).filter(|value| !value.trim().is_empty());

    if value.is_none() {
        info!("{key} not set");
    }

    value
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");

            Err(ConfigError {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}
