// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

/// Default number of rows returned by the leaderboard when no limit is given.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Upper bound accepted for the leaderboard `limit` parameter.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Why the environment could not be turned into a [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// Shared secret of the external auth provider (HS256).
    pub jwt_secret: String,

    /// Expected `aud` claim. `None` disables the audience check.
    pub jwt_audience: Option<String>,

    pub rust_log: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub leaderboard_default_limit: i64,
    pub leaderboard_max_limit: i64,

    /// Allowed CORS origins (comma separated in the environment).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Reads configuration from the process environment (and `.env` if present).
    ///
    /// Fails when a required variable (`DATABASE_URL`, `JWT_SECRET`) is missing
    /// or an optional one is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_audience = match env::var("JWT_AUDIENCE") {
            Ok(aud) if aud.trim().is_empty() => None,
            Ok(aud) => Some(aud),
            Err(_) => Some("authenticated".to_string()),
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let leaderboard_max_limit = parse_or("LEADERBOARD_MAX_LIMIT", MAX_LEADERBOARD_LIMIT)?;
        let leaderboard_default_limit =
            parse_or("LEADERBOARD_DEFAULT_LIMIT", DEFAULT_LEADERBOARD_LIMIT)?
                .clamp(1, leaderboard_max_limit.max(1));

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_audience,
            rust_log,
            port: parse_or("PORT", 8080)?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            leaderboard_default_limit,
            leaderboard_max_limit,
            cors_origins,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

/// Parses an optional variable, falling back to `default` only when it is unset.
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
