//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

use crate::adapters::gemini::DEFAULT_GEMINI_API_BASE;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub cors_origin: String,
    pub passing_percentage: f64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server and Database Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite:quizzy.db?mode=rwc".to_string());

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "DATABASE_MAX_CONNECTIONS".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    ))
                }
            },
            None => 5,
        };

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Gemini (optional; generation is disabled without a key) ---
        let gemini_api_key = var("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());
        let gemini_api_base =
            var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());
        let gemini_model = var("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string());

        // --- Presentation Settings ---
        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:1420".to_string());

        let passing_percentage = match var("PASSING_PERCENTAGE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(p) if (0.0..=100.0).contains(&p) => p,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "PASSING_PERCENTAGE".to_string(),
                        format!("'{}' is not a percentage between 0 and 100", raw),
                    ))
                }
            },
            None => 50.0,
        };

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            cors_origin,
            passing_percentage,
        })
    }
}
