//! Configuration management
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present), with support for different environments.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Settings for the optional summary narrator
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// Chat completions endpoint
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// CORS allowed origins, comma separated
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Narrator settings; `None` keeps summaries templated
    pub narrator: Option<NarratorConfig>,
}

/// Narrator deadline when NARRATOR_TIMEOUT_MS is unset
const DEFAULT_NARRATOR_TIMEOUT_MS: u64 = 8000;

const DEFAULT_NARRATOR_MODEL: &str = "gpt-4o-mini";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let narrator = env::var("NARRATOR_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let timeout_ms = env::var("NARRATOR_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_NARRATOR_TIMEOUT_MS);

                NarratorConfig {
                    url,
                    api_key: env::var("NARRATOR_API_KEY").ok(),
                    model: env::var("NARRATOR_MODEL")
                        .unwrap_or_else(|_| DEFAULT_NARRATOR_MODEL.to_string()),
                    timeout: Duration::from_millis(timeout_ms),
                }
            });

        Ok(Config {
            environment,
            port,
            cors_allowed_origins,
            log_level,
            narrator,
        })
    }
}
