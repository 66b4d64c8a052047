use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Every TMDB base URL must live under this prefix
pub const TMDB_API_PREFIX: &str = "https://api.themoviedb.org/3";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (v3 auth)
    #[serde(default)]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default)]
    pub tmdb_base_url: String,

    /// Language requested for catalog data
    #[serde(default = "default_language")]
    pub tmdb_language: String,

    /// Directory holding the persisted favorites slot
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Configuration errors. Any of these prevents the application from starting.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {}", join_fields(.0))]
    Invalid(Vec<FieldError>),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field and reports all failures together
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.tmdb_api_key.trim().is_empty() {
            errors.push(FieldError {
                field: "TMDB_API_KEY",
                reason: "TMDB API key is required".to_string(),
            });
        }

        if self.tmdb_base_url.trim().is_empty() {
            errors.push(FieldError {
                field: "TMDB_BASE_URL",
                reason: "TMDB base URL is required".to_string(),
            });
        } else if let Err(e) = url::Url::parse(&self.tmdb_base_url) {
            errors.push(FieldError {
                field: "TMDB_BASE_URL",
                reason: format!("TMDB base URL must be a valid URL ({})", e),
            });
        } else if !self.tmdb_base_url.starts_with(TMDB_API_PREFIX) {
            errors.push(FieldError {
                field: "TMDB_BASE_URL",
                reason: format!("TMDB base URL must start with {}", TMDB_API_PREFIX),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
