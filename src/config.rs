//! Configuration module
//!
//! Loads configuration from environment variables. Every variable is
//! optional; unset variables fall back to the defaults below.

use std::env;

/// Library configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity of identity-keyed lookup caches
    pub cache_size: usize,

    /// Maximum tasks a keyed task queue runs at once
    pub queue_concurrency: usize,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 300,
            queue_concurrency: 3,
            log_filter: "ledger_entities=info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_size = positive(&lookup, "LEDGER_CACHE_SIZE", defaults.cache_size)?;
        let queue_concurrency =
            positive(&lookup, "LEDGER_QUEUE_CONCURRENCY", defaults.queue_concurrency)?;

        let log_filter = lookup("LEDGER_LOG_FILTER")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let log_json = match lookup("LEDGER_LOG_JSON") {
            None => defaults.log_json,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidValue("LEDGER_LOG_JSON")),
            },
        };

        Ok(Self {
            cache_size,
            queue_concurrency,
            log_filter,
            log_json,
        })
    }
}

fn positive<F>(lookup: &F, name: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue(name)),
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
