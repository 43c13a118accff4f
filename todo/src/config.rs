//! Configuration for the todo application.
//!
//! Environment-based defaults, overridable through environment variables and
//! checked by [`AppConfig::validate`].
//!
//! | Variable                | Meaning                                  |
//! |-------------------------|------------------------------------------|
//! | `TODO_ENV`              | `dev`, `staging` or `prod` (default dev) |
//! | `TODO_LOG_LEVEL`        | `trace` .. `error`                       |
//! | `TODO_LOG_EVENTS`       | log every published event (`true/false`) |
//! | `TODO_EXCLUDE_ARCHIVED` | hide archived todos in listings          |
//!
//! # Example
//!
//! ```no_run
//! use effect_todo::config::{AppConfig, Environment};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! println!("log level: {}", config.observability.log_level);
//!
//! let prod = AppConfig::load(Environment::Production)?;
//! assert_eq!(prod.observability.log_level, "warn");
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ENV_VAR: &str = "TODO_ENV";
const LOG_LEVEL_VAR: &str = "TODO_LOG_LEVEL";
const LOG_EVENTS_VAR: &str = "TODO_LOG_EVENTS";
const EXCLUDE_ARCHIVED_VAR: &str = "TODO_EXCLUDE_ARCHIVED";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid environment value
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// An override variable could not be parsed
    #[error("Failed to parse {var}: {value}")]
    Parse {
        /// Variable name
        var: String,
        /// Rejected value
        value: String,
    },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Pre-production
    Staging,
    /// Production
    Production,
}

impl Environment {
    /// Check if this is production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    const fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Staging => "info",
            Self::Production => "warn",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "staging" | "stage" => Ok(Self::Staging),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log every event published on the bus
    pub log_events: bool,
}

impl ObservabilityConfig {
    /// Validate observability configuration
    ///
    /// # Errors
    ///
    /// Returns error if the log level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log_level: {}. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Listing defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Leave archived todos out of `get_all`
    pub exclude_archived: bool,
}

/// Application configuration
///
/// `Default` is the development profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Logging configuration
    pub observability: ObservabilityConfig,
    /// Listing defaults
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable is malformed or the result is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns error if a variable is malformed or the result is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENV_VAR)
            .map_or(Ok(Environment::default()), |value| value.parse())?;
        let mut config = Self::defaults_for(environment);

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.observability.log_level = level;
        }
        if let Some(value) = lookup(LOG_EVENTS_VAR) {
            config.observability.log_events = parse_flag(LOG_EVENTS_VAR, &value)?;
        }
        if let Some(value) = lookup(EXCLUDE_ARCHIVED_VAR) {
            config.query.exclude_archived = parse_flag(EXCLUDE_ARCHIVED_VAR, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration for specific environment, without overrides
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config = Self::defaults_for(environment);
        config.validate()?;
        Ok(config)
    }

    fn defaults_for(environment: Environment) -> Self {
        Self {
            environment,
            observability: ObservabilityConfig {
                log_level: environment.default_log_level().to_string(),
                log_events: !environment.is_production(),
            },
            query: QueryConfig::default(),
        }
    }

    /// Validate entire configuration
    ///
    /// # Errors
    ///
    /// Returns error if any configuration section is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.observability.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults_for(Environment::Development)
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Parse {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
