//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::StorefrontConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `database.url`.
pub const ENV_DATABASE_URL: &str = "STOREFRONT_DATABASE_URL";
/// Environment variable overriding `events.url`.
pub const ENV_NATS_URL: &str = "STOREFRONT_NATS_URL";
/// Environment variable overriding `users.base_url`.
pub const ENV_USERS_BASE_URL: &str = "STOREFRONT_USERS_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse TOML text into a configuration. No validation.
pub fn parse_config(content: &str) -> Result<StorefrontConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Replace connection strings with values found through `lookup`.
pub fn apply_overrides<F>(config: &mut StorefrontConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_DATABASE_URL) {
        config.database.url = url;
    }
    if let Some(url) = lookup(ENV_NATS_URL) {
        config.events.url = url;
    }
    if let Some(url) = lookup(ENV_USERS_BASE_URL) {
        config.users.base_url = url;
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<StorefrontConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
///
/// Environment overrides and validation apply either way.
pub fn load_or_default(path: Option<&Path>) -> Result<StorefrontConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = StorefrontConfig::default();
            apply_overrides(&mut config, |key| std::env::var(key).ok());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}
