//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0, addresses parse)
//! - Check URLs for the store, event bus and user directory
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StorefrontConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::StorefrontConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &StorefrontConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if !config.services.any_enabled() {
        errors.push(ValidationError::new("services", "at least one service must be enabled"));
    }

    if config.services.needs_store() {
        check_url(&mut errors, "database.url", &config.database.url, &["postgres", "postgresql"]);
        if config.database.max_connections == 0 {
            errors.push(ValidationError::new("database.max_connections", "must be at least 1"));
        }
        if config.database.acquire_timeout_secs == 0 {
            errors.push(ValidationError::new("database.acquire_timeout_secs", "must be positive"));
        }
        if config.readiness.max_attempts == 0 {
            errors.push(ValidationError::new("readiness.max_attempts", "must be at least 1"));
        }
    }

    if config.services.orders {
        check_url(&mut errors, "events.url", &config.events.url, &["nats", "tls"]);
        if config.events.subject.trim().is_empty() {
            errors.push(ValidationError::new("events.subject", "must not be empty"));
        }
        if config.events.max_batch_bytes == 0 {
            errors.push(ValidationError::new("events.max_batch_bytes", "must be positive"));
        }
    }

    if config.services.users {
        check_url(&mut errors, "users.base_url", &config.users.base_url, &["http", "https"]);
        if config.users.timeout_secs == 0 {
            errors.push(ValidationError::new("users.timeout_secs", "must be positive"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be positive"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be positive"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, schemes: &[&str]) {
    match Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}', expected one of {:?}", url.scheme(), schemes),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid url: {e}"))),
    }
}
