//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply STOREFRONT_* overrides)
//!     → validation.rs (semantic checks)
//!     → StorefrontConfig (validated, immutable)
//!     → handed to startup by reference
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Connection strings can come from the environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    DatabaseConfig, EventsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ReadinessConfig,
    SecurityConfig, ServicesConfig, StorefrontConfig, TimeoutConfig, UsersConfig,
};
