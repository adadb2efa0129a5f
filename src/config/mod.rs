//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → HttpServer, logging, asset mounts
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload, routes and
//!   middleware are frozen once serving starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AssetMount, LimitsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TemplateConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
