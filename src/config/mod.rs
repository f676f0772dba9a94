//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → env overrides: PORT, STORE_URL (loader.rs)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never revisited
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ServerConfig;
pub use schema::StartupConfig;
pub use schema::StoreConfig;
