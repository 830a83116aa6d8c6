//! Configuration management for the prompt manager.
//!
//! [`schema`] holds the typed settings, [`loader`] reads them from an optional
//! JSON file and applies `PROMPT_MANAGER_*` environment overrides.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_ADDR, ENV_DATA_DIR, ENV_TIMEOUT_SECS, ENV_URL, apply_overrides, load};
pub use schema::{ClientConfig, ManagerConfig, ServerConfig};
