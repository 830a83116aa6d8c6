//! Prompt manager facade.
//!
//! Bundles the workspace crates behind feature flags so downstream users can
//! pull in only the selection engine, only the backend, or everything.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use prompt_primitives as primitives;

/// Filtering, selection, projection and dialog state (enabled by `engine` feature).
#[cfg(feature = "engine")]
pub use prompt_engine as engine;

/// File-backed prompt and category storage (enabled by `store` feature).
#[cfg(feature = "store")]
pub use prompt_store as store;

/// Backend access over HTTP or in-process (enabled by `gateway` feature).
#[cfg(feature = "gateway")]
pub use prompt_gateway as gateway;

/// Session driving the dialog against a backend (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use prompt_kernel as kernel;

/// REST backend (enabled by `server` feature).
#[cfg(feature = "server")]
pub use prompt_server as server;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use prompt_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use prompt_telemetry as telemetry;
