//! Observability utilities for the prompt manager.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use anyhow::{Result, anyhow};
    use tracing_subscriber::EnvFilter;

    /// Filter used when `RUST_LOG` is unset.
    pub const DEFAULT_FILTER: &str = "info";

    /// Builds the filter from `RUST_LOG`, falling back to `default_filter`.
    #[must_use]
    pub fn env_filter(default_filter: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    }

    /// Installs the global `fmt` subscriber.
    ///
    /// # Errors
    ///
    /// Fails when a global subscriber is already installed.
    pub fn init(default_filter: &str) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(default_filter))
            .with_target(false)
            .with_level(true)
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn second_init_fails_instead_of_panicking() {
            let _ = init("debug");
            assert!(init("debug").is_err());
        }
    }
}
