//! Strongly typed configuration schemas.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Port the backend listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8188;

/// Top-level configuration file layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Settings of the REST backend.
    pub server: ServerConfig,
    /// Settings of clients talking to the backend.
    pub client: ClientConfig,
}

impl ManagerConfig {
    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or a base URL
    /// without an `http(s)://` scheme.
    pub fn validate(&self) -> ConfigResult<()> {
        self.client.validate()
    }
}

/// REST backend settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind_addr: SocketAddr,
    /// Directory holding `prompts.txt`, `categories.json` and images.
    pub data_dir: PathBuf,
    /// Categories seeded into a fresh store; `None` keeps the built-in list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_categories: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            data_dir: PathBuf::from("prompt_manager_data"),
            default_categories: None,
        }
    }
}

/// Client settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{DEFAULT_PORT}/"),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks the client settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or a base URL
    /// without an `http(s)://` scheme.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("client.timeout_secs", "must be positive"));
        }
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "client.base_url",
                "must start with http:// or https://",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: ManagerConfig =
            serde_json::from_str(r#"{"server":{"data_dir":"/srv/prompts"}}"#).unwrap();
        assert_eq!(cfg.server.data_dir, PathBuf::from("/srv/prompts"));
        assert_eq!(cfg.server.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(cfg.client, ClientConfig::default());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let client = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(
            client.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
