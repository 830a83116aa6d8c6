//! Configuration loader: optional JSON file, then environment overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::ManagerConfig;

/// Overrides [`ServerConfig::bind_addr`](crate::ServerConfig::bind_addr).
pub const ENV_ADDR: &str = "PROMPT_MANAGER_ADDR";
/// Overrides [`ServerConfig::data_dir`](crate::ServerConfig::data_dir).
pub const ENV_DATA_DIR: &str = "PROMPT_MANAGER_DATA_DIR";
/// Overrides [`ClientConfig::base_url`](crate::ClientConfig::base_url).
pub const ENV_URL: &str = "PROMPT_MANAGER_URL";
/// Overrides [`ClientConfig::timeout_secs`](crate::ClientConfig::timeout_secs).
pub const ENV_TIMEOUT_SECS: &str = "PROMPT_MANAGER_TIMEOUT_SECS";

/// Loads configuration from `path` (if given) and the process environment.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] for an unreadable
/// file and [`ConfigError::InvalidValue`] for a bad override or setting.
pub fn load(path: Option<&Path>) -> ConfigResult<ManagerConfig> {
    let config = match path {
        Some(path) => read_file(path)?,
        None => ManagerConfig::default(),
    };
    let config = apply_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Applies `PROMPT_MANAGER_*` overrides using `lookup` to read variables.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when an override cannot be parsed.
pub fn apply_overrides<F>(mut config: ManagerConfig, lookup: F) -> ConfigResult<ManagerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_ADDR) {
        config.server.bind_addr = addr
            .trim()
            .parse()
            .map_err(|err| ConfigError::invalid(ENV_ADDR, format!("{err}")))?;
        debug!(key = ENV_ADDR, "config override");
    }
    if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
        config.server.data_dir = PathBuf::from(dir);
        debug!(key = ENV_DATA_DIR, "config override");
    }
    if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
        config.client.base_url = url.trim().to_owned();
        debug!(key = ENV_URL, "config override");
    }
    if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
        config.client.timeout_secs = secs
            .trim()
            .parse()
            .map_err(|err| ConfigError::invalid(ENV_TIMEOUT_SECS, format!("{err}")))?;
        debug!(key = ENV_TIMEOUT_SECS, "config override");
    }
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<ManagerConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loaded configuration file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("prompt-config-{}.json", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn overrides_win_over_file() {
        let path = temp_file(r#"{"client":{"base_url":"http://files:1/","timeout_secs":5}}"#);
        let from_file = read_file(&path).unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_URL, "https://env.example/"),
            (ENV_ADDR, "0.0.0.0:9000"),
            (ENV_DATA_DIR, "/var/prompts"),
        ]
        .into_iter()
        .collect();
        let cfg = apply_overrides(from_file, |key| env.get(key).map(ToString::to_string)).unwrap();

        assert_eq!(cfg.client.base_url, "https://env.example/");
        assert_eq!(cfg.client.timeout_secs, 5);
        assert_eq!(cfg.server.bind_addr.port(), 9000);
        assert_eq!(cfg.server.data_dir, PathBuf::from("/var/prompts"));
    }

    #[test]
    fn bad_override_is_reported_by_name() {
        let err = apply_overrides(ManagerConfig::default(), |key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_owned())
        })
        .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, ENV_TIMEOUT_SECS),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_file("{ not json");
        assert!(matches!(read_file(&path), Err(ConfigError::Parse { .. })));
        let missing = std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4()));
        assert!(matches!(read_file(&missing), Err(ConfigError::Io { .. })));
    }
}
