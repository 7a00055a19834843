//! Persistent CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quoteday_core::config::{normalize_endpoint, SyncConfig};
use quoteday_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// 0 disables automatic sync
    #[serde(default)]
    pub sync_interval_secs: Option<u64>,
    /// 0 keeps every fetched record
    #[serde(default)]
    pub fetch_limit: Option<usize>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("quoteday").join(CONFIG_FILE_NAME))
        .ok_or(CliError::MissingDirectory("config"))
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    cli_config_path.map_or_else(default_config_path, Ok)
}

impl CliConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Validate and store a new endpoint
    pub fn set_endpoint(&mut self, endpoint: String) -> Result<String, CliError> {
        let endpoint = normalize_endpoint(endpoint)?;
        self.endpoint = Some(endpoint.clone());
        Ok(endpoint)
    }

    /// Effective sync configuration: defaults, then this file, then `lookup` overrides
    pub fn to_sync_config(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<SyncConfig, CliError> {
        let mut config = SyncConfig::default();
        if let Some(endpoint) = normalize_text_option(self.endpoint.clone()) {
            config.endpoint = normalize_endpoint(endpoint)?;
        }
        config = match self.sync_interval_secs {
            Some(0) => config.without_auto_sync(),
            Some(seconds) => config.with_sync_interval(Duration::from_secs(seconds)),
            None => config,
        };
        if let Some(limit) = self.fetch_limit {
            config = config.with_fetch_limit((limit > 0).then_some(limit));
        }
        Ok(config.apply_env(lookup)?)
    }

    fn normalize(&mut self) {
        self.endpoint = normalize_text_option(self.endpoint.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quoteday_core::config::{DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT, DEFAULT_SYNC_INTERVAL};

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_from_path(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn config_roundtrip_trims_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = CliConfig {
            version: 1,
            endpoint: Some(" https://api.example.com/quotes ".to_string()),
            sync_interval_secs: Some(90),
            fetch_limit: Some(0),
        };

        config.save_to_path(&path).unwrap();
        let loaded = CliConfig::load_from_path(&path).unwrap();

        assert_eq!(
            loaded.endpoint.as_deref(),
            Some("https://api.example.com/quotes")
        );
        assert_eq!(loaded.sync_interval_secs, Some(90));
        assert_eq!(loaded.fetch_limit, Some(0));
    }

    #[test]
    fn parse_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let error = CliConfig::load_from_path(&path).unwrap_err();
        assert!(error.starts_with("Failed to parse config"));
    }

    #[test]
    fn sync_config_defaults_without_file_values() {
        let config = CliConfig::default().to_sync_config(|_| None).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.sync_interval, Some(DEFAULT_SYNC_INTERVAL));
        assert_eq!(config.fetch_limit, Some(DEFAULT_FETCH_LIMIT));
    }

    #[test]
    fn file_values_apply_and_zero_disables() {
        let file = CliConfig {
            endpoint: Some("https://api.example.com/quotes/".to_string()),
            sync_interval_secs: Some(0),
            fetch_limit: Some(0),
            ..CliConfig::default()
        };

        let config = file.to_sync_config(|_| None).unwrap();

        assert_eq!(config.endpoint, "https://api.example.com/quotes");
        assert_eq!(config.sync_interval, None);
        assert_eq!(config.fetch_limit, None);
    }

    #[test]
    fn file_interval_replaces_default() {
        let file = CliConfig {
            sync_interval_secs: Some(90),
            fetch_limit: Some(12),
            ..CliConfig::default()
        };

        let config = file.to_sync_config(|_| None).unwrap();

        assert_eq!(config.sync_interval, Some(Duration::from_secs(90)));
        assert_eq!(config.fetch_limit, Some(12));
    }

    #[test]
    fn environment_overrides_file() {
        let file = CliConfig {
            endpoint: Some("https://file.example.com/posts".to_string()),
            sync_interval_secs: Some(90),
            ..CliConfig::default()
        };

        let config = file
            .to_sync_config(|name| match name {
                "QUOTEDAY_ENDPOINT" => Some("https://env.example.com/posts".to_string()),
                "QUOTEDAY_SYNC_INTERVAL_SECS" => Some("15".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.endpoint, "https://env.example.com/posts");
        assert_eq!(config.sync_interval, Some(Duration::from_secs(15)));
    }

    #[test]
    fn set_endpoint_rejects_missing_scheme() {
        let mut config = CliConfig::default();
        assert!(config.set_endpoint("api.example.com".to_string()).is_err());
        assert_eq!(config.endpoint, None);
        assert_eq!(
            config
                .set_endpoint("https://api.example.com/".to_string())
                .unwrap(),
            "https://api.example.com"
        );
    }
}
