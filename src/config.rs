use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gen_ai: GenAiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }
}

// ============================================================================
// GenAiConfig
// ============================================================================

/// Process-wide defaults for LLM client construction. Injected into the
/// factory at startup rather than read from ambient state.
#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    /// Kill switch for all generative AI features. When set, client
    /// construction fails before any provider lookup.
    #[serde(default)]
    pub disabled: bool,
    /// Request timeout applied to constructed clients.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Sampling temperature used when neither the caller nor the persona
    /// sets one.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Extra HTTP headers attached to every completion request.
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            request_timeout_seconds: default_request_timeout(),
            temperature: default_temperature(),
            extra_headers: HashMap::new(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.0
}

// ============================================================================
// StoreConfig
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_providers_path")]
    pub providers_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            providers_path: default_providers_path(),
        }
    }
}

fn default_providers_path() -> PathBuf {
    PathBuf::from(".sibyl/providers.json")
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.gen_ai.disabled);
        assert_eq!(config.gen_ai.request_timeout_seconds, 60);
        assert_eq!(config.gen_ai.temperature, 0.0);
        assert!(config.gen_ai.extra_headers.is_empty());
        assert_eq!(
            config.store.providers_path,
            PathBuf::from(".sibyl/providers.json")
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let tmp_dir = TempDir::new().unwrap();
        let missing_path = tmp_dir.path().join("missing-config.yaml");
        let config = Config::load(missing_path.to_str().unwrap()).await.unwrap();
        assert!(!config.gen_ai.disabled);
        assert_eq!(config.gen_ai.request_timeout_seconds, 60);
    }

    #[tokio::test]
    async fn test_load_valid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gen_ai:
  disabled: true
  request_timeout_seconds: 120
  temperature: 0.7
  extra_headers:
    x-team: "search"
store:
  providers_path: "/var/lib/sibyl/providers.json"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).await.unwrap();
        assert!(config.gen_ai.disabled);
        assert_eq!(config.gen_ai.request_timeout_seconds, 120);
        assert_eq!(config.gen_ai.temperature, 0.7);
        assert_eq!(
            config.gen_ai.extra_headers.get("x-team"),
            Some(&"search".to_string())
        );
        assert_eq!(
            config.store.providers_path,
            PathBuf::from("/var/lib/sibyl/providers.json")
        );
    }

    #[tokio::test]
    async fn test_load_partial_yaml_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gen_ai:
  temperature: 0.2
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).await.unwrap();
        assert!(!config.gen_ai.disabled); // default
        assert_eq!(config.gen_ai.request_timeout_seconds, 60); // default
        assert_eq!(config.gen_ai.temperature, 0.2);
        assert_eq!(
            config.store.providers_path,
            PathBuf::from(".sibyl/providers.json")
        ); // default
    }

    #[tokio::test]
    async fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(file.path().to_str().unwrap()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_config_error_display() {
        let io_error = ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "test",
        ));
        assert!(io_error.to_string().contains("failed to read config file"));
    }
}
