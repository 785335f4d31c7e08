//! Configuration loading and typed config structures for the store.
//!
//! The configuration lives in `tourney-config.yaml` next to the binary's
//! working directory. Every section is optional; a missing file or an empty
//! document yields the defaults below.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tourney_db::STORAGE_KEY;

use crate::credentials::CredentialScheme;
use crate::locale::Locale;

/// Environment variable overriding `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "TOURNEY_DATA_DIR";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "TOURNEY_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Where and how the snapshot is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential hashing.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Language of result messages.
    #[serde(default)]
    pub locale: Locale,

    /// Initial data for a fresh install.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TOURNEY_DATA_DIR` overrides `storage.data_dir`
    /// - `TOURNEY_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override settings from `lookup`, which maps an environment variable
    /// name to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = val;
        }
    }
}

/// Snapshot persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key; the snapshot is written to `<data_dir>/<key>.json`.
    #[serde(default = "default_key")]
    pub key: String,

    /// Whether the logged-in user survives a restart.
    #[serde(default = "default_true")]
    pub persist_session: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
            persist_session: true,
        }
    }
}

/// Credential hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialsConfig {
    /// Hashing scheme for stored credentials.
    #[serde(default)]
    pub scheme: CredentialScheme,
}

/// Initial data for a fresh install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// JSON array of tournaments to seed. None seeds no tournaments.
    #[serde(default)]
    pub tournaments_file: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_key() -> String {
    STORAGE_KEY.to_owned()
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.storage.key, "ff_tourney_v1");
        assert!(config.storage.persist_session);
        assert_eq!(config.credentials.scheme, CredentialScheme::Argon2);
        assert_eq!(config.locale, Locale::Bn);
        assert!(config.seed.tournaments_file.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
storage:
  data_dir: "/var/lib/tourney"
  key: "ff_tourney_test"
  persist_session: false

credentials:
  scheme: plaintext

locale: en

seed:
  tournaments_file: "seed/tournaments.json"

logging:
  level: "debug"
  json: true
"#;

        let config: Result<StoreConfig, _> = serde_yml::from_str(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/tourney"));
        assert_eq!(config.storage.key, "ff_tourney_test");
        assert!(!config.storage.persist_session);
        assert_eq!(config.credentials.scheme, CredentialScheme::Plaintext);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(
            config.seed.tournaments_file,
            Some(PathBuf::from("seed/tournaments.json"))
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "locale: en\n";
        let config: Result<StoreConfig, _> = serde_yml::from_str(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.locale, Locale::En);
        // Everything else uses defaults
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.credentials.scheme, CredentialScheme::Argon2);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = StoreConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn unknown_scheme_rejected() {
        let config = StoreConfig::parse("credentials:\n  scheme: md5\n");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_yaml_values() {
        let mut config = StoreConfig::default();
        config.apply_overrides(|key| match key {
            ENV_DATA_DIR => Some("/tmp/tourney".to_owned()),
            ENV_LOG_LEVEL => Some("trace".to_owned()),
            _ => None,
        });
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/tourney"));
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tourney-config-does-not-exist.yaml");
        let config = StoreConfig::from_file(&path);
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tourney-config.yaml");
        if path.exists() {
            let config = StoreConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
