use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::FileStore;

/// Base URL of the task board REST API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

const CONFIG_HEADER: &str = r#"# Taskboard Configuration File
# Schema: https://json-schema.org/draft-07/schema#
# Generate the schema with `taskboard config schema`

"#;

/// Configuration for the taskboard client
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub theme: ThemeSettings,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the REST API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Where the theme is persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeBackend {
    /// Local key/value storage on this machine
    #[default]
    Local,
    /// The `/theme/` endpoint of the API
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct ThemeSettings {
    #[serde(default)]
    pub backend: ThemeBackend,

    /// Directory for locally stored state (defaults to ~/.local/share/taskboard)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UiConfig {
    /// Ask for confirmation before deleting tasks
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_delete: default_confirm_delete(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_confirm_delete() -> bool {
    true
}

impl Config {
    /// Load configuration from `TASKBOARD_CONFIG` or the default location.
    ///
    /// A commented default file is written on first run.
    pub fn load() -> Result<Self> {
        if let Ok(custom_path) = std::env::var("TASKBOARD_CONFIG") {
            return Self::load_from(&PathBuf::from(custom_path));
        }

        let config_path = Self::default_path()?;
        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write configuration, with the schema header, to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, format!("{}{}", CONFIG_HEADER, toml_str))
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Path of the config file actually in use
    pub fn resolved_path() -> Result<PathBuf> {
        match std::env::var("TASKBOARD_CONFIG") {
            Ok(custom_path) => Ok(PathBuf::from(custom_path)),
            Err(_) => Self::default_path(),
        }
    }

    /// `~/.config/taskboard/config.toml`, regardless of platform
    pub fn default_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home_dir.join(".config").join("taskboard").join("config.toml"))
    }

    /// Directory for the local theme store
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.theme.storage_dir {
            return Ok(expand_tilde(dir));
        }
        FileStore::default_dir().context("Could not determine home directory")
    }

    /// Generate JSON schema for the configuration
    pub fn generate_schema() -> Result<String> {
        let schema = schemars::schema_for!(Config);
        let json_schema =
            serde_json::to_string_pretty(&schema).context("Failed to serialize schema to JSON")?;
        Ok(json_schema)
    }
}

// Only a leading '~' is expanded
fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskboard").join("config.toml");
        Config::default().save_to(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Taskboard Configuration File"));
        assert!(content.contains("[api]"));
        assert!(content.contains("base_url = \"http://localhost:8000/api\""));
        assert!(content.contains("backend = \"local\""));
        assert!(content.contains("confirm_delete = true"));

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\ntimeout_secs = 5\n\n[theme]\nbackend = \"remote\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout_secs, Some(5));
        assert_eq!(config.theme.backend, ThemeBackend::Remote);
        assert!(config.ui.confirm_delete);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[theme]\nbackend = \"cloud\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_storage_dir_override() {
        let mut config = Config::default();
        config.theme.storage_dir = Some(PathBuf::from("/var/lib/taskboard"));
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/var/lib/taskboard")
        );
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = Config::generate_schema().unwrap();
        assert!(schema.contains("\"api\""));
        assert!(schema.contains("\"confirm_delete\""));
        assert!(schema.contains("remote"));
    }
}
