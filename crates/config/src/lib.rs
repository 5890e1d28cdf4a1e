//! Configuration loading, validation, and management for anchorwall.
//!
//! Loads configuration from `~/.anchorwall/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Known content source kinds.
pub const CONTENT_SOURCES: &[&str] = &["http", "file"];

/// Known ledger backends.
pub const LEDGER_BACKENDS: &[&str] = &["file", "memory", "none"];

/// The root configuration structure.
///
/// Maps directly to `~/.anchorwall/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where content metadata comes from
    #[serde(default)]
    pub content: ContentConfig,

    /// Local image cache
    #[serde(default)]
    pub assets: AssetConfig,

    /// Anchor manifest
    #[serde(default)]
    pub anchors: AnchorConfig,

    /// Binding ledger
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Matching behavior
    #[serde(default)]
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// "http" or "file"
    #[serde(default = "default_content_source")]
    pub source: String,

    /// Endpoint returning `{"photos": [...]}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// JSON file used when `source = "file"`
    #[serde(default = "default_content_path")]
    pub path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Interval between passes in `watch` mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_content_source() -> String {
    "file".into()
}
fn default_content_path() -> String {
    AppConfig::config_dir()
        .join("photos.json")
        .to_string_lossy()
        .into_owned()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    30
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: default_content_source(),
            endpoint: None,
            path: default_content_path(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory holding downloaded photos, named after their file names
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Directory holding plaque images, named `<plaque_id>.<plaque_extension>`
    #[serde(default = "default_plaque_dir")]
    pub plaque_dir: String,

    #[serde(default = "default_plaque_extension")]
    pub plaque_extension: String,
}

fn default_cache_dir() -> String {
    AppConfig::config_dir()
        .join("cache")
        .to_string_lossy()
        .into_owned()
}
fn default_plaque_dir() -> String {
    AppConfig::config_dir()
        .join("cache")
        .join("plaques")
        .to_string_lossy()
        .into_owned()
}
fn default_plaque_extension() -> String {
    "png".into()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            plaque_dir: default_plaque_dir(),
            plaque_extension: default_plaque_extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// JSON manifest of placed anchors and what they display
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_manifest() -> String {
    AppConfig::config_dir()
        .join("anchors.json")
        .to_string_lossy()
        .into_owned()
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// "file", "memory", or "none"
    #[serde(default = "default_ledger_backend")]
    pub backend: String,

    #[serde(default = "default_ledger_path")]
    pub path: String,
}

fn default_ledger_backend() -> String {
    "file".into()
}
fn default_ledger_path() -> String {
    AppConfig::config_dir()
        .join("ledger.jsonl")
        .to_string_lossy()
        .into_owned()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: default_ledger_backend(),
            path: default_ledger_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Upper bound for each render sub-operation
    #[serde(default = "default_commit_timeout_ms")]
    pub commit_timeout_ms: u64,

    /// Bind newly placed anchors immediately
    #[serde(default = "default_true")]
    pub auto_match_new_anchors: bool,
}

fn default_commit_timeout_ms() -> u64 {
    2_000
}
fn default_true() -> bool {
    true
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            commit_timeout_ms: default_commit_timeout_ms(),
            auto_match_new_anchors: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.anchorwall/config.toml).
    ///
    /// Environment overrides:
    /// - `ANCHORWALL_ENDPOINT` (switches the content source to http)
    /// - `ANCHORWALL_CACHE_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(endpoint) = std::env::var("ANCHORWALL_ENDPOINT") {
            config.content.source = "http".into();
            config.content.endpoint = Some(endpoint);
        }

        if let Ok(dir) = std::env::var("ANCHORWALL_CACHE_DIR") {
            config.assets.cache_dir = dir;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".anchorwall")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !CONTENT_SOURCES.contains(&self.content.source.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "content.source must be one of {CONTENT_SOURCES:?}, got '{}'",
                self.content.source
            )));
        }

        if self.content.source == "http" && self.content.endpoint.is_none() {
            return Err(ConfigError::ValidationError(
                "content.endpoint is required when content.source = \"http\"".into(),
            ));
        }

        if self.content.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "content.poll_interval_secs must be > 0".into(),
            ));
        }

        if self.matcher.commit_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "matcher.commit_timeout_ms must be > 0".into(),
            ));
        }

        if !LEDGER_BACKENDS.contains(&self.ledger.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "ledger.backend must be one of {LEDGER_BACKENDS:?}, got '{}'",
                self.ledger.backend
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.content.source, "file");
        assert_eq!(config.ledger.backend, "file");
        assert_eq!(config.matcher.commit_timeout_ms, 2_000);
        assert!(config.matcher.auto_match_new_anchors);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.content.source, config.content.source);
        assert_eq!(parsed.assets.plaque_extension, "png");
    }

    #[test]
    fn http_source_requires_endpoint() {
        let mut config = AppConfig::default();
        config.content.source = "http".into();
        assert!(config.validate().is_err());

        config.content.endpoint = Some("http://localhost:8000/photos".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_ledger_backend_rejected() {
        let mut config = AppConfig::default();
        config.ledger.backend = "postgres".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ledger.backend"));
    }

    #[test]
    fn zero_intervals_rejected() {
        let mut config = AppConfig::default();
        config.content.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.matcher.commit_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().content.poll_interval_secs, 30);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
[content]
source = "http"
endpoint = "http://gallery.local:8000/photos"

[matcher]
auto_match_new_anchors = false
"#
        )
        .unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(
            config.content.endpoint.as_deref(),
            Some("http://gallery.local:8000/photos")
        );
        assert_eq!(config.content.timeout_secs, 30);
        assert!(!config.matcher.auto_match_new_anchors);
        assert_eq!(config.ledger.backend, "file");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[content\nsource = ").unwrap();
        let err = AppConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[content]"));
        assert!(toml_str.contains("commit_timeout_ms"));
    }
}
