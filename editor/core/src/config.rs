//! TOML Configuration File Support
//!
//! Configuration for the editor lives at
//! `$XDG_CONFIG_HOME/smart-editor/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! url = "http://localhost:8080/process-sale"
//! timeout_ms = 10000
//!
//! [display]
//! high_confidence_threshold = 0.8
//! currency_symbol = "₹"
//!
//! [logging]
//! level = "info"
//! file = "/tmp/smart-editor.log"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default recognition endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/process-sale";

/// Default confidence above which a chip is styled high-confidence
pub const DEFAULT_HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Default currency symbol for price text
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Structures
// =============================================================================

/// `[service]` section
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceToml {
    /// Recognition endpoint URL
    pub url: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// `[display]` section
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Confidence above which chips are high-confidence
    pub high_confidence_threshold: Option<f64>,
    /// Currency symbol prefixed to prices
    pub currency_symbol: Option<String>,
}

/// `[logging]` section
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: Option<String>,
    /// Log file path
    pub file: Option<PathBuf>,
}

/// Top-level TOML file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditorToml {
    /// Recognition service section
    pub service: ServiceToml,
    /// Display section
    pub display: DisplayToml,
    /// Logging section
    pub logging: LoggingToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Recognition service settings
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    /// Endpoint URL
    pub url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ServiceConfig {
    /// Timeout as a duration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Chip display settings
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    /// Confidence strictly above this is high-confidence
    pub high_confidence_threshold: f64,
    /// Currency symbol
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: DEFAULT_HIGH_CONFIDENCE_THRESHOLD,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Logging settings
#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive
    pub level: String,
    /// Log file path
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: default_log_path(),
        }
    }
}

/// Editor configuration after all sources were applied
#[derive(Clone, Debug)]
pub struct EditorConfig {
    /// Recognition service
    pub service: ServiceConfig,
    /// Chip display
    pub display: DisplayConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl EditorConfig {
    /// Configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service.url must not be empty".to_string(),
            ));
        }
        if self.service.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "service.timeout_ms must be greater than zero".to_string(),
            ));
        }
        let threshold = self.display.high_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ValidationError(format!(
                "display.high_confidence_threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/smart-editor/config.toml` when a config
/// directory is known.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("smart-editor").join("config.toml"))
}

/// Default log file path: state dir, then cache dir, then working dir
#[must_use]
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map_or_else(
            || PathBuf::from("smart-editor.log"),
            |p| p.join("smart-editor").join("smart-editor.log"),
        )
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if the resulting values are out of range. A missing file is not an
/// error.
pub fn load_config() -> Result<EditorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<EditorConfig, ConfigError> {
    let mut config = EditorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: EditorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut EditorConfig, toml: &EditorToml) {
    if let Some(ref url) = toml.service.url {
        config.service.url.clone_from(url);
    }
    if let Some(timeout) = toml.service.timeout_ms {
        config.service.timeout_ms = timeout;
    }

    if let Some(threshold) = toml.display.high_confidence_threshold {
        config.display.high_confidence_threshold = threshold;
    }
    if let Some(ref symbol) = toml.display.currency_symbol {
        config.display.currency_symbol.clone_from(symbol);
    }

    if let Some(ref level) = toml.logging.level {
        config.logging.level.clone_from(level);
    }
    if let Some(ref file) = toml.logging.file {
        config.logging.file.clone_from(file);
    }
}

fn apply_env_config(config: &mut EditorConfig) {
    if let Ok(url) = std::env::var("SMART_EDITOR_SERVICE_URL") {
        config.service.url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("SMART_EDITOR_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.service.timeout_ms = ms;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(threshold) = std::env::var("SMART_EDITOR_CONFIDENCE_THRESHOLD") {
        if let Ok(t) = threshold.parse::<f64>() {
            config.display.high_confidence_threshold = t;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(symbol) = std::env::var("SMART_EDITOR_CURRENCY") {
        config.display.currency_symbol = symbol;
        config.source = ConfigSource::Env;
    }
    if let Ok(level) = std::env::var("SMART_EDITOR_LOG_LEVEL") {
        config.logging.level = level;
        config.source = ConfigSource::Env;
    }
    if let Ok(file) = std::env::var("SMART_EDITOR_LOG_FILE") {
        config.logging.file = PathBuf::from(file);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Command-line overrides, applied after [`load_config`]
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Recognition endpoint override
    pub service_url: Option<String>,
    /// Timeout override (milliseconds)
    pub timeout_ms: Option<u64>,
    /// Confidence threshold override
    pub high_confidence_threshold: Option<f64>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set endpoint override
    #[must_use]
    pub fn with_service_url(mut self, url: String) -> Self {
        self.service_url = Some(url);
        self
    }

    /// Set timeout override
    #[must_use]
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Set confidence threshold override
    #[must_use]
    pub fn with_high_confidence_threshold(mut self, threshold: f64) -> Self {
        self.high_confidence_threshold = Some(threshold);
        self
    }

    /// Set log file override
    #[must_use]
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    /// Apply overrides and re-validate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is out of range.
    pub fn apply(&self, config: &mut EditorConfig) -> Result<(), ConfigError> {
        if self.service_url.is_some()
            || self.timeout_ms.is_some()
            || self.high_confidence_threshold.is_some()
            || self.log_file.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.service_url {
            config.service.url.clone_from(url);
        }
        if let Some(ms) = self.timeout_ms {
            config.service.timeout_ms = ms;
        }
        if let Some(threshold) = self.high_confidence_threshold {
            config.display.high_confidence_threshold = threshold;
        }
        if let Some(ref file) = self.log_file {
            config.logging.file.clone_from(file);
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Environment is process-global; tests touching it run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_config_env_vars() {
        for var in [
            "SMART_EDITOR_SERVICE_URL",
            "SMART_EDITOR_TIMEOUT_MS",
            "SMART_EDITOR_CONFIDENCE_THRESHOLD",
            "SMART_EDITOR_CURRENCY",
            "SMART_EDITOR_LOG_LEVEL",
            "SMART_EDITOR_LOG_FILE",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();

        assert_eq!(config.service.url, DEFAULT_SERVICE_URL);
        assert_eq!(config.service.timeout(), Duration::from_secs(10));
        assert!((config.display.high_confidence_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.display.currency_symbol, "₹");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_config_env_vars();

        let config =
            load_config_from_path(Some(PathBuf::from("/nonexistent/smart-editor.toml"))).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_config_env_vars();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
url = "http://billing.local:9000/process-sale"
timeout_ms = 2500

[display]
high_confidence_threshold = 0.9
currency_symbol = "Rs "
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.service.url, "http://billing.local:9000/process-sale");
        assert_eq!(config.service.timeout_ms, 2500);
        assert!((config.display.high_confidence_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.display.currency_symbol, "Rs ");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_invalid_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_config_env_vars();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[service\nurl = ").unwrap();

        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_config_env_vars();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nhigh_confidence_threshold = 1.5").unwrap();

        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        clear_config_env_vars();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[service]\ntimeout_ms = 2500").unwrap();

        std::env::set_var("SMART_EDITOR_TIMEOUT_MS", "700");
        let config = load_config_from_path(Some(file.path().to_path_buf()));
        clear_config_env_vars();

        let config = config.unwrap();
        assert_eq!(config.service.timeout_ms, 700);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = EditorConfig::default();
        ConfigOverrides::new()
            .with_service_url("http://other:1/x".to_string())
            .with_high_confidence_threshold(0.5)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.service.url, "http://other:1/x");
        assert!((config.display.high_confidence_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.source(), ConfigSource::Cli);

        let err = ConfigOverrides::new()
            .with_timeout_ms(0)
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
