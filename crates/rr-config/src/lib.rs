//! Configuration management for the railroad diagram generator.
//!
//! Parses `rr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories:
//!
//! ```toml
//! [render]
//! url = "https://www.bottlecaps.de/rr/ui"
//! timeout_secs = 60
//!
//! [cache]
//! path = "bnf-digests.json"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.url`
//! - `cache.path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override rendering service URL.
    pub render_url: Option<String>,
    /// Override HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override fingerprint cache file location.
    pub cache_path: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rr.toml";

/// Public Railroad Diagram Generator endpoint.
const DEFAULT_RENDER_URL: &str = "https://www.bottlecaps.de/rr/ui";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upper bound for `render.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Default fingerprint cache filename.
const DEFAULT_CACHE_FILENAME: &str = "bnf-digests.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering service configuration.
    pub render: RenderConfig,
    /// Cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,

    /// Resolved fingerprint cache file (set after loading).
    #[serde(skip)]
    pub cache_path: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Rendering service configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Railroad Diagram Generator endpoint.
    pub url: String,
    /// Overall per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RenderConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RENDER_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw cache configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    path: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.url`").
        field: String,
        /// Error message (e.g., "${`RR_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rr.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.render_url {
            self.render.url.clone_from(url);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.render.timeout_secs = timeout_secs;
        }
        if let Some(cache_path) = &settings.cache_path {
            self.cache_path.clone_from(cache_path);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            render: RenderConfig::default(),
            cache: CacheConfigRaw::default(),
            cache_path: base.join(DEFAULT_CACHE_FILENAME),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.url, "render.url")?;
        require_http_url(&self.render.url, "render.url")?;

        let timeout = self.render.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "render.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "render.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }

        if self.cache_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache.path cannot be empty".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.url = expand::expand_env(&self.render.url, "render.url")?;

        if let Some(ref path) = self.cache.path {
            self.cache.path = Some(expand::expand_env(path, "cache.path")?);
        }

        Ok(())
    }

    /// Resolve the cache path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let path = self.cache.path.as_deref().unwrap_or(DEFAULT_CACHE_FILENAME);
        self.cache_path = config_dir.join(path);
    }
}
