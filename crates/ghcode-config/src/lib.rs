//! Configuration management for ghcode.
//!
//! Parses `ghcode.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [fetch]
//! timeout_secs = 10
//! max_redirects = 3
//!
//! [render]
//! highlight = false
//!
//! [variables]
//! snippet = "rust-lang/rust/blob/master/README.md#L1-L10"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override maximum number of redirects.
    pub max_redirects: Option<u32>,
    /// Override syntax highlighting flag.
    pub highlight: Option<bool>,
    /// Extra template variables (merged over the `[variables]` table).
    pub variables: Vec<(String, String)>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ghcode.toml";

/// Upper bound accepted for `fetch.max_redirects`.
const MAX_REDIRECTS_LIMIT: u32 = 20;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content fetching configuration.
    pub fetch: FetchConfig,
    /// Block rendering configuration.
    pub render: RenderConfig,
    /// Template variables available to tag markup.
    pub variables: BTreeMap<String, String>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Content fetching configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Timeout in seconds for one fetch, shared by all of its redirect hops.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed before giving up.
    pub max_redirects: u32,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl FetchConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
            user_agent: concat!("ghcode/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Block rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether to highlight code server-side.
    ///
    /// When disabled, code is only escaped and tagged with its language class.
    pub highlight: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { highlight: true }
    }
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ghcode.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and take precedence over config
    /// file values. The merged result is validated again.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(timeout_secs) = settings.timeout_secs {
            self.fetch.timeout_secs = timeout_secs;
        }
        if let Some(max_redirects) = settings.max_redirects {
            self.fetch.max_redirects = max_redirects;
        }
        if let Some(highlight) = settings.highlight {
            self.render.highlight = highlight;
        }
        for (name, value) in &settings.variables {
            self.variables.insert(name.clone(), value.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.fetch.max_redirects > MAX_REDIRECTS_LIMIT {
            return Err(ConfigError::Validation(format!(
                "fetch.max_redirects cannot exceed {MAX_REDIRECTS_LIMIT}"
            )));
        }
        require_non_empty(&self.fetch.user_agent, "fetch.user_agent")?;
        for name in self.variables.keys() {
            require_non_empty(name, "variables key")?;
        }
        Ok(())
    }
}
