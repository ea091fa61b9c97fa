//! Configuration management for Kiln.
//!
//! Parses `kiln.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
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
//! - `site.url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override build output directory.
    pub build_dir: Option<PathBuf>,
    /// Override URL prettification.
    pub prettify_urls: Option<bool>,
    /// Override parallel page building.
    pub parallel: Option<bool>,
    /// Override site base URL.
    pub url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kiln.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity configuration.
    pub site: SiteConfig,
    /// Project paths (relative strings from TOML).
    paths: PathsConfigRaw,
    /// Build driver configuration.
    pub build: BuildConfig,
    /// Site-wide template context.
    pub context: toml::Table,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL used to build absolute page URLs. Empty when unset.
    pub url: String,
    /// Emit HTML pages as directory index files.
    pub prettify_urls: bool,
}

/// Raw paths configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    pages_dir: Option<String>,
    templates_dir: Option<String>,
    build_dir: Option<String>,
}

/// Resolved project paths.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Project root (directory holding `kiln.toml`).
    pub project_dir: PathBuf,
    /// Source content directory.
    pub pages_dir: PathBuf,
    /// Shared templates directory.
    pub templates_dir: PathBuf,
    /// Build output directory.
    pub build_dir: PathBuf,
}

/// Build driver configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build pages across a thread pool.
    pub parallel: bool,
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
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
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
    /// Otherwise, searches for `kiln.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(build_dir) = &settings.build_dir {
            self.paths_resolved.build_dir.clone_from(build_dir);
        }
        if let Some(prettify) = settings.prettify_urls {
            self.site.prettify_urls = prettify;
        }
        if let Some(parallel) = settings.parallel {
            self.build.parallel = parallel;
        }
        if let Some(url) = &settings.url {
            self.site.url.clone_from(url);
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            paths: PathsConfigRaw::default(),
            build: BuildConfig::default(),
            context: toml::Table::new(),
            paths_resolved: PathsConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.site.url.is_empty() {
            require_http_url(&self.site.url, "site.url")?;
        }
        if self.paths_resolved.pages_dir == self.paths_resolved.build_dir {
            return Err(ConfigError::Validation(
                "paths.build_dir cannot be the same as paths.pages_dir".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            project_dir: config_dir.to_path_buf(),
            pages_dir: resolve(self.paths.pages_dir.as_deref(), "pages"),
            templates_dir: resolve(self.paths.templates_dir.as_deref(), "templates"),
            build_dir: resolve(self.paths.build_dir.as_deref(), ".build"),
        };
    }
}
