//! Configuration management for the KB viewer.
//!
//! Parses `kb.toml` with serde and discovers it in the current directory or
//! any parent. Relative paths resolve against the directory holding the
//! file. Command-line overrides are applied last via [`CliSettings`].
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 7979
//!
//! [content]
//! data_dir = "data"
//! metadata_file = "metadata.json"
//!
//! [store]
//! enabled = true
//! dir = ".kb/store"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `server.host`, `content.data_dir` and `store.dir` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kb.toml";

/// Command-line values that override the configuration file.
///
/// Only `Some` fields override.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Override the content root.
    pub data_dir: Option<PathBuf>,
    /// Override whether progress is persisted to disk.
    pub store_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    content: ContentConfigRaw,
    store: StoreConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file, if one was loaded.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    data_dir: Option<String>,
    metadata_file: Option<String>,
}

/// Where documents are read from.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Root for every document fetch.
    pub data_dir: PathBuf,
    /// Metadata document path, relative to `data_dir`.
    pub metadata_file: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Where progress and bookmarks are persisted.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// When false, state lives in memory and is lost on exit.
    pub enabled: bool,
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A `${VAR}` reference could not be expanded.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Document paths must stay inside the content root.
fn require_relative(value: &str, field: &str) -> Result<(), ConfigError> {
    let escapes = Path::new(value)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path inside content.data_dir"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply `cli_settings`.
    ///
    /// With `config_path`, that file must exist. Otherwise `kb.toml` is
    /// searched for upwards from the current directory, and defaults
    /// relative to the current directory are used if none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` does not exist, or if
    /// the file cannot be read, parsed, expanded or validated.
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
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(data_dir) = &settings.data_dir {
            self.content_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(enabled) = settings.store_enabled {
            self.store_resolved.enabled = enabled;
        }
    }

    /// Search for `kb.toml` in the current directory and its parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            store: StoreConfigRaw::default(),
            content_resolved: ContentConfig::default(),
            store_resolved: StoreConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Check the loaded values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty host, port 0, or an
    /// empty or escaping metadata file path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        let metadata_file = &self.content_resolved.metadata_file;
        require_non_empty(metadata_file, "content.metadata_file")?;
        require_relative(metadata_file, "content.metadata_file")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(dir) = &self.content.data_dir {
            self.content.data_dir = Some(expand::expand_env(dir, "content.data_dir")?);
        }
        if let Some(dir) = &self.store.dir {
            self.store.dir = Some(expand::expand_env(dir, "store.dir")?);
        }
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_resolved = ContentConfig {
            data_dir: config_dir.join(self.content.data_dir.as_deref().unwrap_or("data")),
            metadata_file: self
                .content
                .metadata_file
                .clone()
                .unwrap_or_else(|| "metadata.json".to_owned()),
        };
        self.store_resolved = StoreConfig {
            enabled: self.store.enabled.unwrap_or(true),
            dir: config_dir.join(self.store.dir.as_deref().unwrap_or(".kb/store")),
        };
    }
}
