//! Configuration module for Xuckoo.
//!
//! Settings are layered: built-in defaults, then an optional file (TOML, YAML,
//! JSON), then environment variables. The result is validated before use.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::config::ConfigError;

pub mod table;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default configuration location
const DEFAULT_CONFIG_PATH: &str = "xuckoo.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "XUCKOO";

/// Initialize the global configuration from the default location.
///
/// A missing default file is not an error: built-in defaults are used instead.
///
/// # Returns
///
/// * `Ok(())` if the configuration was successfully initialized
/// * `Err(ConfigError)` if the file exists but cannot be loaded
pub fn init_default_config() -> ConfigResult<()> {
    let loader = ConfigLoader::new(Some(DEFAULT_CONFIG_PATH), ENV_PREFIX);

    let config = match loader.load() {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => {
            tracing::debug!(
                "Default configuration file not found at: {}",
                DEFAULT_CONFIG_PATH
            );
            ConfigLoader::new(None::<&Path>, ENV_PREFIX).load()?
        }
        Err(e) => return Err(e),
    };

    init_global_config(config);
    Ok(())
}

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for Xuckoo.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct XuckooConfig {
    /// Hash table configuration
    pub table: table::TableConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl Validate for XuckooConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.table.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            source_location: false,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for Xuckoo.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from a file and environment variables.
    ///
    /// Environment variables take the form `PREFIX__SECTION__KEY`, for
    /// example `XUCKOO__TABLE__MAX_TABLE_SIZE`.
    pub fn load(&self) -> ConfigResult<XuckooConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&XuckooConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "Unsupported file extension for: {path:?}"
                    )))
                }
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            other => ConfigError::ParseError(other.to_string()),
        })?;

        let xuckoo_config: XuckooConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        xuckoo_config.validate()?;

        Ok(xuckoo_config)
    }
}

/// Global configuration accessor.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    config: Arc<XuckooConfig>,
}

impl GlobalConfig {
    /// Creates a new global configuration.
    pub fn new(config: XuckooConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration.
    pub fn get(&self) -> &XuckooConfig {
        &self.config
    }
}

/// Global configuration, set once at startup.
static GLOBAL_CONFIG: OnceCell<GlobalConfig> = OnceCell::new();

/// Initialize the global configuration.
///
/// # Arguments
///
/// * `config` - The configuration to set as global
pub fn init_global_config(config: XuckooConfig) {
    if GLOBAL_CONFIG.set(GlobalConfig::new(config)).is_err() {
        tracing::warn!("Global configuration was already initialized, ignoring new configuration");
    }
}

/// Get the global configuration.
///
/// Falls back to built-in defaults when nothing was initialized.
pub fn get_global_config() -> GlobalConfig {
    GLOBAL_CONFIG
        .get_or_init(|| GlobalConfig::new(XuckooConfig::default()))
        .clone()
}
