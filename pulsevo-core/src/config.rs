use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PulsevoConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Which natural-language endpoint the backend exposes.
///
/// Older backends only serve `POST /chat` with a `query` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryEndpoint {
    #[default]
    Query,
    Chat,
}

impl QueryEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            QueryEndpoint::Query => "/query",
            QueryEndpoint::Chat => "/chat",
        }
    }
}

impl std::str::FromStr for QueryEndpoint {
    type Err = ConfigLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query" => Ok(QueryEndpoint::Query),
            "chat" => Ok(QueryEndpoint::Chat),
            other => Err(ConfigLoadError::InvalidValue {
                key: "api.query_endpoint".to_string(),
                message: format!("Unknown endpoint '{}'. Must be 'query' or 'chat'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default)]
    pub query_endpoint: QueryEndpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default)]
    pub compact: bool,
}

fn default_base_url() -> String {
    "http://localhost:5001/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    2000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            query_endpoint: QueryEndpoint::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            compact: false,
        }
    }
}

impl PulsevoConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PULSEVO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut pulsevo_config: PulsevoConfig = config.try_deserialize()?;

        if let Ok(url) = std::env::var("PULSEVO_API_URL") {
            pulsevo_config.api.base_url = url;
        }

        if let Ok(level) = std::env::var("PULSEVO_LOG_LEVEL") {
            pulsevo_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            pulsevo_config.logging.level = level;
        }

        if let Ok(endpoint) = std::env::var("PULSEVO_QUERY_ENDPOINT") {
            pulsevo_config.api.query_endpoint = endpoint.parse()?;
        }

        pulsevo_config.validate()?;

        Ok(pulsevo_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigLoadError::MissingRequired("api.base_url".to_string()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "Must be an HTTP URL starting with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn api_base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Render this configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError::InvalidValue {
            key: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Write this configuration to `path`, refusing to clobber unless `force`.
    pub fn write_to(&self, path: &std::path::Path, force: bool) -> Result<(), ConfigLoadError> {
        if path.exists() && !force {
            return Err(ConfigLoadError::InvalidValue {
                key: "config".to_string(),
                message: format!("{} already exists", path.display()),
            });
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("pulsevo.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pulsevo").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pulsevo").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    for path in get_dotenv_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pulsevo").join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pulsevo"))
}

/// Default location used by `pulsevo config init`.
pub fn default_config_file() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.toml"))
}
