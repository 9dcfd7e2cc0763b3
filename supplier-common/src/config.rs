//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority, applied by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the service logs a warning and
//! starts on environment + defaults. A TOML file that exists but fails
//! to parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name under the platform config/data folders
pub const APP_DIR_NAME: &str = "supplier-compliance";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DB_NAME: &str = "suppliers";
pub const DEFAULT_GENAI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENAI_TIMEOUT_SECS: u64 = 60;

/// Recognized environment variables
pub mod env_keys {
    pub const BIND_ADDR: &str = "SUPPLIER_BIND_ADDR";
    pub const ROOT_FOLDER: &str = "SUPPLIER_ROOT_FOLDER";
    pub const DATABASE_URL: &str = "SUPPLIER_DATABASE_URL";
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    pub const GENAI_MODEL: &str = "SUPPLIER_GENAI_MODEL";
    pub const GENAI_BASE_URL: &str = "SUPPLIER_GENAI_BASE_URL";
    pub const GENAI_TIMEOUT_SECS: &str = "SUPPLIER_GENAI_TIMEOUT_SECS";
}

/// On-disk TOML configuration
///
/// Every field is optional; absent values fall through to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub database: TomlDatabaseSection,
    #[serde(default)]
    pub genai: TomlGenAiSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlDatabaseSection {
    pub url: Option<String>,
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlGenAiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Relational store settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Explicit connection URL; overrides `root_folder` + `name`
    pub url: Option<String>,
    pub root_folder: PathBuf,
    pub name: String,
    /// Network store settings. Recorded for completeness; the embedded
    /// SQLite store does not use them.
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl DatabaseConfig {
    /// Path of the database file under the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(format!("{}.db", self.name))
    }

    /// Connection URL handed to the SQLite driver
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}", self.database_path().display()),
        }
    }

    /// Names of network settings that were supplied but have no effect
    pub fn unused_network_settings(&self) -> Vec<&'static str> {
        let mut unused = Vec::new();
        if self.host.is_some() {
            unused.push("host");
        }
        if self.port.is_some() {
            unused.push("port");
        }
        if self.user.is_some() {
            unused.push("user");
        }
        if self.password.is_some() {
            unused.push("password");
        }
        unused
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("root_folder", &self.root_folder)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// External text-generation API settings
#[derive(Clone)]
pub struct GenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub database: DatabaseConfig,
    pub genai: GenAiConfig,
}

impl ServiceConfig {
    /// Load configuration from the process environment and a TOML file
    ///
    /// `config_path` selects an explicit file; when `None` the platform
    /// default location is tried.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let toml_config = match config_path {
            Some(path) => Some(load_toml_config(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(load_toml_config(&path)?),
                Some(path) => {
                    warn!(
                        "No config file at {}; using environment and defaults",
                        path.display()
                    );
                    None
                }
                None => None,
            },
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(toml_config.unwrap_or_default(), |key| env.get(key).cloned())
    }

    /// Resolve configuration from a TOML layer and an environment lookup
    pub fn from_sources<F>(toml_config: TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let bind_addr = env(env_keys::BIND_ADDR)
            .or(toml_config.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let root_folder = env(env_keys::ROOT_FOLDER)
            .map(PathBuf::from)
            .or(toml_config.root_folder)
            .unwrap_or_else(default_root_folder);

        let db = toml_config.database;
        let port = match env(env_keys::DB_PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                Error::Config(format!("{} must be a port number: {}", env_keys::DB_PORT, e))
            })?),
            None => db.port,
        };

        let database = DatabaseConfig {
            url: env(env_keys::DATABASE_URL).or(db.url),
            root_folder,
            name: env(env_keys::DB_NAME)
                .or(db.name)
                .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            host: env(env_keys::DB_HOST).or(db.host),
            port,
            user: env(env_keys::DB_USER).or(db.user),
            password: env(env_keys::DB_PASSWORD).or(db.password),
        };

        let ai = toml_config.genai;
        let timeout_secs = match env(env_keys::GENAI_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!(
                    "{} must be a whole number of seconds: {}",
                    env_keys::GENAI_TIMEOUT_SECS,
                    e
                ))
            })?,
            None => ai.timeout_secs.unwrap_or(DEFAULT_GENAI_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(Error::Config(
                "GenAI timeout must be at least one second".to_string(),
            ));
        }

        let genai = GenAiConfig {
            api_key: env(env_keys::GOOGLE_API_KEY).or(ai.api_key),
            model: env(env_keys::GENAI_MODEL)
                .or(ai.model)
                .unwrap_or_else(|| DEFAULT_GENAI_MODEL.to_string()),
            base_url: env(env_keys::GENAI_BASE_URL)
                .or(ai.base_url)
                .unwrap_or_else(|| DEFAULT_GENAI_BASE_URL.to_string()),
            timeout_secs,
        };

        Ok(Self {
            bind_addr,
            database,
            genai,
        })
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default root folder for the database file
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./supplier_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config = ServiceConfig::from_sources(TomlConfig::default(), env_from(&[])).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.database.name, DEFAULT_DB_NAME);
        assert!(config.database.url.is_none());
        assert_eq!(config.genai.model, DEFAULT_GENAI_MODEL);
        assert_eq!(config.genai.base_url, DEFAULT_GENAI_BASE_URL);
        assert_eq!(config.genai.timeout_secs, DEFAULT_GENAI_TIMEOUT_SECS);
        assert!(config.genai.api_key.is_none());
    }

    #[test]
    fn test_env_overrides_toml() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:9000"

            [database]
            name = "from_toml"

            [genai]
            api_key = "toml-key"
            timeout_secs = 10
            "#,
        )
        .unwrap();

        let config = ServiceConfig::from_sources(
            toml_config,
            env_from(&[("DB_NAME", "from_env"), ("GOOGLE_API_KEY", "env-key")]),
        )
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database.name, "from_env");
        assert_eq!(config.genai.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.genai.timeout_secs, 10);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("GOOGLE_API_KEY", "   "), ("DB_NAME", "")]),
        )
        .unwrap();

        assert!(config.genai.api_key.is_none());
        assert_eq!(config.database.name, DEFAULT_DB_NAME);
    }

    #[test]
    fn test_database_path_and_url() {
        let config = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("SUPPLIER_ROOT_FOLDER", "/tmp/scs"), ("DB_NAME", "audit")]),
        )
        .unwrap();

        assert_eq!(config.database.database_path(), PathBuf::from("/tmp/scs/audit.db"));
        assert_eq!(config.database.connection_url(), "sqlite:///tmp/scs/audit.db");
    }

    #[test]
    fn test_explicit_url_wins() {
        let config = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("SUPPLIER_DATABASE_URL", "sqlite::memory:")]),
        )
        .unwrap();

        assert_eq!(config.database.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result =
            ServiceConfig::from_sources(TomlConfig::default(), env_from(&[("DB_PORT", "five")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("SUPPLIER_GENAI_TIMEOUT_SECS", "0")]),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_network_settings_reported_unused() {
        let config = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("DB_HOST", "db.internal"), ("DB_PORT", "5432")]),
        )
        .unwrap();

        assert_eq!(config.database.unused_network_settings(), vec!["host", "port"]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServiceConfig::from_sources(
            TomlConfig::default(),
            env_from(&[("GOOGLE_API_KEY", "sk-secret"), ("DB_PASSWORD", "hunter2")]),
        )
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
