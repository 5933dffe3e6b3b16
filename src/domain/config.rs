//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix gateway, storage, input dialect and logging.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::errors::ConfigError;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads and parses the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.classifier.validate()?;
        Ok(config)
    }

    /// Returns the Matrix settings with the credential resolved, or the fatal
    /// error naming the first missing key.
    pub fn matrix_credentials(&self) -> Result<MatrixCredentials, ConfigError> {
        let matrix = self
            .services
            .matrix
            .as_ref()
            .ok_or(ConfigError::Missing("services.matrix"))?;

        if matrix.homeserver.trim().is_empty() {
            return Err(ConfigError::Missing("services.matrix.homeserver"));
        }
        if matrix.username.trim().is_empty() {
            return Err(ConfigError::Missing("services.matrix.username"));
        }

        let password = match (&matrix.password, &matrix.password_env) {
            (Some(p), _) if !p.is_empty() => p.clone(),
            (_, Some(var)) => std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("services.matrix.password_env"))?,
            _ => return Err(ConfigError::Missing("services.matrix.password")),
        };

        Ok(MatrixCredentials {
            homeserver: matrix.homeserver.clone(),
            username: matrix.username.clone(),
            password,
        })
    }

    /// Whether the bot may join and answer in `room_id`. An empty `rooms` list allows all.
    pub fn allows_room(&self, room_id: &str) -> bool {
        self.services
            .matrix
            .as_ref()
            .is_none_or(|m| m.rooms.is_empty() || m.rooms.iter().any(|r| r == room_id))
    }
}

/// Configuration for the connected chat services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub matrix: Option<MatrixConfig>,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    #[serde(default)]
    pub homeserver: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_env: Option<String>, // e.g. "HAFALAN_MATRIX_PASSWORD"
    #[serde(default)]
    pub display_name: Option<String>,
    /// Rooms the bot answers in. Empty means every joined room.
    #[serde(default)]
    pub rooms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixCredentials {
    pub homeserver: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "data/hafalan.db".to_string()
}

/// What to do with text that matches no command shape.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTextPolicy {
    #[default]
    QueryStudent,
    Reject,
}

/// Where `TambahHafalan` gets its period label from.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    #[default]
    Clock,
    Message,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub unknown_text: UnknownTextPolicy,
    #[serde(default)]
    pub period_source: PeriodSource,
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.delimiter {
            ';' | '-' => Ok(()),
            other => Err(ConfigError::UnsupportedDelimiter(other)),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            unknown_text: UnknownTextPolicy::default(),
            period_source: PeriodSource::default(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default)]
    pub query_order: QueryOrder,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: None,
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}
fn default_log_file() -> String {
    "session.log".to_string()
}
