//! Configuration types.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub ids: IdsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    paths::default_db_path()
}

/// Case style for generated record ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCase {
    /// `peaty-copper-finch` (default)
    #[default]
    Kebab,
    /// `peaty_copper_finch`
    Snake,
    /// `PeatyCopperFinch`
    UpperCamel,
}

impl IdCase {
    pub fn convert(&self, s: &str) -> String {
        use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
        match self {
            IdCase::Kebab => s.to_kebab_case(),
            IdCase::Snake => s.to_snake_case(),
            IdCase::UpperCamel => s.to_upper_camel_case(),
        }
    }
}

/// Record id generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdsConfig {
    /// Number of words in a generated id (default: 3).
    #[serde(default = "default_id_words")]
    pub id_words: u8,

    /// Case style for generated ids.
    #[serde(default)]
    pub id_case: IdCase,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            id_words: default_id_words(),
            id_case: IdCase::default(),
        }
    }
}

fn default_id_words() -> u8 {
    3
}

/// Logging defaults; the CLI `--verbose` flag and the `CASKBOOK_LOG`
/// environment variable both override the configured level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "caskbook=debug".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_case_convert() {
        assert_eq!(IdCase::Kebab.convert("smoky-old-cask"), "smoky-old-cask");
        assert_eq!(IdCase::Snake.convert("smoky-old-cask"), "smoky_old_cask");
        assert_eq!(IdCase::UpperCamel.convert("smoky-old-cask"), "SmokyOldCask");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ids.id_words, 3);
        assert_eq!(config.ids.id_case, IdCase::Kebab);
        assert_eq!(config.logging.level, "info");
    }
}
