//! Configuration loading and tier merging.

use super::types::Config;
use crate::paths;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Assembles a [`Config`] from the configured tiers.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration. An explicit path (CLI `--config` or
    /// `CASKBOOK_CONFIG_PATH`) replaces the user/project file tiers;
    /// otherwise both are merged over the defaults, user first.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let env_path = std::env::var_os("CASKBOOK_CONFIG_PATH").map(PathBuf::from);
        let explicit = explicit.map(Path::to_path_buf).or(env_path);

        let mut merged = serde_json::to_value(Config::default())?;

        match explicit {
            Some(path) => {
                merged = merge_values(merged, read_yaml_value(&path)?);
            }
            None => {
                for path in [paths::user_config_path(), paths::project_config_path()] {
                    if path.exists() {
                        merged = merge_values(merged, read_yaml_value(&path)?);
                    }
                }
            }
        }

        if let Ok(db_path) = std::env::var("CASKBOOK_DB_PATH") {
            merged["database"]["path"] = Value::String(db_path);
        }

        serde_json::from_value(merged).context("configuration did not match the expected shape")
    }

    /// Parse a single YAML document over the defaults. Used by tests and
    /// by the file tiers above.
    pub fn from_yaml_str(yaml: &str) -> Result<Config> {
        let overlay: Value = serde_yaml::from_str(yaml).context("config is not valid YAML")?;
        let merged = merge_values(serde_json::to_value(Config::default())?, overlay);
        serde_json::from_value(merged).context("configuration did not match the expected shape")
    }
}

fn read_yaml_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("config file {} is not valid YAML", path.display()))
}

/// Merge `overlay` onto `base`, field by field.
///
/// Maps merge recursively; any other overlay value replaces the base
/// value outright. An explicit null in the overlay leaves the base value
/// in place, so a tier can mention a key without pinning it.
fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.remove(&key) {
                    Some(base_value) => {
                        base_map.insert(key, merge_values(base_value, overlay_value));
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdCase;
    use serde_json::json;

    #[test]
    fn test_merge_overrides_scalars() {
        let merged = merge_values(json!({"a": 1, "b": 2}), json!({"b": 9, "c": 3}));
        assert_eq!(merged, json!({"a": 1, "b": 9, "c": 3}));
    }

    #[test]
    fn test_merge_recurses_into_maps() {
        let merged = merge_values(
            json!({"ids": {"id_words": 3, "id_case": "kebab"}}),
            json!({"ids": {"id_words": 2}}),
        );
        assert_eq!(merged, json!({"ids": {"id_words": 2, "id_case": "kebab"}}));
    }

    #[test]
    fn test_merge_null_keeps_base() {
        let merged = merge_values(json!({"a": 1}), json!({"a": null}));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn test_merge_replaces_arrays() {
        let merged = merge_values(json!({"xs": [1, 2, 3]}), json!({"xs": [4]}));
        assert_eq!(merged, json!({"xs": [4]}));
    }

    #[test]
    fn test_from_yaml_str_partial_override() {
        let config = ConfigLoader::from_yaml_str(
            "ids:\n  id_words: 2\n  id_case: upper_camel\n",
        )
        .unwrap();
        assert_eq!(config.ids.id_words, 2);
        assert_eq!(config.ids.id_case, IdCase::UpperCamel);
        // untouched section keeps its default
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_yaml_str_empty_is_all_defaults() {
        let config = ConfigLoader::from_yaml_str("{}").unwrap();
        assert_eq!(config.ids.id_words, 3);
    }
}
