//! Filesystem locations for caskbook data.

use std::path::{Path, PathBuf};

/// Name of the per-user data directory under `$HOME`.
pub const DATA_DIR_NAME: &str = ".caskbook";

/// Per-user data directory (`~/.caskbook`). Falls back to a relative
/// directory when no home directory can be determined.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

/// Default database location.
pub fn default_db_path() -> PathBuf {
    data_dir().join("caskbook.db")
}

/// Per-user config file.
pub fn user_config_path() -> PathBuf {
    data_dir().join("config.yaml")
}

/// Per-project config file, resolved against the working directory.
pub fn project_config_path() -> PathBuf {
    PathBuf::from("caskbook.yaml")
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path_is_under_data_dir() {
        assert!(default_db_path().starts_with(data_dir()));
    }

    #[test]
    fn test_ensure_parent_dir_accepts_bare_filename() {
        // No parent to create; must not error.
        ensure_parent_dir(Path::new("caskbook.db")).unwrap();
    }
}
