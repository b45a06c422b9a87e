//! Import subcommand for the caskbook CLI.
//!
//! Turns command-line flags into the [`ImportOptions`] value that
//! parameterizes the import engine. Flags layer over a base options
//! value: the default, or a validated `--options` document.

use super::CategoryArg;
use crate::import::{ImportMode, ImportOptions};
use crate::types::Category;
use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Conflict policy, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Replace,
    Add,
    Merge,
}

impl ModeArg {
    pub fn to_mode(self) -> ImportMode {
        match self {
            ModeArg::Replace => ImportMode::Replace,
            ModeArg::Add => ImportMode::Add,
            ModeArg::Merge => ImportMode::Merge,
        }
    }
}

/// Arguments for the import subcommand
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the snapshot file to import (.json or .json.gz)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Path to a JSON import-options document
    ///
    /// The document carries the eight per-category fields
    /// (importBottles, bottlesMode, ...). It is validated before use;
    /// the remaining flags below layer on top of it.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Import only these categories, excluding all others
    #[arg(long, value_enum, value_delimiter = ',', conflicts_with = "skip")]
    pub only: Vec<CategoryArg>,

    /// Exclude these categories
    #[arg(long, value_enum, value_delimiter = ',')]
    pub skip: Vec<CategoryArg>,

    /// Conflict policy applied to every included category
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Per-category policy override, e.g. --category-mode bottles=merge
    #[arg(long, value_name = "CAT=MODE", value_delimiter = ',')]
    pub category_mode: Vec<String>,

    /// Preview the import without modifying the database
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    /// Check if the snapshot file is gzipped based on extension.
    /// (Loading sniffs the magic bytes anyway; this is for messaging.)
    pub fn is_gzipped(&self) -> bool {
        self.file.extension().is_some_and(|ext| ext == "gz")
    }

    /// Layer the flag overrides over a base options value.
    pub fn apply_overrides(&self, base: ImportOptions) -> Result<ImportOptions> {
        let mut options = base;

        if !self.only.is_empty() {
            for category in Category::ALL {
                let keep = self.only.iter().any(|arg| arg.to_category() == category);
                options.set_included(category, keep);
            }
        }

        for arg in &self.skip {
            options.set_included(arg.to_category(), false);
        }

        if let Some(mode) = self.mode {
            for category in Category::ALL {
                options.set_mode(category, mode.to_mode());
            }
        }

        for entry in &self.category_mode {
            let (category, mode) = parse_category_mode(entry)?;
            options.set_mode(category, mode);
        }

        Ok(options)
    }
}

/// Parse a `category=mode` override.
fn parse_category_mode(entry: &str) -> Result<(Category, ImportMode)> {
    let (category, mode) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("expected CATEGORY=MODE, got '{}'", entry))?;

    let category = Category::parse(category.trim())
        .ok_or_else(|| anyhow!("unknown category '{}'", category.trim()))?;
    let mode = ImportMode::from_str(mode.trim())
        .ok_or_else(|| anyhow!("unknown mode '{}': expected replace, add or merge", mode.trim()))?;

    Ok((category, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: &str) -> ImportArgs {
        ImportArgs {
            file: PathBuf::from(file),
            options: None,
            only: vec![],
            skip: vec![],
            mode: None,
            category_mode: vec![],
            dry_run: false,
        }
    }

    #[test]
    fn test_is_gzipped() {
        assert!(!args("snapshot.json").is_gzipped());
        assert!(args("snapshot.json.gz").is_gzipped());
    }

    #[test]
    fn test_apply_overrides_only() {
        let mut a = args("s.json");
        a.only = vec![CategoryArg::Bottles, CategoryArg::Brands];

        let options = a.apply_overrides(ImportOptions::default()).unwrap();
        assert!(options.includes(Category::Bottles));
        assert!(options.includes(Category::Brands));
        assert!(!options.includes(Category::Tastings));
        assert!(!options.includes(Category::Wishlist));
    }

    #[test]
    fn test_apply_overrides_skip_and_modes() {
        let mut a = args("s.json");
        a.skip = vec![CategoryArg::Wishlist];
        a.mode = Some(ModeArg::Merge);
        a.category_mode = vec!["tastings=replace".to_string()];

        let options = a.apply_overrides(ImportOptions::default()).unwrap();
        assert!(!options.includes(Category::Wishlist));
        assert_eq!(options.mode(Category::Bottles), ImportMode::Merge);
        assert_eq!(options.mode(Category::Tastings), ImportMode::Replace);
        // skipped category still carries its (inert) mode
        assert_eq!(options.mode(Category::Wishlist), ImportMode::Merge);
    }

    #[test]
    fn test_parse_category_mode_rejects_garbage() {
        assert!(parse_category_mode("bottles").is_err());
        assert!(parse_category_mode("cigars=add").is_err());
        assert!(parse_category_mode("bottles=overwrite").is_err());
        assert_eq!(
            parse_category_mode("bottles=merge").unwrap(),
            (Category::Bottles, ImportMode::Merge)
        );
    }
}
