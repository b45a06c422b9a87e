//! Import configuration model.
//!
//! An [`ImportOptions`] value is the complete description of one import
//! run: for each collection category, whether the category participates,
//! and which conflict policy governs how incoming records combine with
//! existing ones. The value is built by a settings surface (here, the CLI
//! or an options file), validated, and handed to the import engine in
//! `db::import` as an immutable snapshot for the duration of the run.
//!
//! The wire form is a flat JSON object with exactly eight camelCase
//! fields; mode values are the lowercase literals `"replace"`, `"add"`
//! and `"merge"`. Inside the process the mode is a closed enum, so an
//! unrecognized mode can only exist on the untrusted side of
//! [`ImportOptions::from_value`].

use crate::types::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Conflict policy applied when importing a category's records against
/// existing data.
///
/// - `Replace`: existing records in the category are discarded entirely;
///   only incoming records remain.
/// - `Add`: incoming records are appended; existing records are
///   untouched; duplicates are not deduplicated.
/// - `Merge`: incoming and existing records are combined by record id;
///   on conflict the incoming record's fields win, records present only
///   in the existing set are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Replace,
    #[default]
    Add,
    Merge,
}

/// The accepted wire spellings of [`ImportMode`].
pub const MODE_NAMES: &[&str] = &["replace", "add", "merge"];

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Add => "add",
            ImportMode::Merge => "merge",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "replace" => Some(ImportMode::Replace),
            "add" => Some(ImportMode::Add),
            "merge" => Some(ImportMode::Merge),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for an untrusted options document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportOptionsError {
    #[error("invalid mode '{value}' for {field}: expected one of replace, add, merge")]
    InvalidMode { field: &'static str, value: String },

    #[error("{field} must be a boolean")]
    InvalidFlag { field: &'static str },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("import options must be a JSON object")]
    NotAnObject,
}

/// Per-category choices for one import run.
///
/// Flags and modes are independent: a category's mode is inert while its
/// flag is false, but it is still carried, validated and round-tripped
/// unchanged, so toggling the flag back on restores the prior choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportOptions {
    pub import_bottles: bool,
    pub import_tastings: bool,
    pub import_wishlist: bool,
    pub import_brands: bool,
    pub bottles_mode: ImportMode,
    pub tastings_mode: ImportMode,
    pub wishlist_mode: ImportMode,
    pub brands_mode: ImportMode,
}

/// Canonical default: every category included, every mode `add`.
/// A fresh value per call; there is no shared default instance.
impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_bottles: true,
            import_tastings: true,
            import_wishlist: true,
            import_brands: true,
            bottles_mode: ImportMode::Add,
            tastings_mode: ImportMode::Add,
            wishlist_mode: ImportMode::Add,
            brands_mode: ImportMode::Add,
        }
    }
}

/// Wire field names for the inclusion flags, paired with their category.
const FLAG_FIELDS: [(&str, Category); 4] = [
    ("importBottles", Category::Bottles),
    ("importTastings", Category::Tastings),
    ("importWishlist", Category::Wishlist),
    ("importBrands", Category::Brands),
];

/// Wire field names for the mode fields, paired with their category.
const MODE_FIELDS: [(&str, Category); 4] = [
    ("bottlesMode", Category::Bottles),
    ("tastingsMode", Category::Tastings),
    ("wishlistMode", Category::Wishlist),
    ("brandsMode", Category::Brands),
];

impl ImportOptions {
    /// Whether the category participates in this run.
    pub fn includes(&self, category: Category) -> bool {
        match category {
            Category::Bottles => self.import_bottles,
            Category::Tastings => self.import_tastings,
            Category::Wishlist => self.import_wishlist,
            Category::Brands => self.import_brands,
        }
    }

    /// The conflict policy for the category. Meaningful only while
    /// [`includes`](Self::includes) is true, but always present.
    pub fn mode(&self, category: Category) -> ImportMode {
        match category {
            Category::Bottles => self.bottles_mode,
            Category::Tastings => self.tastings_mode,
            Category::Wishlist => self.wishlist_mode,
            Category::Brands => self.brands_mode,
        }
    }

    pub fn set_included(&mut self, category: Category, included: bool) {
        match category {
            Category::Bottles => self.import_bottles = included,
            Category::Tastings => self.import_tastings = included,
            Category::Wishlist => self.import_wishlist = included,
            Category::Brands => self.import_brands = included,
        }
    }

    pub fn set_mode(&mut self, category: Category, mode: ImportMode) {
        match category {
            Category::Bottles => self.bottles_mode = mode,
            Category::Tastings => self.tastings_mode = mode,
            Category::Wishlist => self.wishlist_mode = mode,
            Category::Brands => self.brands_mode = mode,
        }
    }

    /// Builder-style [`set_mode`](Self::set_mode).
    pub fn with_mode(mut self, category: Category, mode: ImportMode) -> Self {
        self.set_mode(category, mode);
        self
    }

    /// Builder-style [`set_included`](Self::set_included).
    pub fn with_included(mut self, category: Category, included: bool) -> Self {
        self.set_included(category, included);
        self
    }

    /// Structurally validate an untrusted options document without
    /// constructing a value. Succeeds iff every flag field is a boolean
    /// and every mode field is one of the three mode literals,
    /// regardless of flag values.
    pub fn validate(value: &Value) -> Result<(), ImportOptionsError> {
        Self::from_value(value).map(|_| ())
    }

    /// Parse an untrusted options document. This is the only path by
    /// which external input becomes an [`ImportOptions`]; after it
    /// succeeds, invalid modes are unrepresentable.
    pub fn from_value(value: &Value) -> Result<Self, ImportOptionsError> {
        let obj = value.as_object().ok_or(ImportOptionsError::NotAnObject)?;

        let mut options = Self::default();

        for (field, category) in FLAG_FIELDS {
            let raw = obj
                .get(field)
                .ok_or(ImportOptionsError::MissingField { field })?;
            let flag = raw
                .as_bool()
                .ok_or(ImportOptionsError::InvalidFlag { field })?;
            options.set_included(category, flag);
        }

        for (field, category) in MODE_FIELDS {
            let raw = obj
                .get(field)
                .ok_or(ImportOptionsError::MissingField { field })?;
            let mode = match raw.as_str() {
                Some(s) => {
                    ImportMode::from_str(s).ok_or_else(|| ImportOptionsError::InvalidMode {
                        field,
                        value: s.to_string(),
                    })?
                }
                // A non-string mode is reported with its JSON rendering.
                None => {
                    return Err(ImportOptionsError::InvalidMode {
                        field,
                        value: raw.to_string(),
                    });
                }
            };
            options.set_mode(category, mode);
        }

        if let Some(unknown) = obj.keys().find(|k| {
            !FLAG_FIELDS
                .iter()
                .chain(MODE_FIELDS.iter())
                .any(|(f, _)| *f == k.as_str())
        }) {
            return Err(ImportOptionsError::UnknownField {
                field: unknown.clone(),
            });
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_includes_everything_in_add_mode() {
        let options = ImportOptions::default();
        for category in Category::ALL {
            assert!(options.includes(category));
            assert_eq!(options.mode(category), ImportMode::Add);
        }
    }

    #[test]
    fn test_mode_strings() {
        for name in MODE_NAMES {
            let mode = ImportMode::from_str(name).unwrap();
            assert_eq!(mode.as_str(), *name);
        }
        assert_eq!(ImportMode::from_str("overwrite"), None);
        assert_eq!(ImportMode::from_str("Replace"), None);
    }

    #[test]
    fn test_builders_are_independent_per_category() {
        let options = ImportOptions::default()
            .with_included(Category::Brands, false)
            .with_mode(Category::Bottles, ImportMode::Merge);

        assert!(!options.includes(Category::Brands));
        assert_eq!(options.mode(Category::Brands), ImportMode::Add);
        assert!(options.includes(Category::Bottles));
        assert_eq!(options.mode(Category::Bottles), ImportMode::Merge);
        assert_eq!(options.mode(Category::Tastings), ImportMode::Add);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert_eq!(
            ImportOptions::from_value(&json!([])),
            Err(ImportOptionsError::NotAnObject)
        );
    }

    #[test]
    fn test_from_value_reports_non_string_mode() {
        let mut doc = serde_json::to_value(ImportOptions::default()).unwrap();
        doc["tastingsMode"] = json!(7);
        assert_eq!(
            ImportOptions::from_value(&doc),
            Err(ImportOptionsError::InvalidMode {
                field: "tastingsMode",
                value: "7".to_string(),
            })
        );
    }

    #[test]
    fn test_from_value_rejects_unknown_field() {
        let mut doc = serde_json::to_value(ImportOptions::default()).unwrap();
        doc["importCigars"] = json!(true);
        assert_eq!(
            ImportOptions::from_value(&doc),
            Err(ImportOptionsError::UnknownField {
                field: "importCigars".to_string(),
            })
        );
    }
}
