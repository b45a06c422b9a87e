//! Snapshot format for collection export/import.
//!
//! A snapshot is a flat, diffable JSON document holding the four
//! collection categories as arrays of row objects. It is what `export`
//! writes and what `import` consumes, and is intended to be kept under
//! version control.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema version of the collection database. Bump together with a new
/// migration when the table shapes change.
pub const SCHEMA_VERSION: i32 = 1;

/// Snapshot document format version (semver).
pub const EXPORT_VERSION: &str = "1.0.0";

/// A point-in-time snapshot of the collection.
///
/// Rows are generic JSON objects rather than the typed records so that a
/// snapshot written by a different version can still be loaded, compared
/// and partially imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Database schema version the rows conform to.
    pub schema_version: i32,

    /// Snapshot document format version (semver).
    pub export_version: String,

    /// ISO 8601 timestamp of the export.
    pub exported_at: String,

    /// Tool name and version that wrote the snapshot.
    pub exported_by: String,

    /// Category rows keyed by category name. BTreeMap keeps key order
    /// stable so snapshots diff cleanly.
    pub collections: BTreeMap<String, Vec<Value>>,
}

impl Snapshot {
    /// Create an empty snapshot stamped with current metadata.
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            export_version: EXPORT_VERSION.to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            exported_by: format!("caskbook v{}", env!("CARGO_PKG_VERSION")),
            collections: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a snapshot from a file, transparently handling gzip.
    ///
    /// Compression is detected from the gzip magic bytes, not the file
    /// name, so renamed files still load.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use std::fs::File;
        use std::io::{BufReader, Read};

        let mut magic = [0u8; 2];
        {
            let mut reader = BufReader::new(File::open(path)?);
            reader.read_exact(&mut magic)?;
        }

        let reader = BufReader::new(File::open(path)?);
        let snapshot = if magic == [0x1f, 0x8b] {
            serde_json::from_reader(flate2::read::GzDecoder::new(reader))?
        } else {
            serde_json::from_reader(reader)?
        };
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rows of one category, if the snapshot carries it.
    pub fn collection(&self, category: Category) -> Option<&Vec<Value>> {
        self.collections.get(category.as_str())
    }

    pub fn set_collection(&mut self, category: Category, rows: Vec<Value>) {
        self.collections.insert(category.as_str().to_string(), rows);
    }

    /// Whether this snapshot's rows match the current database schema.
    pub fn is_schema_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(|s| s.as_str()).collect()
    }

    /// Total number of rows across all categories.
    pub fn total_rows(&self) -> usize {
        self.collections.values().map(|rows| rows.len()).sum()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Column that identifies a record within its category.
///
/// This is the merge key: two records are "the same" for merge purposes
/// exactly when this column matches. Uniform across categories today,
/// but callers go through here so a category could diverge.
pub fn identity_key(category: Category) -> &'static str {
    match category {
        Category::Brands | Category::Bottles | Category::Tastings | Category::Wishlist => "id",
    }
}
