//! Export functionality for the collection database.
//!
//! Every category is queried with deterministic ordering (by id) so that
//! two exports of the same data are byte-identical and snapshots diff
//! cleanly under version control.

use super::Database;
use super::bottles::parse_bottle_row;
use crate::export::Snapshot;
use crate::types::Category;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Options for controlling export behavior.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Optional list of specific categories to export. `None` exports
    /// all four.
    pub categories: Option<Vec<Category>>,
    /// If true, leave out bottles that have been finished.
    pub exclude_finished: bool,
}

fn rows_to_values<T: Serialize>(rows: Vec<T>) -> Result<Vec<Value>> {
    rows.into_iter()
        .map(|row| Ok(serde_json::to_value(row)?))
        .collect()
}

impl Database {
    /// Export the selected categories into a [`Snapshot`].
    pub fn export_snapshot(&self, options: &ExportOptions) -> Result<Snapshot> {
        let selected = options.categories.as_ref();
        let should_export =
            |category: Category| selected.is_none_or(|list| list.contains(&category));

        let mut snapshot = Snapshot::new();

        if should_export(Category::Brands) {
            snapshot.set_collection(Category::Brands, rows_to_values(self.list_brands(None)?)?);
        }

        if should_export(Category::Bottles) {
            let bottles = if options.exclude_finished {
                self.with_conn(|conn| {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM bottles WHERE status != 'finished' ORDER BY id",
                    )?;
                    let bottles = stmt
                        .query_map([], parse_bottle_row)?
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(bottles)
                })?
            } else {
                self.list_bottles(None)?
            };
            snapshot.set_collection(Category::Bottles, rows_to_values(bottles)?);
        }

        if should_export(Category::Tastings) {
            snapshot.set_collection(
                Category::Tastings,
                rows_to_values(self.list_tastings(None)?)?,
            );
        }

        if should_export(Category::Wishlist) {
            snapshot.set_collection(
                Category::Wishlist,
                rows_to_values(self.list_wishlist(None)?)?,
            );
        }

        Ok(snapshot)
    }
}
