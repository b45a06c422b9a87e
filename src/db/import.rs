//! Import engine for the collection database.
//!
//! Applies one [`ImportOptions`] value per run. Each included category
//! is processed independently under its own conflict policy:
//!
//! - `replace`: clear the category, then insert every incoming record.
//! - `add`: append incoming records without touching existing ones.
//!   Incoming ids that collide with existing ids are re-issued fresh
//!   ids (append must never overwrite), and the re-mapping is applied
//!   to references from later rows of the same snapshot.
//! - `merge`: upsert by record id. Ids present on both sides are
//!   overwritten with the incoming record's fields; existing-only
//!   records are retained.
//!
//! Categories are processed parent-first (brands, bottles, tastings,
//! wishlist) inside a single transaction, with foreign-key enforcement
//! suspended for the duration. Per-category inclusion flags can still
//! leave references dangling (importing bottles without their brands);
//! those are reported as warnings, not errors.

use super::Database;
use super::{bottles, brands, tastings, wishlist};
use crate::config::IdsConfig;
use crate::export::{SCHEMA_VERSION, Snapshot, identity_key};
use crate::import::{ImportMode, ImportOptions};
use crate::types::{Bottle, Brand, Category, Tasting, WishlistEntry};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Per-category outcome of applying one conflict policy.
#[derive(Debug, Clone, Copy, Default)]
struct CategoryOutcome {
    inserted: usize,
    updated: usize,
    deleted: usize,
    reissued: usize,
}

/// Result of an import run. Count maps are keyed by category name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Records inserted per category.
    pub inserted: BTreeMap<String, usize>,
    /// Records overwritten by merge per category.
    pub updated: BTreeMap<String, usize>,
    /// Records deleted by replace per category.
    pub deleted: BTreeMap<String, usize>,
    /// Add-mode id collisions that were re-issued, per category.
    pub reissued: BTreeMap<String, usize>,
    /// Old id -> new id, per category, for re-issued records.
    pub id_remap: BTreeMap<String, BTreeMap<String, String>>,
    /// Non-fatal findings, e.g. dangling references after a partial run.
    pub warnings: Vec<String>,
}

impl ImportReport {
    fn record(&mut self, category: Category, outcome: CategoryOutcome) {
        let name = category.as_str().to_string();
        self.inserted.insert(name.clone(), outcome.inserted);
        if outcome.updated > 0 {
            self.updated.insert(name.clone(), outcome.updated);
        }
        if outcome.deleted > 0 {
            self.deleted.insert(name.clone(), outcome.deleted);
        }
        if outcome.reissued > 0 {
            self.reissued.insert(name, outcome.reissued);
        }
    }

    pub fn total_inserted(&self) -> usize {
        self.inserted.values().sum()
    }

    pub fn total_updated(&self) -> usize {
        self.updated.values().sum()
    }

    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }
}

/// Result of a dry-run preview. Nothing is written; counts describe
/// what the real run would do against the current database state.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    /// Existing rows per included category, before import.
    pub existing: BTreeMap<String, usize>,
    pub would_insert: BTreeMap<String, usize>,
    pub would_update: BTreeMap<String, usize>,
    pub would_delete: BTreeMap<String, usize>,
    pub would_reissue: BTreeMap<String, usize>,
    pub would_succeed: bool,
    pub failure_reason: Option<String>,
}

impl DryRunReport {
    fn new() -> Self {
        Self {
            existing: BTreeMap::new(),
            would_insert: BTreeMap::new(),
            would_update: BTreeMap::new(),
            would_delete: BTreeMap::new(),
            would_reissue: BTreeMap::new(),
            would_succeed: true,
            failure_reason: None,
        }
    }

    pub fn total_would_insert(&self) -> usize {
        self.would_insert.values().sum()
    }

    pub fn total_would_delete(&self) -> usize {
        self.would_delete.values().sum()
    }
}

/// Ids re-issued during the current run, used to fix up references from
/// later rows of the same snapshot.
#[derive(Debug, Default)]
struct IdRemap {
    maps: HashMap<Category, HashMap<String, String>>,
}

impl IdRemap {
    fn insert(&mut self, category: Category, old: String, new: String) {
        self.maps.entry(category).or_default().insert(old, new);
    }

    /// Rewrite a reference if its target id was re-issued earlier in
    /// this run; ids that were not touched pass through unchanged.
    fn remap_ref(&self, category: Category, reference: &mut Option<String>) {
        if let Some(id) = reference.as_deref()
            && let Some(new) = self.maps.get(&category).and_then(|m| m.get(id))
        {
            *reference = Some(new.clone());
        }
    }

    fn into_report(self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.maps
            .into_iter()
            .filter(|(_, map)| !map.is_empty())
            .map(|(category, map)| {
                (
                    category.as_str().to_string(),
                    map.into_iter().collect::<BTreeMap<_, _>>(),
                )
            })
            .collect()
    }
}

/// Check whether a record with this identity exists in the category.
fn record_exists(conn: &Connection, category: Category, id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            &format!(
                "SELECT 1 FROM {} WHERE {} = ?1",
                category.as_str(),
                identity_key(category)
            ),
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Generate a fresh id that is unused in the category. Inserts earlier
/// in the run are visible here, so re-issued ids cannot collide with
/// each other either.
fn reissue_id(conn: &Connection, category: Category, ids: &IdsConfig) -> Result<String> {
    for _ in 0..100 {
        let id = super::generate_id(ids);
        if !record_exists(conn, category, &id)? {
            return Ok(id);
        }
    }
    Err(anyhow!(
        "failed to generate a unique {} id after 100 attempts; consider raising ids.id_words",
        category
    ))
}

fn parse_row<T: serde::de::DeserializeOwned>(row: &Value, what: &str) -> Result<T> {
    serde_json::from_value(row.clone())
        .with_context(|| format!("{} row does not match the current schema", what))
}

/// Delete every record in the category, returning how many were removed.
fn clear_category(conn: &Connection, category: Category) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", category.as_str()),
        [],
        |row| row.get(0),
    )?;
    conn.execute(&format!("DELETE FROM {}", category.as_str()), [])?;
    Ok(count as usize)
}

fn apply_brands(
    conn: &Connection,
    rows: &[Value],
    mode: ImportMode,
    ids: &IdsConfig,
    remap: &mut IdRemap,
) -> Result<CategoryOutcome> {
    let mut out = CategoryOutcome::default();
    if mode == ImportMode::Replace {
        out.deleted = clear_category(conn, Category::Brands)?;
    }

    for row in rows {
        let mut brand: Brand = parse_row(row, "brand")?;
        match mode {
            ImportMode::Replace => {
                brands::insert_brand_with(conn, &brand)?;
                out.inserted += 1;
            }
            ImportMode::Add => {
                if record_exists(conn, Category::Brands, &brand.id)? {
                    let fresh = reissue_id(conn, Category::Brands, ids)?;
                    remap.insert(Category::Brands, brand.id.clone(), fresh.clone());
                    brand.id = fresh;
                    out.reissued += 1;
                }
                brands::insert_brand_with(conn, &brand)?;
                out.inserted += 1;
            }
            ImportMode::Merge => {
                if record_exists(conn, Category::Brands, &brand.id)? {
                    brands::update_brand_with(conn, &brand)?;
                    out.updated += 1;
                } else {
                    brands::insert_brand_with(conn, &brand)?;
                    out.inserted += 1;
                }
            }
        }
    }
    Ok(out)
}

fn apply_bottles(
    conn: &Connection,
    rows: &[Value],
    mode: ImportMode,
    ids: &IdsConfig,
    remap: &mut IdRemap,
) -> Result<CategoryOutcome> {
    let mut out = CategoryOutcome::default();
    if mode == ImportMode::Replace {
        out.deleted = clear_category(conn, Category::Bottles)?;
    }

    for row in rows {
        let mut bottle: Bottle = parse_row(row, "bottle")?;
        remap.remap_ref(Category::Brands, &mut bottle.brand_id);
        match mode {
            ImportMode::Replace => {
                bottles::insert_bottle_with(conn, &bottle)?;
                out.inserted += 1;
            }
            ImportMode::Add => {
                if record_exists(conn, Category::Bottles, &bottle.id)? {
                    let fresh = reissue_id(conn, Category::Bottles, ids)?;
                    remap.insert(Category::Bottles, bottle.id.clone(), fresh.clone());
                    bottle.id = fresh;
                    out.reissued += 1;
                }
                bottles::insert_bottle_with(conn, &bottle)?;
                out.inserted += 1;
            }
            ImportMode::Merge => {
                if record_exists(conn, Category::Bottles, &bottle.id)? {
                    bottles::update_bottle_with(conn, &bottle)?;
                    out.updated += 1;
                } else {
                    bottles::insert_bottle_with(conn, &bottle)?;
                    out.inserted += 1;
                }
            }
        }
    }
    Ok(out)
}

fn apply_tastings(
    conn: &Connection,
    rows: &[Value],
    mode: ImportMode,
    ids: &IdsConfig,
    remap: &mut IdRemap,
) -> Result<CategoryOutcome> {
    let mut out = CategoryOutcome::default();
    if mode == ImportMode::Replace {
        out.deleted = clear_category(conn, Category::Tastings)?;
    }

    for row in rows {
        let mut tasting: Tasting = parse_row(row, "tasting")?;
        remap.remap_ref(Category::Bottles, &mut tasting.bottle_id);
        match mode {
            ImportMode::Replace => {
                tastings::insert_tasting_with(conn, &tasting)?;
                out.inserted += 1;
            }
            ImportMode::Add => {
                if record_exists(conn, Category::Tastings, &tasting.id)? {
                    let fresh = reissue_id(conn, Category::Tastings, ids)?;
                    remap.insert(Category::Tastings, tasting.id.clone(), fresh.clone());
                    tasting.id = fresh;
                    out.reissued += 1;
                }
                tastings::insert_tasting_with(conn, &tasting)?;
                out.inserted += 1;
            }
            ImportMode::Merge => {
                if record_exists(conn, Category::Tastings, &tasting.id)? {
                    tastings::update_tasting_with(conn, &tasting)?;
                    out.updated += 1;
                } else {
                    tastings::insert_tasting_with(conn, &tasting)?;
                    out.inserted += 1;
                }
            }
        }
    }
    Ok(out)
}

fn apply_wishlist(
    conn: &Connection,
    rows: &[Value],
    mode: ImportMode,
    ids: &IdsConfig,
    remap: &mut IdRemap,
) -> Result<CategoryOutcome> {
    let mut out = CategoryOutcome::default();
    if mode == ImportMode::Replace {
        out.deleted = clear_category(conn, Category::Wishlist)?;
    }

    for row in rows {
        let mut entry: WishlistEntry = parse_row(row, "wishlist")?;
        remap.remap_ref(Category::Brands, &mut entry.brand_id);
        match mode {
            ImportMode::Replace => {
                wishlist::insert_wishlist_with(conn, &entry)?;
                out.inserted += 1;
            }
            ImportMode::Add => {
                if record_exists(conn, Category::Wishlist, &entry.id)? {
                    let fresh = reissue_id(conn, Category::Wishlist, ids)?;
                    remap.insert(Category::Wishlist, entry.id.clone(), fresh.clone());
                    entry.id = fresh;
                    out.reissued += 1;
                }
                wishlist::insert_wishlist_with(conn, &entry)?;
                out.inserted += 1;
            }
            ImportMode::Merge => {
                if record_exists(conn, Category::Wishlist, &entry.id)? {
                    wishlist::update_wishlist_with(conn, &entry)?;
                    out.updated += 1;
                } else {
                    wishlist::insert_wishlist_with(conn, &entry)?;
                    out.inserted += 1;
                }
            }
        }
    }
    Ok(out)
}

impl Database {
    /// Import a snapshot under the given per-category options.
    ///
    /// The whole run is one transaction: either every included category
    /// applies, or none does. Foreign keys are suspended for the
    /// duration; a post-import scan reports dangling references as
    /// warnings instead.
    pub fn import_snapshot(
        &self,
        snapshot: &Snapshot,
        options: &ImportOptions,
        ids: &IdsConfig,
    ) -> Result<ImportReport> {
        if !snapshot.is_schema_compatible() {
            bail!(
                "snapshot schema is v{} but this database uses v{}; re-export with a matching version",
                snapshot.schema_version,
                SCHEMA_VERSION
            );
        }

        let mut report = ImportReport::default();
        let mut remap = IdRemap::default();

        self.with_conn_mut(|conn| {
            // Import order already satisfies parentage; constraints are
            // re-enabled once the transaction is through.
            conn.execute("PRAGMA foreign_keys = OFF", [])?;
            let tx = conn.transaction()?;

            for category in Category::ALL {
                if !options.includes(category) {
                    continue;
                }

                let empty = Vec::new();
                let rows = snapshot.collection(category).unwrap_or(&empty);
                let mode = options.mode(category);

                let outcome = match category {
                    Category::Brands => apply_brands(&tx, rows, mode, ids, &mut remap)?,
                    Category::Bottles => apply_bottles(&tx, rows, mode, ids, &mut remap)?,
                    Category::Tastings => apply_tastings(&tx, rows, mode, ids, &mut remap)?,
                    Category::Wishlist => apply_wishlist(&tx, rows, mode, ids, &mut remap)?,
                };
                tracing::debug!(
                    category = %category,
                    mode = %mode,
                    inserted = outcome.inserted,
                    updated = outcome.updated,
                    deleted = outcome.deleted,
                    "category imported"
                );
                report.record(category, outcome);
            }

            tx.commit()?;
            conn.execute("PRAGMA foreign_keys = ON", [])?;
            Ok(())
        })?;

        report.id_remap = remap.into_report();
        report.warnings.extend(self.scan_dangling_references()?);
        Ok(report)
    }

    /// Preview what an import would do without making any changes.
    ///
    /// Counts are computed against the current database state. The
    /// preview inspects only record identities, so a run this preview
    /// approves can still fail on malformed rows.
    pub fn preview_import(&self, snapshot: &Snapshot, options: &ImportOptions) -> DryRunReport {
        let mut report = DryRunReport::new();

        if !snapshot.is_schema_compatible() {
            report.would_succeed = false;
            report.failure_reason = Some(format!(
                "snapshot schema is v{} but this database uses v{}; re-export with a matching version",
                snapshot.schema_version, SCHEMA_VERSION
            ));
            return report;
        }

        let outcome = self.with_conn(|conn| {
            for category in Category::ALL {
                if !options.includes(category) {
                    continue;
                }
                let name = category.as_str().to_string();

                let existing: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", category.as_str()),
                    [],
                    |row| row.get(0),
                )?;
                report.existing.insert(name.clone(), existing as usize);

                let empty = Vec::new();
                let rows = snapshot.collection(category).unwrap_or(&empty);

                match options.mode(category) {
                    ImportMode::Replace => {
                        if existing > 0 {
                            report.would_delete.insert(name.clone(), existing as usize);
                        }
                        report.would_insert.insert(name, rows.len());
                    }
                    ImportMode::Add => {
                        let mut collisions = 0;
                        for row in rows {
                            if let Some(id) = row.get(identity_key(category)).and_then(|v| v.as_str())
                                && record_exists(conn, category, id)?
                            {
                                collisions += 1;
                            }
                        }
                        report.would_insert.insert(name.clone(), rows.len());
                        if collisions > 0 {
                            report.would_reissue.insert(name, collisions);
                        }
                    }
                    ImportMode::Merge => {
                        let mut inserts = 0;
                        let mut updates = 0;
                        for row in rows {
                            let exists = match row
                                .get(identity_key(category))
                                .and_then(|v| v.as_str())
                            {
                                Some(id) => record_exists(conn, category, id)?,
                                None => false,
                            };
                            if exists {
                                updates += 1;
                            } else {
                                inserts += 1;
                            }
                        }
                        report.would_insert.insert(name.clone(), inserts);
                        if updates > 0 {
                            report.would_update.insert(name, updates);
                        }
                    }
                }
            }
            Ok(())
        });

        if let Err(e) = outcome {
            report.would_succeed = false;
            report.failure_reason = Some(format!("failed to analyze the database: {}", e));
        }

        report
    }

    /// Report references whose target record is missing. These are
    /// legitimate after a partial import (a category excluded while a
    /// category referencing it was replaced), so they warn, not fail.
    fn scan_dangling_references(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut warnings = Vec::new();

            let checks: [(&str, &str); 3] = [
                (
                    "bottles",
                    "SELECT COUNT(*) FROM bottles b
                     WHERE b.brand_id IS NOT NULL
                       AND NOT EXISTS (SELECT 1 FROM brands WHERE id = b.brand_id)",
                ),
                (
                    "tastings",
                    "SELECT COUNT(*) FROM tastings t
                     WHERE t.bottle_id IS NOT NULL
                       AND NOT EXISTS (SELECT 1 FROM bottles WHERE id = t.bottle_id)",
                ),
                (
                    "wishlist",
                    "SELECT COUNT(*) FROM wishlist w
                     WHERE w.brand_id IS NOT NULL
                       AND NOT EXISTS (SELECT 1 FROM brands WHERE id = w.brand_id)",
                ),
            ];

            for (table, sql) in checks {
                let dangling: i64 = conn.query_row(sql, [], |row| row.get(0))?;
                if dangling > 0 {
                    warnings.push(format!(
                        "{} {} record(s) reference a record that is not present",
                        dangling, table
                    ));
                }
            }

            Ok(warnings)
        })
    }
}
