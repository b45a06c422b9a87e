//! Brand storage.

use super::Database;
use crate::types::Brand;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Parse a `SELECT * FROM brands` row.
pub(crate) fn parse_brand_row(row: &Row) -> rusqlite::Result<Brand> {
    Ok(Brand {
        id: row.get("id")?,
        name: row.get("name")?,
        country: row.get("country")?,
        region: row.get("region")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn insert_brand_with(conn: &Connection, brand: &Brand) -> Result<()> {
    conn.execute(
        "INSERT INTO brands (id, name, country, region, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            brand.id,
            brand.name,
            brand.country,
            brand.region,
            brand.notes,
            brand.created_at,
            brand.updated_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing brand row.
pub(crate) fn update_brand_with(conn: &Connection, brand: &Brand) -> Result<()> {
    conn.execute(
        "UPDATE brands
         SET name = ?2, country = ?3, region = ?4, notes = ?5, created_at = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            brand.id,
            brand.name,
            brand.country,
            brand.region,
            brand.notes,
            brand.created_at,
            brand.updated_at,
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_brand(&self, brand: &Brand) -> Result<()> {
        self.with_conn(|conn| insert_brand_with(conn, brand))
    }

    pub fn get_brand(&self, id: &str) -> Result<Option<Brand>> {
        self.with_conn(|conn| {
            let brand = conn
                .query_row(
                    "SELECT * FROM brands WHERE id = ?1",
                    params![id],
                    parse_brand_row,
                )
                .optional()?;
            Ok(brand)
        })
    }

    /// All brands ordered by id. `limit` of `None` means unbounded.
    pub fn list_brands(&self, limit: Option<usize>) -> Result<Vec<Brand>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM brands ORDER BY id LIMIT ?1")?;
            let brands = stmt
                .query_map(params![limit.map(|n| n as i64).unwrap_or(-1)], parse_brand_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(brands)
        })
    }

    pub fn count_brands(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM brands", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
