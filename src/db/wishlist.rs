//! Wishlist storage.

use super::Database;
use crate::types::WishlistEntry;
use anyhow::Result;
use rusqlite::{Connection, Row, params};

/// Parse a `SELECT * FROM wishlist` row.
pub(crate) fn parse_wishlist_row(row: &Row) -> rusqlite::Result<WishlistEntry> {
    Ok(WishlistEntry {
        id: row.get("id")?,
        name: row.get("name")?,
        brand_id: row.get("brand_id")?,
        max_price: row.get("max_price")?,
        priority: row.get("priority")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn insert_wishlist_with(conn: &Connection, entry: &WishlistEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO wishlist (id, name, brand_id, max_price, priority, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id,
            entry.name,
            entry.brand_id,
            entry.max_price,
            entry.priority,
            entry.notes,
            entry.created_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing wishlist row.
pub(crate) fn update_wishlist_with(conn: &Connection, entry: &WishlistEntry) -> Result<()> {
    conn.execute(
        "UPDATE wishlist
         SET name = ?2, brand_id = ?3, max_price = ?4, priority = ?5, notes = ?6, created_at = ?7
         WHERE id = ?1",
        params![
            entry.id,
            entry.name,
            entry.brand_id,
            entry.max_price,
            entry.priority,
            entry.notes,
            entry.created_at,
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_wishlist_entry(&self, entry: &WishlistEntry) -> Result<()> {
        self.with_conn(|conn| insert_wishlist_with(conn, entry))
    }

    /// All wishlist entries ordered by id. `limit` of `None` means unbounded.
    pub fn list_wishlist(&self, limit: Option<usize>) -> Result<Vec<WishlistEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM wishlist ORDER BY id LIMIT ?1")?;
            let entries = stmt
                .query_map(
                    params![limit.map(|n| n as i64).unwrap_or(-1)],
                    parse_wishlist_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
    }

    pub fn count_wishlist(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM wishlist", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
