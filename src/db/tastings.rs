//! Tasting storage.

use super::Database;
use crate::types::Tasting;
use anyhow::Result;
use rusqlite::{Connection, Row, params};

/// Parse a `SELECT * FROM tastings` row.
pub(crate) fn parse_tasting_row(row: &Row) -> rusqlite::Result<Tasting> {
    Ok(Tasting {
        id: row.get("id")?,
        bottle_id: row.get("bottle_id")?,
        tasted_at: row.get("tasted_at")?,
        rating: row.get("rating")?,
        nose: row.get("nose")?,
        palate: row.get("palate")?,
        finish: row.get("finish")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn insert_tasting_with(conn: &Connection, tasting: &Tasting) -> Result<()> {
    conn.execute(
        "INSERT INTO tastings (
            id, bottle_id, tasted_at, rating, nose, palate, finish, notes, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tasting.id,
            tasting.bottle_id,
            tasting.tasted_at,
            tasting.rating,
            tasting.nose,
            tasting.palate,
            tasting.finish,
            tasting.notes,
            tasting.created_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing tasting row.
pub(crate) fn update_tasting_with(conn: &Connection, tasting: &Tasting) -> Result<()> {
    conn.execute(
        "UPDATE tastings
         SET bottle_id = ?2, tasted_at = ?3, rating = ?4, nose = ?5, palate = ?6,
             finish = ?7, notes = ?8, created_at = ?9
         WHERE id = ?1",
        params![
            tasting.id,
            tasting.bottle_id,
            tasting.tasted_at,
            tasting.rating,
            tasting.nose,
            tasting.palate,
            tasting.finish,
            tasting.notes,
            tasting.created_at,
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_tasting(&self, tasting: &Tasting) -> Result<()> {
        self.with_conn(|conn| insert_tasting_with(conn, tasting))
    }

    /// All tastings ordered by id. `limit` of `None` means unbounded.
    pub fn list_tastings(&self, limit: Option<usize>) -> Result<Vec<Tasting>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tastings ORDER BY id LIMIT ?1")?;
            let tastings = stmt
                .query_map(
                    params![limit.map(|n| n as i64).unwrap_or(-1)],
                    parse_tasting_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tastings)
        })
    }

    pub fn count_tastings(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM tastings", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
