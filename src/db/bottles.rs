//! Bottle storage.

use super::Database;
use crate::types::{Bottle, BottleStatus};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Parse a `SELECT * FROM bottles` row.
pub(crate) fn parse_bottle_row(row: &Row) -> rusqlite::Result<Bottle> {
    let status: String = row.get("status")?;
    Ok(Bottle {
        id: row.get("id")?,
        name: row.get("name")?,
        brand_id: row.get("brand_id")?,
        age_years: row.get("age_years")?,
        abv: row.get("abv")?,
        volume_ml: row.get("volume_ml")?,
        price_paid: row.get("price_paid")?,
        status: BottleStatus::from_str(&status).unwrap_or_default(),
        rating: row.get("rating")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn insert_bottle_with(conn: &Connection, bottle: &Bottle) -> Result<()> {
    conn.execute(
        "INSERT INTO bottles (
            id, name, brand_id, age_years, abv, volume_ml, price_paid,
            status, rating, notes, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            bottle.id,
            bottle.name,
            bottle.brand_id,
            bottle.age_years,
            bottle.abv,
            bottle.volume_ml,
            bottle.price_paid,
            bottle.status.as_str(),
            bottle.rating,
            bottle.notes,
            bottle.created_at,
            bottle.updated_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing bottle row.
pub(crate) fn update_bottle_with(conn: &Connection, bottle: &Bottle) -> Result<()> {
    conn.execute(
        "UPDATE bottles
         SET name = ?2, brand_id = ?3, age_years = ?4, abv = ?5, volume_ml = ?6,
             price_paid = ?7, status = ?8, rating = ?9, notes = ?10,
             created_at = ?11, updated_at = ?12
         WHERE id = ?1",
        params![
            bottle.id,
            bottle.name,
            bottle.brand_id,
            bottle.age_years,
            bottle.abv,
            bottle.volume_ml,
            bottle.price_paid,
            bottle.status.as_str(),
            bottle.rating,
            bottle.notes,
            bottle.created_at,
            bottle.updated_at,
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_bottle(&self, bottle: &Bottle) -> Result<()> {
        self.with_conn(|conn| insert_bottle_with(conn, bottle))
    }

    pub fn get_bottle(&self, id: &str) -> Result<Option<Bottle>> {
        self.with_conn(|conn| {
            let bottle = conn
                .query_row(
                    "SELECT * FROM bottles WHERE id = ?1",
                    params![id],
                    parse_bottle_row,
                )
                .optional()?;
            Ok(bottle)
        })
    }

    /// All bottles ordered by id. `limit` of `None` means unbounded.
    pub fn list_bottles(&self, limit: Option<usize>) -> Result<Vec<Bottle>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM bottles ORDER BY id LIMIT ?1")?;
            let bottles = stmt
                .query_map(
                    params![limit.map(|n| n as i64).unwrap_or(-1)],
                    parse_bottle_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bottles)
        })
    }

    pub fn count_bottles(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM bottles", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
