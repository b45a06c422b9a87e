//! Aggregate statistics over the collection.

use super::Database;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collection-wide aggregate numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub brands: i64,
    pub bottles: i64,
    pub tastings: i64,
    pub wishlist: i64,
    /// Bottle counts keyed by status (sealed/open/finished).
    pub bottles_by_status: BTreeMap<String, i64>,
    /// Mean bottle rating over rated bottles, if any are rated.
    pub average_rating: Option<f64>,
    /// Sum of recorded purchase prices.
    pub total_spend: f64,
}

impl Database {
    pub fn collection_stats(&self) -> Result<CollectionStats> {
        self.with_conn(|conn| {
            let count = |table: &str| -> Result<i64> {
                let n: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
                Ok(n)
            };

            let mut bottles_by_status = BTreeMap::new();
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM bottles GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (status, n) = row?;
                bottles_by_status.insert(status, n);
            }

            let average_rating: Option<f64> =
                conn.query_row("SELECT AVG(rating) FROM bottles", [], |row| row.get(0))?;

            let total_spend: f64 = conn.query_row(
                "SELECT COALESCE(SUM(price_paid), 0.0) FROM bottles",
                [],
                |row| row.get(0),
            )?;

            Ok(CollectionStats {
                brands: count("brands")?,
                bottles: count("bottles")?,
                tastings: count("tastings")?,
                wishlist: count("wishlist")?,
                bottles_by_status,
                average_rating,
                total_spend,
            })
        })
    }
}
