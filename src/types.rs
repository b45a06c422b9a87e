//! Core types for the caskbook collection.

use serde::{Deserialize, Serialize};

/// A collection category. Every record in the database belongs to
/// exactly one of these four partitions, and every import/export run
/// addresses them independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Brands,
    Bottles,
    Tastings,
    Wishlist,
}

impl Category {
    /// All categories in import order: parents before the records that
    /// reference them (bottles and wishlist entries point at brands,
    /// tastings point at bottles).
    pub const ALL: [Category; 4] = [
        Category::Brands,
        Category::Bottles,
        Category::Tastings,
        Category::Wishlist,
    ];

    /// The category's table/collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Brands => "brands",
            Category::Bottles => "bottles",
            Category::Tastings => "tastings",
            Category::Wishlist => "wishlist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brands" => Some(Category::Brands),
            "bottles" => Some(Category::Bottles),
            "tastings" => Some(Category::Tastings),
            "wishlist" => Some(Category::Wishlist),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill state of a bottle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleStatus {
    #[default]
    Sealed,
    Open,
    Finished,
}

impl BottleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleStatus::Sealed => "sealed",
            BottleStatus::Open => "open",
            BottleStatus::Finished => "finished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sealed" => Some(BottleStatus::Sealed),
            "open" => Some(BottleStatus::Open),
            "finished" => Some(BottleStatus::Finished),
            _ => None,
        }
    }
}

/// A distillery or independent bottler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A bottle in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
    pub id: String,
    pub name: String,
    /// Brand reference (nullable: not every bottle has a catalogued brand).
    pub brand_id: Option<String>,
    pub age_years: Option<i32>,
    pub abv: Option<f64>,
    pub volume_ml: Option<i32>,
    pub price_paid: Option<f64>,
    pub status: BottleStatus,
    /// Owner rating, 0-100.
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A tasting session note for a bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tasting {
    pub id: String,
    pub bottle_id: Option<String>,
    /// Date of the tasting (ISO 8601 date string).
    pub tasted_at: String,
    pub rating: Option<i32>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// A bottle the owner wants but does not have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: String,
    pub name: String,
    pub brand_id: Option<String>,
    pub max_price: Option<f64>,
    /// Higher is wanted more. Default 0.
    pub priority: i32,
    pub notes: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("cigars"), None);
    }

    #[test]
    fn test_category_import_order_is_parent_first() {
        let order: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        let brands = order.iter().position(|c| *c == "brands").unwrap();
        let bottles = order.iter().position(|c| *c == "bottles").unwrap();
        let tastings = order.iter().position(|c| *c == "tastings").unwrap();
        assert!(brands < bottles);
        assert!(bottles < tastings);
    }

    #[test]
    fn test_bottle_status_strings() {
        assert_eq!(BottleStatus::from_str("open"), Some(BottleStatus::Open));
        assert_eq!(BottleStatus::Open.as_str(), "open");
        assert_eq!(BottleStatus::from_str("empty"), None);
        assert_eq!(BottleStatus::default(), BottleStatus::Sealed);
    }
}
