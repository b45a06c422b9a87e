//! Output formatting for list and stats views.

use crate::db::stats::CollectionStats;
use crate::types::{Bottle, Brand, Tasting, WishlistEntry};

/// Output format for CLI views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Format a bottle list as markdown.
pub fn format_bottles_markdown(bottles: &[Bottle]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Bottles ({})\n\n", bottles.len()));

    for bottle in bottles {
        md.push_str(&format!("## {}\n", bottle.name));
        md.push_str(&format!("- **id**: `{}`\n", bottle.id));
        md.push_str(&format!("- **status**: {}\n", bottle.status.as_str()));
        if let Some(ref brand_id) = bottle.brand_id {
            md.push_str(&format!("- **brand**: `{}`\n", brand_id));
        }
        if let Some(age) = bottle.age_years {
            md.push_str(&format!("- **age**: {} years\n", age));
        }
        if let Some(abv) = bottle.abv {
            md.push_str(&format!("- **abv**: {}%\n", abv));
        }
        if let Some(rating) = bottle.rating {
            md.push_str(&format!("- **rating**: {}/100\n", rating));
        }
        md.push('\n');
    }

    md
}

/// Format a brand list as markdown.
pub fn format_brands_markdown(brands: &[Brand]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Brands ({})\n\n", brands.len()));

    for brand in brands {
        md.push_str(&format!("- `{}` **{}**", brand.id, brand.name));
        if let Some(ref country) = brand.country {
            md.push_str(&format!(" ({})", country));
        }
        if let Some(ref region) = brand.region {
            md.push_str(&format!(" - {}", region));
        }
        md.push('\n');
    }

    md
}

/// Format a tasting list as markdown.
pub fn format_tastings_markdown(tastings: &[Tasting]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Tastings ({})\n\n", tastings.len()));

    for tasting in tastings {
        md.push_str(&format!("## {}\n", tasting.tasted_at));
        md.push_str(&format!("- **id**: `{}`\n", tasting.id));
        if let Some(ref bottle_id) = tasting.bottle_id {
            md.push_str(&format!("- **bottle**: `{}`\n", bottle_id));
        }
        if let Some(rating) = tasting.rating {
            md.push_str(&format!("- **rating**: {}/100\n", rating));
        }
        for (label, field) in [
            ("nose", &tasting.nose),
            ("palate", &tasting.palate),
            ("finish", &tasting.finish),
        ] {
            if let Some(text) = field {
                md.push_str(&format!("- **{}**: {}\n", label, text));
            }
        }
        md.push('\n');
    }

    md
}

/// Format a wishlist as markdown, most wanted first.
pub fn format_wishlist_markdown(entries: &[WishlistEntry]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Wishlist ({})\n\n", entries.len()));

    let mut sorted: Vec<&WishlistEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

    for entry in sorted {
        md.push_str(&format!("- `{}` **{}**", entry.id, entry.name));
        if let Some(price) = entry.max_price {
            md.push_str(&format!(" (up to {:.2})", price));
        }
        md.push('\n');
    }

    md
}

/// Format collection statistics as markdown.
pub fn format_stats_markdown(stats: &CollectionStats) -> String {
    let mut md = String::new();
    md.push_str("# Collection\n\n");
    md.push_str(&format!("- **brands**: {}\n", stats.brands));
    md.push_str(&format!("- **bottles**: {}\n", stats.bottles));
    for (status, count) in &stats.bottles_by_status {
        md.push_str(&format!("  - {}: {}\n", status, count));
    }
    md.push_str(&format!("- **tastings**: {}\n", stats.tastings));
    md.push_str(&format!("- **wishlist**: {}\n", stats.wishlist));
    if let Some(rating) = stats.average_rating {
        md.push_str(&format!("- **average rating**: {:.1}/100\n", rating));
    }
    if stats.total_spend > 0.0 {
        md.push_str(&format!("- **total spend**: {:.2}\n", stats.total_spend));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BottleStatus;

    fn bottle(id: &str, name: &str) -> Bottle {
        Bottle {
            id: id.to_string(),
            name: name.to_string(),
            brand_id: None,
            age_years: Some(12),
            abv: Some(43.0),
            volume_ml: Some(700),
            price_paid: None,
            status: BottleStatus::Sealed,
            rating: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_format_bottles_markdown() {
        let md = format_bottles_markdown(&[bottle("quiet-amber-wren", "Clynelish 14")]);
        assert!(md.starts_with("# Bottles (1)"));
        assert!(md.contains("## Clynelish 14"));
        assert!(md.contains("`quiet-amber-wren`"));
        assert!(md.contains("- **age**: 12 years"));
    }

    #[test]
    fn test_format_wishlist_sorts_by_priority() {
        let low = WishlistEntry {
            id: "a-low".to_string(),
            name: "Low".to_string(),
            brand_id: None,
            max_price: None,
            priority: 1,
            notes: None,
            created_at: 0,
        };
        let high = WishlistEntry {
            id: "z-high".to_string(),
            name: "High".to_string(),
            brand_id: None,
            max_price: None,
            priority: 9,
            notes: None,
            created_at: 0,
        };
        let md = format_wishlist_markdown(&[low, high]);
        let high_pos = md.find("z-high").unwrap();
        let low_pos = md.find("a-low").unwrap();
        assert!(high_pos < low_pos);
    }
}
