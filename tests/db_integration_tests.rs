//! Integration tests for the database layer: CRUD, deterministic
//! export, snapshot file round-trips, statistics and id generation.

use caskbook::config::{IdCase, IdsConfig};
use caskbook::db::export::ExportOptions;
use caskbook::db::{Database, generate_id};
use caskbook::export::Snapshot;
use caskbook::import::ImportOptions;
use caskbook::types::{Bottle, BottleStatus, Brand, Category, Tasting, WishlistEntry};
use std::io::Write;

fn setup_db() -> Database {
    Database::open_in_memory().expect("failed to create in-memory database")
}

fn sample_brand(id: &str) -> Brand {
    Brand {
        id: id.to_string(),
        name: "Glen Example".to_string(),
        country: Some("Scotland".to_string()),
        region: Some("Speyside".to_string()),
        notes: None,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    }
}

fn sample_bottle(id: &str, brand_id: Option<&str>, status: BottleStatus) -> Bottle {
    Bottle {
        id: id.to_string(),
        name: "Example 12".to_string(),
        brand_id: brand_id.map(String::from),
        age_years: Some(12),
        abv: Some(43.0),
        volume_ml: Some(700),
        price_paid: Some(49.5),
        status,
        rating: Some(85),
        notes: Some("honey and smoke".to_string()),
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    }
}

mod crud {
    use super::*;

    #[test]
    fn brand_insert_get_list_count() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        db.insert_brand(&sample_brand("glen-b")).unwrap();

        let found = db.get_brand("glen-a").unwrap().unwrap();
        assert_eq!(found, sample_brand("glen-a"));
        assert!(db.get_brand("missing").unwrap().is_none());

        assert_eq!(db.count_brands().unwrap(), 2);
        assert_eq!(db.list_brands(Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn bottle_round_trips_all_fields() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        let bottle = sample_bottle("dram-one", Some("glen-a"), BottleStatus::Open);
        db.insert_bottle(&bottle).unwrap();

        assert_eq!(db.get_bottle("dram-one").unwrap().unwrap(), bottle);
    }

    #[test]
    fn tasting_and_wishlist_storage() {
        let db = setup_db();
        let tasting = Tasting {
            id: "first-dram".to_string(),
            bottle_id: None,
            tasted_at: "2026-02-01".to_string(),
            rating: Some(90),
            nose: Some("sherry".to_string()),
            palate: Some("dried fruit".to_string()),
            finish: Some("long".to_string()),
            notes: None,
            created_at: 1,
        };
        db.insert_tasting(&tasting).unwrap();
        assert_eq!(db.list_tastings(None).unwrap(), vec![tasting]);

        let entry = WishlistEntry {
            id: "grail".to_string(),
            name: "Port Ellen".to_string(),
            brand_id: None,
            max_price: None,
            priority: 10,
            notes: None,
            created_at: 1,
        };
        db.insert_wishlist_entry(&entry).unwrap();
        assert_eq!(db.count_wishlist().unwrap(), 1);
    }

    #[test]
    fn duplicate_id_insert_fails() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        assert!(db.insert_brand(&sample_brand("glen-a")).is_err());
    }
}

mod export {
    use super::*;

    #[test]
    fn export_is_ordered_by_id() {
        let db = setup_db();
        db.insert_bottle(&sample_bottle("zulu", None, BottleStatus::Sealed)).unwrap();
        db.insert_bottle(&sample_bottle("alpha", None, BottleStatus::Sealed)).unwrap();

        let snapshot = db.export_snapshot(&ExportOptions::default()).unwrap();
        let ids: Vec<&str> = snapshot
            .collection(Category::Bottles)
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["alpha", "zulu"]);
    }

    #[test]
    fn export_can_exclude_finished_bottles() {
        let db = setup_db();
        db.insert_bottle(&sample_bottle("live", None, BottleStatus::Open)).unwrap();
        db.insert_bottle(&sample_bottle("dead", None, BottleStatus::Finished)).unwrap();

        let snapshot = db
            .export_snapshot(&ExportOptions {
                categories: None,
                exclude_finished: true,
            })
            .unwrap();
        let bottles = snapshot.collection(Category::Bottles).unwrap();
        assert_eq!(bottles.len(), 1);
        assert_eq!(bottles[0]["id"], "live");
    }

    #[test]
    fn export_respects_category_selection() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();

        let snapshot = db
            .export_snapshot(&ExportOptions {
                categories: Some(vec![Category::Brands]),
                exclude_finished: false,
            })
            .unwrap();
        assert_eq!(snapshot.collection_names(), vec!["brands"]);
    }

    #[test]
    fn export_then_import_reproduces_the_collection() {
        let source = setup_db();
        source.insert_brand(&sample_brand("glen-a")).unwrap();
        source
            .insert_bottle(&sample_bottle("dram-one", Some("glen-a"), BottleStatus::Sealed))
            .unwrap();

        let snapshot = source.export_snapshot(&ExportOptions::default()).unwrap();

        let target = setup_db();
        target
            .import_snapshot(&snapshot, &ImportOptions::default(), &IdsConfig::default())
            .unwrap();

        assert_eq!(
            target.list_bottles(None).unwrap(),
            source.list_bottles(None).unwrap()
        );
        assert_eq!(
            target.list_brands(None).unwrap(),
            source.list_brands(None).unwrap()
        );
    }
}

mod snapshot_files {
    use super::*;

    #[test]
    fn plain_json_file_round_trip() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        let snapshot = db.export_snapshot(&ExportOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, snapshot.to_json_pretty().unwrap()).unwrap();

        let loaded = Snapshot::from_file(&path).unwrap();
        assert_eq!(loaded.collection(Category::Brands).unwrap().len(), 1);
        assert!(loaded.is_schema_compatible());
    }

    #[test]
    fn gzip_file_is_detected_by_magic_bytes() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        let snapshot = db.export_snapshot(&ExportOptions::default()).unwrap();
        let json = snapshot.to_json_pretty().unwrap();

        let dir = tempfile::tempdir().unwrap();
        // deliberately no .gz extension: detection must use content
        let path = dir.path().join("snapshot.json");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let loaded = Snapshot::from_file(&path).unwrap();
        assert_eq!(loaded.collection(Category::Brands).unwrap().len(), 1);
    }
}

mod statistics {
    use super::*;

    #[test]
    fn stats_aggregate_the_collection() {
        let db = setup_db();
        db.insert_brand(&sample_brand("glen-a")).unwrap();
        db.insert_bottle(&sample_bottle("one", Some("glen-a"), BottleStatus::Sealed)).unwrap();
        db.insert_bottle(&sample_bottle("two", Some("glen-a"), BottleStatus::Open)).unwrap();

        let stats = db.collection_stats().unwrap();
        assert_eq!(stats.brands, 1);
        assert_eq!(stats.bottles, 2);
        assert_eq!(stats.bottles_by_status.get("sealed"), Some(&1));
        assert_eq!(stats.bottles_by_status.get("open"), Some(&1));
        assert_eq!(stats.average_rating, Some(85.0));
        assert!((stats.total_spend - 99.0).abs() < 1e-9);
    }

    #[test]
    fn stats_on_an_empty_collection() {
        let stats = setup_db().collection_stats().unwrap();
        assert_eq!(stats.bottles, 0);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.total_spend, 0.0);
    }
}

mod id_generation {
    use super::*;

    #[test]
    fn generated_ids_respect_word_count_and_case() {
        let kebab = generate_id(&IdsConfig {
            id_words: 3,
            id_case: IdCase::Kebab,
        });
        assert_eq!(kebab.matches('-').count(), 2, "id was {}", kebab);
        assert_eq!(kebab, kebab.to_lowercase());

        let camel = generate_id(&IdsConfig {
            id_words: 2,
            id_case: IdCase::UpperCamel,
        });
        assert!(!camel.contains('-'), "id was {}", camel);
        assert!(camel.chars().next().unwrap().is_uppercase());
    }
}
