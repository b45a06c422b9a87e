//! caskbook - whisky collection tracking with snapshot import/export.
//!
//! The collection lives in a local SQLite database, partitioned into
//! four categories: bottles, tastings, wishlist and brands. Snapshots
//! are flat JSON documents; an import run is parameterized by a single
//! [`import::ImportOptions`] value carrying per-category inclusion
//! flags and replace/add/merge conflict policies.

pub mod cli;
pub mod config;
pub mod db;
pub mod export;
pub mod format;
pub mod import;
pub mod logging;
pub mod paths;
pub mod types;
