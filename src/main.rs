//! caskbook CLI entry point.

use anyhow::{Context, Result, bail};
use caskbook::cli::{Cli, Command, ListArgs, StatsArgs};
use caskbook::cli::export::ExportArgs;
use caskbook::cli::import::ImportArgs;
use caskbook::config::{Config, ConfigLoader};
use caskbook::db::Database;
use caskbook::db::export::ExportOptions;
use caskbook::db::import::{DryRunReport, ImportReport};
use caskbook::export::Snapshot;
use caskbook::format::OutputFormat;
use caskbook::import::ImportOptions;
use caskbook::{format, logging, paths};
use clap::Parser;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref())?;
    logging::init(&cli.log, cli.verbose, &config.logging.level)?;

    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());

    match &cli.command {
        Command::Export(args) => run_export(args, &db_path),
        Command::Import(args) => run_import(args, &db_path, &config),
        Command::List(args) => run_list(args, &db_path),
        Command::Stats(args) => run_stats(args, &db_path),
    }
}

fn open_database(path: &Path) -> Result<Database> {
    paths::ensure_parent_dir(path)?;
    Database::open(path).with_context(|| format!("failed to open database {}", path.display()))
}

fn run_export(args: &ExportArgs, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;

    let options = ExportOptions {
        categories: args.category_list(),
        exclude_finished: args.exclude_finished,
    };
    let snapshot = db.export_snapshot(&options)?;
    let json = snapshot.to_json_pretty()?;
    let compress = args.should_compress(Some(json.len() as u64));

    match &args.output {
        Some(path) => {
            let target = effective_output(path, compress);
            paths::ensure_parent_dir(&target)?;
            if compress {
                std::fs::write(&target, gzip_bytes(json.as_bytes())?)?;
            } else {
                std::fs::write(&target, &json)?;
            }
            info!(
                path = %target.display(),
                rows = snapshot.total_rows(),
                compressed = compress,
                "snapshot exported"
            );
            println!(
                "Exported {} record(s) to {}",
                snapshot.total_rows(),
                target.display()
            );
        }
        None => {
            if compress {
                std::io::stdout().write_all(&gzip_bytes(json.as_bytes())?)?;
            } else {
                println!("{}", json);
            }
        }
    }

    Ok(())
}

/// Append `.gz` when compression was triggered by size threshold but the
/// chosen name does not say so.
fn effective_output(path: &Path, compress: bool) -> PathBuf {
    if compress && !path.extension().is_some_and(|ext| ext == "gz") {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gz");
        PathBuf::from(name)
    } else {
        path.to_path_buf()
    }
}

fn gzip_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn run_import(args: &ImportArgs, db_path: &Path, config: &Config) -> Result<()> {
    let db = open_database(db_path)?;

    let snapshot = Snapshot::from_file(&args.file)
        .with_context(|| format!("failed to load snapshot {}", args.file.display()))?;

    let base = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options file {}", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("options file {} is not valid JSON", path.display()))?;
            ImportOptions::from_value(&value)
                .with_context(|| format!("invalid import options in {}", path.display()))?
        }
        None => ImportOptions::default(),
    };
    let options = args.apply_overrides(base)?;

    if args.dry_run {
        let preview = db.preview_import(&snapshot, &options);
        print_dry_run(&preview);
        if !preview.would_succeed {
            bail!(
                "import would fail: {}",
                preview
                    .failure_reason
                    .as_deref()
                    .unwrap_or("unknown reason")
            );
        }
        return Ok(());
    }

    info!(file = %args.file.display(), "importing snapshot");
    let report = db.import_snapshot(&snapshot, &options, &config.ids)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!(
        "Import complete: {} inserted, {} updated, {} deleted",
        report.total_inserted(),
        report.total_updated(),
        report.total_deleted()
    );
    for (category, inserted) in &report.inserted {
        let updated = report.updated.get(category).copied().unwrap_or(0);
        let deleted = report.deleted.get(category).copied().unwrap_or(0);
        let reissued = report.reissued.get(category).copied().unwrap_or(0);
        let mut line = format!("  {}: {} inserted", category, inserted);
        if updated > 0 {
            line.push_str(&format!(", {} updated", updated));
        }
        if deleted > 0 {
            line.push_str(&format!(", {} deleted", deleted));
        }
        if reissued > 0 {
            line.push_str(&format!(", {} id(s) re-issued", reissued));
        }
        println!("{}", line);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}

fn print_dry_run(preview: &DryRunReport) {
    println!("Dry run (no changes made):");
    for (category, existing) in &preview.existing {
        let insert = preview.would_insert.get(category).copied().unwrap_or(0);
        let update = preview.would_update.get(category).copied().unwrap_or(0);
        let delete = preview.would_delete.get(category).copied().unwrap_or(0);
        let reissue = preview.would_reissue.get(category).copied().unwrap_or(0);
        let mut line = format!(
            "  {}: {} existing, would insert {}",
            category, existing, insert
        );
        if update > 0 {
            line.push_str(&format!(", update {}", update));
        }
        if delete > 0 {
            line.push_str(&format!(", delete {}", delete));
        }
        if reissue > 0 {
            line.push_str(&format!(", re-issue {} id(s)", reissue));
        }
        println!("{}", line);
    }
    if let Some(ref reason) = preview.failure_reason {
        println!("  would fail: {}", reason);
    }
}

fn run_list(args: &ListArgs, db_path: &Path) -> Result<()> {
    use caskbook::cli::CategoryArg;

    let db = open_database(db_path)?;
    let output = match (args.category, args.format.to_format()) {
        (CategoryArg::Bottles, OutputFormat::Json) => {
            serde_json::to_string_pretty(&db.list_bottles(args.limit)?)?
        }
        (CategoryArg::Bottles, OutputFormat::Markdown) => {
            format::format_bottles_markdown(&db.list_bottles(args.limit)?)
        }
        (CategoryArg::Brands, OutputFormat::Json) => {
            serde_json::to_string_pretty(&db.list_brands(args.limit)?)?
        }
        (CategoryArg::Brands, OutputFormat::Markdown) => {
            format::format_brands_markdown(&db.list_brands(args.limit)?)
        }
        (CategoryArg::Tastings, OutputFormat::Json) => {
            serde_json::to_string_pretty(&db.list_tastings(args.limit)?)?
        }
        (CategoryArg::Tastings, OutputFormat::Markdown) => {
            format::format_tastings_markdown(&db.list_tastings(args.limit)?)
        }
        (CategoryArg::Wishlist, OutputFormat::Json) => {
            serde_json::to_string_pretty(&db.list_wishlist(args.limit)?)?
        }
        (CategoryArg::Wishlist, OutputFormat::Markdown) => {
            format::format_wishlist_markdown(&db.list_wishlist(args.limit)?)
        }
    };
    println!("{}", output);
    Ok(())
}

fn run_stats(args: &StatsArgs, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let stats = db.collection_stats()?;
    match args.format.to_format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Markdown => println!("{}", format::format_stats_markdown(&stats)),
    }
    Ok(())
}
