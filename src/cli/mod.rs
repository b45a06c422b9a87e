//! CLI command definitions for caskbook.
//!
//! Arg structs only; command execution lives in `main`.

pub mod export;
pub mod import;

use crate::format::OutputFormat;
use crate::types::Category;
use clap::{Args, Parser, Subcommand, ValueEnum};
use export::ExportArgs;
use import::ImportArgs;
use std::path::PathBuf;

/// Collection category, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Bottles,
    Tastings,
    Wishlist,
    Brands,
}

impl CategoryArg {
    pub fn to_category(self) -> Category {
        match self {
            CategoryArg::Bottles => Category::Bottles,
            CategoryArg::Tastings => Category::Tastings,
            CategoryArg::Wishlist => Category::Wishlist,
            CategoryArg::Brands => Category::Brands,
        }
    }
}

/// Output format, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Markdown,
    Json,
}

impl FormatArg {
    pub fn to_format(self) -> OutputFormat {
        match self {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Whisky collection tracker with snapshot import/export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export the collection to a structured JSON snapshot
    Export(ExportArgs),

    /// Import collection data from a snapshot file
    Import(ImportArgs),

    /// List records of one category
    List(ListArgs),

    /// Show aggregate collection statistics
    Stats(StatsArgs),
}

/// Arguments for the list subcommand
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Category to list
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: FormatArg,

    /// Maximum number of records to show
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the stats subcommand
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: FormatArg,
}
