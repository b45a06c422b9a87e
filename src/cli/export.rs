//! Export subcommand for the caskbook CLI.

use super::CategoryArg;
use crate::types::Category;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export subcommand
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Force gzip compression (auto-detected from .gz extension otherwise)
    #[arg(long)]
    pub gzip: bool,

    /// Comma-separated list of categories to export
    #[arg(long, value_enum, value_delimiter = ',')]
    pub categories: Vec<CategoryArg>,

    /// Leave out bottles that have been finished
    #[arg(long)]
    pub exclude_finished: bool,

    /// Automatically compress if output exceeds this size
    ///
    /// Accepts human-readable sizes: 100KB, 1MB, etc.
    #[arg(long, value_name = "SIZE")]
    pub compress_threshold: Option<String>,
}

impl ExportArgs {
    /// Category selection, or `None` for all four.
    pub fn category_list(&self) -> Option<Vec<Category>> {
        if self.categories.is_empty() {
            None
        } else {
            Some(self.categories.iter().map(|c| c.to_category()).collect())
        }
    }

    /// Parse the compress threshold into bytes.
    pub fn compress_threshold_bytes(&self) -> Option<u64> {
        self.compress_threshold.as_ref().and_then(|s| parse_size(s))
    }

    /// Decide whether the output should be gzip compressed.
    pub fn should_compress(&self, output_size: Option<u64>) -> bool {
        if self.gzip {
            return true;
        }

        if let Some(ref path) = self.output
            && path.extension().is_some_and(|ext| ext == "gz")
        {
            return true;
        }

        if let (Some(threshold), Some(size)) = (self.compress_threshold_bytes(), output_size) {
            return size > threshold;
        }

        false
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports B, KB, MB, GB (case-insensitive); a bare number is bytes.
fn parse_size(s: &str) -> Option<u64> {
    // Longest suffix first, so "KB" is not read as a malformed "B".
    const UNITS: [(&str, u64); 4] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10), ("B", 1)];

    let s = s.trim().to_uppercase();
    for (suffix, scale) in UNITS {
        if let Some(num) = s.strip_suffix(suffix) {
            return num.trim().parse::<u64>().ok().map(|n| n * scale);
        }
    }
    s.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            output: None,
            gzip: false,
            categories: vec![],
            exclude_finished: false,
            compress_threshold: None,
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100"), Some(100));
        assert_eq!(parse_size("100B"), Some(100));
        assert_eq!(parse_size("100KB"), Some(100 * 1024));
        assert_eq!(parse_size("100kb"), Some(100 * 1024));
        assert_eq!(parse_size("1MB"), Some(1024 * 1024));
        assert_eq!(parse_size("1GB"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("a dram"), None);
    }

    #[test]
    fn test_category_list_empty_means_all() {
        assert_eq!(args().category_list(), None);

        let mut a = args();
        a.categories = vec![CategoryArg::Brands];
        assert_eq!(a.category_list(), Some(vec![Category::Brands]));
    }

    #[test]
    fn test_should_compress() {
        let mut a = args();
        a.gzip = true;
        assert!(a.should_compress(None));

        let mut a = args();
        a.output = Some(PathBuf::from("snapshot.json.gz"));
        assert!(a.should_compress(None));

        let mut a = args();
        a.compress_threshold = Some("100KB".to_string());
        assert!(!a.should_compress(Some(50 * 1024)));
        assert!(a.should_compress(Some(150 * 1024)));
        assert!(!a.should_compress(None));
    }
}
