//! CLI interface definitions for the `size-scanner` application.
//!
//! This module defines command-line arguments using [`clap`] and exposes:
//!
//! - [`Args`]: the main struct parsed from CLI inputs
//! - [`SortOrder`]: ascending or descending order by aggregated size
//!
//! # Example
//!
//! ```bash
//! size-scanner ~/projects --threshold 10M --desc --output sizes.csv
//! ```

use crate::thread_pool::{ThreadPoolStrategy, default_workers, worker_count};
use crate::utils::parse_size;
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line arguments for the tree-size viewer.
#[derive(Parser, Debug)]
#[command(name = "size-scanner", version, about = "Fast tree-size viewer (cross-platform).")]
pub struct Args {
    /// Directory to scan (defaults to the current directory)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Minimum size threshold (e.g. 10M, 500K). Default: 0
    #[arg(short, long, value_name = "SIZE", default_value = "0", value_parser = parse_size)]
    pub threshold: u64,

    /// Ascending order (default)
    #[arg(short = 'a', long = "asc", conflicts_with = "desc")]
    pub asc: bool,

    /// Descending order
    #[arg(short = 'd', long = "desc")]
    pub desc: bool,

    /// Limit the number of worker threads (default: min(32, 2 x CPUs))
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Worker sizing strategy (hidden experimental flag)
    #[arg(long = "threads-strategy", value_enum, default_value_t = ThreadPoolStrategy::Default, hide = true)]
    pub threads_strategy: ThreadPoolStrategy,

    /// Follow symbolic links (with cycle detection)
    #[arg(long, default_value_t = false)]
    pub follow_links: bool,

    /// Write rows to a CSV file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show a timing summary after the scan
    #[arg(long, default_value_t = false)]
    pub profile: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Order in which rows are printed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl Args {
    /// Sort order selected by `--asc` / `--desc`.
    pub fn sort_order(&self) -> SortOrder {
        if self.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// Number of worker threads for the scan.
    ///
    /// `--threads N` always wins; otherwise the strategy decides.
    pub fn worker_threads(&self) -> Result<usize> {
        match (self.threads, self.threads_strategy) {
            (Some(n), _) => worker_count(ThreadPoolStrategy::Fixed, n),
            (None, ThreadPoolStrategy::Fixed) => Ok(default_workers()),
            (None, strategy) => worker_count(strategy, 0),
        }
    }

    /// Log level filter derived from `-v` flags.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// A single record of output (used for CSV serialization).
///
/// # Fields
/// * `kind` - "DIR" or "FILE"
/// * `file_count` - Files in the subtree
/// * `size_bytes` - Aggregated size in bytes
/// * `size_human` - Human-readable size (e.g., "1.5 KiB")
/// * `path` - Path to the file or directory
#[derive(Debug, serde::Serialize)]
pub struct CsvEntry {
    pub kind: String,
    pub file_count: u64,
    pub size_bytes: u64,
    pub size_human: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["size-scanner"]).unwrap();
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.threshold, 0);
        assert_eq!(args.sort_order(), SortOrder::Asc);
        assert!(!args.follow_links);
        assert_eq!(args.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_threshold_with_suffix() {
        let args = Args::try_parse_from(["size-scanner", "/tmp", "-t", "10M", "-d"]).unwrap();
        assert_eq!(args.threshold, 10 * 1024 * 1024);
        assert_eq!(args.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(Args::try_parse_from(["size-scanner", "-t", "lots"]).is_err());
    }

    #[test]
    fn test_asc_and_desc_conflict() {
        assert!(Args::try_parse_from(["size-scanner", "-a", "-d"]).is_err());
    }

    #[test]
    fn test_threads_override_strategy() {
        let args = Args::try_parse_from(["size-scanner", "--threads", "3"]).unwrap();
        assert_eq!(args.worker_threads().unwrap(), 3);

        let args = Args::try_parse_from(["size-scanner", "--threads", "0"]).unwrap();
        assert!(args.worker_threads().is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = Args::try_parse_from(["size-scanner", "-vv"]).unwrap();
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
    }
}
