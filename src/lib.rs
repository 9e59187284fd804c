//! Library crate for `size-scanner`
//!
//! Scans a directory tree and reports, for every file and directory, its
//! aggregate size and file count.
//!
//! # Features
//!
//! - **Bounded parallel scanning**: one worker task per immediate subdirectory
//!   of the root, on a pool owned by the build call
//! - **Fail-soft walking**: unreadable entries are skipped, only an
//!   inaccessible root aborts the scan
//! - **Presentation helpers**: flatten, stable size sort, threshold filtering
//! - **Output**: terminal rows and CSV export
//!
//! # Modules
//!
//! - [`builder`]: [`TreeBuilder`], the parallel orchestrator
//! - [`scan`]: [`Scanner`], the single-threaded subtree walker
//! - [`data`]: [`Node`] and [`EntryType`]
//! - [`fs`]: filesystem access trait, OS adapter, and in-memory fake
//! - [`error`]: fatal and per-entry error types
//! - [`thread_pool`]: worker count strategies
//! - [`utils`]: size parsing/formatting, sort and filter
//! - [`output`]: terminal and CSV formatters
//! - [`metrics`]: `--profile` timings
//! - [`cli`]: command-line interface definitions

pub mod builder;
pub mod cli;
pub mod data;
pub mod error;
pub mod fs;
pub mod metrics;
pub mod output;
pub mod scan;
pub mod thread_pool;
pub mod utils;

pub use builder::{ScanReport, TreeBuilder};
pub use cli::{Args, SortOrder};
pub use data::{EntryType, Node};
pub use error::{EntryUnreadable, ScanError, SizeParseError};
pub use scan::Scanner;
