//! Error types for tree building and threshold parsing.
//!
//! Errors come in two tiers:
//!
//! - [`ScanError`] is returned from [`TreeBuilder::build`](crate::builder::TreeBuilder::build)
//!   and aborts the scan. Only a root that cannot be stat'd or listed (or a
//!   worker pool that cannot be started) ends up here.
//! - [`EntryUnreadable`] describes a single entry that could not be stat'd or
//!   listed. It never leaves the scanner: it is logged, counted, and the entry
//!   contributes nothing to the aggregate totals.
//!
//! [`SizeParseError`] belongs to the configuration layer and is raised while
//! parsing `--threshold`, before any scan starts.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or cannot be listed.
    #[error("cannot access scan root '{}': {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bounded worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    /// Wraps an I/O error raised while accessing the root.
    pub fn root(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::RootUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Returns the I/O error kind for root failures.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::RootUnavailable { source, .. } => Some(source.kind()),
            Self::WorkerPool(_) => None,
        }
    }
}

/// A single entry that was skipped during a scan.
#[derive(Debug, Error)]
#[error("skipping unreadable entry '{}': {source}", .path.display())]
pub struct EntryUnreadable {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl EntryUnreadable {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while parsing size strings such as `10M` or `500K`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("invalid size '{input}': {reason}")]
    InvalidThreshold { input: String, reason: String },
}

impl SizeParseError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
