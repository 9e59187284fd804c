//! Bounded-parallel tree construction.
//!
//! [`TreeBuilder::build`] lists the scan root, turns files found directly under
//! it into leaf nodes on the calling thread, and hands every immediate
//! subdirectory to a worker of a dedicated [`rayon::ThreadPool`]. Each worker
//! runs a single-threaded [`Scanner`] over its whole subtree and stores the
//! finished node in its own slot of a [`DashMap`]; no worker ever waits on
//! another. Once the pool scope has drained, the pool is dropped and the root
//! node is assembled from the collected children.
//!
//! Parallelism is one level deep: workers never spawn further tasks, so no
//! task ever blocks on another.

use crate::data::Node;
use crate::error::{EntryUnreadable, ScanError};
use crate::fs::{EntryMeta, FileId, FileSystem, OsFileSystem};
use crate::scan::Scanner;
use crate::thread_pool::{build_pool, default_workers};
use dashmap::DashMap;
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The fully aggregated tree.
    pub root: Node,
    /// Entries skipped because they could not be stat'd or listed.
    pub unreadable: u64,
    /// Worker threads actually started (0 when the root had no subdirectories).
    pub workers: usize,
}

/// Builds a [`Node`] tree for a scan root using a bounded worker pool.
///
/// # Examples
///
/// ```rust
/// use size_scanner::builder::TreeBuilder;
/// use size_scanner::fs::MemoryFs;
/// use std::path::Path;
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("/r/a", 10).add_file("/r/d/b", 20).add_file("/r/d/c", 5);
///
/// let root = TreeBuilder::with_fs(fs).workers(2).build(Path::new("/r")).unwrap();
/// assert_eq!(root.size, 35);
/// assert_eq!(root.file_count, 3);
/// ```
pub struct TreeBuilder<F: FileSystem = OsFileSystem> {
    fs: F,
    workers: usize,
    follow_links: bool,
    progress: Option<ProgressBar>,
}

impl TreeBuilder<OsFileSystem> {
    /// Builder over the real filesystem with the default worker count.
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Default for TreeBuilder<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> TreeBuilder<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            workers: default_workers(),
            follow_links: false,
            progress: None,
        }
    }

    /// Upper bound on worker threads. Values below 1 are treated as 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Resolve symlinks while scanning (with cycle detection).
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Spinner ticked once per scanned entry.
    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scans `root` and returns the aggregated tree.
    ///
    /// # Errors
    /// [`ScanError::RootUnavailable`] when `root` cannot be stat'd or listed.
    /// Unreadable entries below the root never cause an error.
    pub fn build(&self, root: &Path) -> Result<Node, ScanError> {
        self.build_report(root).map(|report| report.root)
    }

    /// Like [`build`](Self::build), also reporting skipped entries and workers used.
    pub fn build_report(&self, root: &Path) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let root_meta = self
            .fs
            .metadata(root, true)
            .map_err(|e| ScanError::root(root, e))?;

        let scanner = Scanner::new(&self.fs)
            .follow_links(self.follow_links)
            .progress(self.progress.clone());

        if !root_meta.is_dir() {
            debug!(root = %root.display(), "scan root is not a directory");
            return Ok(ScanReport {
                root: scanner.scan_entry(root, &root_meta, &mut Vec::new()),
                unreadable: 0,
                workers: 0,
            });
        }

        let listing = self
            .fs
            .read_dir(root)
            .map_err(|e| ScanError::root(root, e))?;

        let ancestors: Vec<FileId> = root_meta.id.into_iter().collect();
        let mut children: BTreeMap<OsString, Node> = BTreeMap::new();
        let mut subdirs: Vec<(OsString, PathBuf, EntryMeta)> = Vec::new();
        let mut listing_errors = 0;

        for item in listing {
            let path = match item {
                Ok(path) => path,
                Err(err) => {
                    listing_errors += 1;
                    debug!("{}", EntryUnreadable::new(root, err));
                    continue;
                }
            };
            let Some(name) = path.file_name().map(|n| n.to_os_string()) else {
                continue;
            };
            let Some(meta) = scanner.entry_metadata(&path, &ancestors) else {
                continue;
            };

            if meta.is_dir() {
                subdirs.push((name, path, meta));
            } else {
                let node = scanner.scan_entry(&path, &meta, &mut Vec::new());
                children.insert(name, node);
            }
        }

        let workers = if subdirs.is_empty() {
            0
        } else {
            self.workers.min(subdirs.len())
        };

        if workers > 0 {
            info!(
                root = %root.display(),
                subdirs = subdirs.len(),
                workers,
                "dispatching subdirectory scans"
            );

            let pool = build_pool(workers)?;
            let results: DashMap<OsString, Node> = DashMap::with_capacity(subdirs.len());

            pool.scope(|s| {
                for (name, path, meta) in &subdirs {
                    let scanner = &scanner;
                    let results = &results;
                    let ancestors = &ancestors;
                    s.spawn(move |_| {
                        let mut ancestors = ancestors.clone();
                        let node = scanner.scan_entry(path, meta, &mut ancestors);
                        results.insert(name.clone(), node);
                    });
                }
            });
            drop(pool);

            children.extend(results);
        }

        let root_node = Node::directory(root, children);
        let unreadable = scanner.unreadable() + listing_errors;

        info!(
            root = %root.display(),
            size = root_node.size,
            files = root_node.file_count,
            unreadable,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        Ok(ScanReport {
            root: root_node,
            unreadable,
            workers,
        })
    }
}
