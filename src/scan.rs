//! Single-threaded subtree walker.
//!
//! [`Scanner`] performs a depth-first walk of one directory subtree and returns
//! a fully aggregated [`Node`]. It never fails: entries that cannot be stat'd
//! are skipped, directories that cannot be listed become empty directory
//! nodes, and the number of skipped entries is counted so callers can report
//! it.
//!
//! Symlinks are not followed by default; a symlink is then a leaf whose size
//! is the link's own length. With [`Scanner::follow_links`] enabled, links are
//! resolved and any link pointing back at a directory on the current walk path
//! is kept as a leaf instead of being descended.
//!
//! A `Scanner` is `Sync`, so one instance can be shared by reference between
//! the worker threads of [`TreeBuilder`](crate::builder::TreeBuilder).

use crate::data::Node;
use crate::error::EntryUnreadable;
use crate::fs::{EntryMeta, FileId, FileSystem};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Depth-first scanner over a [`FileSystem`].
pub struct Scanner<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    follow_links: bool,
    progress: Option<ProgressBar>,
    unreadable: AtomicU64,
}

impl<'a, F: FileSystem + ?Sized> Scanner<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            follow_links: false,
            progress: None,
            unreadable: AtomicU64::new(0),
        }
    }

    /// Resolve symlinks instead of treating them as leaves.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Tick `progress` once per scanned entry.
    pub fn progress(mut self, progress: Option<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Number of entries skipped so far because they could not be read.
    pub fn unreadable(&self) -> u64 {
        self.unreadable.load(Ordering::Relaxed)
    }

    /// Scans `path` and everything below it.
    ///
    /// `path` itself is always resolved, even when it is a symlink. If it
    /// cannot be stat'd the result is [`Node::unreadable`].
    pub fn scan(&self, path: &Path) -> Node {
        match self.fs.metadata(path, true) {
            Ok(meta) => self.scan_entry(path, &meta, &mut Vec::new()),
            Err(err) => {
                self.skip(EntryUnreadable::new(path, err));
                Node::unreadable(path)
            }
        }
    }

    /// Scans an entry whose metadata is already known.
    ///
    /// `ancestors` holds the ids of the directories on the walk path above
    /// `path`; it is restored to its original contents before returning.
    pub fn scan_entry(&self, path: &Path, meta: &EntryMeta, ancestors: &mut Vec<FileId>) -> Node {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }

        if !meta.is_dir() {
            return Node::file(path, meta.len);
        }

        if let Some(id) = meta.id {
            ancestors.push(id);
        }
        let children = self.scan_children(path, ancestors);
        if meta.id.is_some() {
            ancestors.pop();
        }

        Node::directory(path, children)
    }

    fn scan_children(&self, dir: &Path, ancestors: &mut Vec<FileId>) -> BTreeMap<OsString, Node> {
        let mut children = BTreeMap::new();

        let listing = match self.fs.read_dir(dir) {
            Ok(listing) => listing,
            Err(err) => {
                // Still a directory, just an empty one.
                self.skip(EntryUnreadable::new(dir, err));
                return children;
            }
        };

        for item in listing {
            let path = match item {
                Ok(path) => path,
                Err(err) => {
                    self.skip(EntryUnreadable::new(dir, err));
                    continue;
                }
            };
            let Some(name) = path.file_name().map(|n| n.to_os_string()) else {
                continue;
            };
            let Some(meta) = self.entry_metadata(&path, ancestors) else {
                continue;
            };

            let child = self.scan_entry(&path, &meta, ancestors);
            children.insert(name, child);
        }

        children
    }

    /// Stats a directory entry according to the symlink policy.
    ///
    /// Returns `None` (and counts the entry as unreadable) when the entry
    /// cannot be stat'd at all.
    pub fn entry_metadata(&self, path: &Path, ancestors: &[FileId]) -> Option<EntryMeta> {
        let lstat = match self.fs.metadata(path, false) {
            Ok(meta) => meta,
            Err(err) => {
                self.skip(EntryUnreadable::new(path, err));
                return None;
            }
        };

        if !lstat.is_symlink() || !self.follow_links {
            return Some(lstat);
        }

        match self.fs.metadata(path, true) {
            Ok(target) if target.is_dir() && target.id.is_some_and(|id| ancestors.contains(&id)) => {
                warn!(path = %path.display(), "symlink cycle detected, not descending");
                Some(lstat)
            }
            Ok(target) => Some(target),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "broken symlink, counting the link itself");
                Some(lstat)
            }
        }
    }

    fn skip(&self, err: EntryUnreadable) {
        self.unreadable.fetch_add(1, Ordering::Relaxed);
        debug!("{err}");
    }
}
