//! Data structures for representing the scanned tree.
//!
//! A scan produces a single [`Node`] tree. Directory nodes own their children
//! and carry the sizes and file counts of their whole subtree, so any node can
//! be printed without walking its descendants again.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// One file or directory discovered during a scan.
///
/// # Fields
/// * `path` - Path to the entry as reached from the scan root
/// * `size` - Byte length for files, sum of all descendant files for directories
/// * `file_count` - Number of files in the subtree (1 for a file)
/// * `entry_type` - Kind of entry
/// * `children` - Child nodes keyed by entry name (empty for files)
///
/// Nodes are built bottom-up and are read-only afterwards. Directory totals
/// are computed by [`Node::directory`], the only way to build a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub path: PathBuf,
    pub size: u64,
    pub file_count: u64,
    pub entry_type: EntryType,
    children: BTreeMap<OsString, Node>,
}

/// Represents the type of a scanned entry.
///
/// # Variants
/// * `File` - A regular file or any other non-directory (including unfollowed symlinks)
/// * `Dir` - A directory
/// * `Unreadable` - A path that could not be stat'd at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum EntryType {
    File,
    Dir,
    Unreadable,
}

impl EntryType {
    /// Returns the one-letter tag used in terminal output.
    pub fn tag(&self) -> &'static str {
        match self {
            EntryType::File => "F",
            EntryType::Dir => "D",
            EntryType::Unreadable => "?",
        }
    }

    /// Returns a string representation of the entry type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::File => "FILE",
            EntryType::Dir => "DIR",
            EntryType::Unreadable => "UNREADABLE",
        }
    }
}

impl Node {
    /// Creates a leaf node for a file of `size` bytes.
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            file_count: 1,
            entry_type: EntryType::File,
            children: BTreeMap::new(),
        }
    }

    /// Creates a directory node, aggregating sizes and counts of `children`.
    pub fn directory(path: impl Into<PathBuf>, children: BTreeMap<OsString, Node>) -> Self {
        let (size, file_count) = children
            .values()
            .fold((0u64, 0u64), |(size, count), child| {
                (size + child.size, count + child.file_count)
            });

        Self {
            path: path.into(),
            size,
            file_count,
            entry_type: EntryType::Dir,
            children,
        }
    }

    /// Creates the placeholder returned when a path cannot be stat'd.
    pub fn unreadable(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            file_count: 0,
            entry_type: EntryType::Unreadable,
            children: BTreeMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    /// Final path component, or the whole path for roots such as `/` or `.`.
    pub fn name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| self.path.as_os_str())
    }

    /// Direct children keyed by entry name.
    pub fn children(&self) -> &BTreeMap<OsString, Node> {
        &self.children
    }

    /// Looks up a direct child by entry name.
    pub fn child(&self, name: impl AsRef<OsStr>) -> Option<&Node> {
        self.children.get(name.as_ref())
    }

    /// Follows a relative path of entry names down the tree.
    pub fn descendant(&self, rel: impl AsRef<Path>) -> Option<&Node> {
        rel.as_ref()
            .components()
            .try_fold(self, |node, comp| node.child(comp.as_os_str()))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a subtree contains at least its own root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first pre-order iteration over this node and all descendants.
    ///
    /// Siblings are visited in entry-name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator returned by [`Node::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.values().rev());
        Some(node)
    }
}
