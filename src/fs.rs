//! Filesystem access used by the scanner.
//!
//! Everything the scanner needs from the operating system goes through the
//! [`FileSystem`] trait: one stat call and one directory listing. The real
//! implementation is [`OsFileSystem`]; [`MemoryFs`] is an in-memory tree used
//! to exercise aggregation, failure, and symlink handling without touching disk.

use std::collections::{BTreeMap, VecDeque};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Kind of a filesystem entry as reported by stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

/// Device and inode pair identifying a directory for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub dev: u64,
    pub ino: u64,
}

/// The subset of stat output the scanner uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub kind: FileKind,
    /// Byte length (`st_size`).
    pub len: u64,
    /// `None` on platforms without stable inode numbers.
    pub id: Option<FileId>,
}

impl EntryMeta {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// Result of listing a directory: the listing itself may fail, and so may
/// each individual item.
pub type DirListing = Vec<io::Result<PathBuf>>;

/// Read-only filesystem capability.
pub trait FileSystem: Send + Sync {
    /// Stats `path`. When `follow_links` is false a symlink is reported as
    /// [`FileKind::Symlink`] instead of its target.
    fn metadata(&self, path: &Path, follow_links: bool) -> io::Result<EntryMeta>;

    /// Lists the immediate entries of `path` as full paths (`path.join(name)`).
    fn read_dir(&self, path: &Path) -> io::Result<DirListing>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn metadata(&self, path: &Path, follow_links: bool) -> io::Result<EntryMeta> {
        (**self).metadata(path, follow_links)
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListing> {
        (**self).read_dir(path)
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn metadata(&self, path: &Path, follow_links: bool) -> io::Result<EntryMeta> {
        let meta = if follow_links {
            std::fs::metadata(path)?
        } else {
            std::fs::symlink_metadata(path)?
        };
        Ok(EntryMeta::from(&meta))
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListing> {
        Ok(std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect())
    }
}

impl From<&std::fs::Metadata> for EntryMeta {
    fn from(meta: &std::fs::Metadata) -> Self {
        let file_type = meta.file_type();
        let kind = if file_type.is_dir() {
            FileKind::Dir
        } else if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };

        Self {
            kind,
            len: meta.len(),
            id: file_id(meta),
        }
    }
}

#[cfg(unix)]
fn file_id(meta: &std::fs::Metadata) -> Option<FileId> {
    Some(FileId {
        dev: meta.dev(),
        ino: meta.ino(),
    })
}

#[cfg(not(unix))]
fn file_id(_meta: &std::fs::Metadata) -> Option<FileId> {
    None
}

// Matches Linux's MAXSYMLINKS.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
enum MemKind {
    File { len: u64 },
    Dir { listable: bool },
    Symlink { target: PathBuf },
    Unstatable,
}

#[derive(Debug, Clone)]
struct MemEntry {
    ino: u64,
    kind: MemKind,
}

/// In-memory [`FileSystem`].
///
/// Parent directories are created implicitly. Paths are resolved component
/// by component, so symlinks to directories can be walked through just like
/// on a real filesystem.
///
/// ```rust
/// use size_scanner::fs::{FileSystem, MemoryFs};
/// use std::path::Path;
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("/data/a.bin", 10).add_file("/data/sub/b.bin", 20);
///
/// assert_eq!(fs.read_dir(Path::new("/data")).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    entries: BTreeMap<PathBuf, MemEntry>,
    next_ino: u64,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regular file of `len` bytes.
    pub fn add_file(&mut self, path: impl AsRef<Path>, len: u64) -> &mut Self {
        self.insert(path.as_ref(), MemKind::File { len })
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.insert(path.as_ref(), MemKind::Dir { listable: true })
    }

    /// Adds a directory that can be stat'd but not listed.
    pub fn add_unlistable_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.insert(path.as_ref(), MemKind::Dir { listable: false })
    }

    /// Adds a symlink pointing at `target` (absolute, or relative to the link's directory).
    pub fn add_symlink(&mut self, path: impl AsRef<Path>, target: impl Into<PathBuf>) -> &mut Self {
        self.insert(
            path.as_ref(),
            MemKind::Symlink {
                target: target.into(),
            },
        )
    }

    /// Adds an entry that shows up in its parent's listing but fails to stat.
    pub fn add_unstatable(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.insert(path.as_ref(), MemKind::Unstatable)
    }

    fn insert(&mut self, path: &Path, kind: MemKind) -> &mut Self {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            if !self.entries.contains_key(ancestor) {
                let ino = self.allocate_ino();
                self.entries.insert(
                    ancestor.to_path_buf(),
                    MemEntry {
                        ino,
                        kind: MemKind::Dir { listable: true },
                    },
                );
            }
        }

        let ino = self.allocate_ino();
        self.entries.insert(path.to_path_buf(), MemEntry { ino, kind });
        self
    }

    fn allocate_ino(&mut self) -> u64 {
        self.next_ino += 1;
        self.next_ino
    }

    /// Resolves `path` to the key of an existing entry.
    fn resolve(&self, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
        let mut queue: VecDeque<Part> = parts(path).into();
        let mut current = PathBuf::new();
        let mut hops = 0;

        while let Some(part) = queue.pop_front() {
            let name = match part {
                Part::Root => {
                    current = PathBuf::from(std::path::MAIN_SEPARATOR_STR);
                    continue;
                }
                Part::Parent => {
                    current.pop();
                    continue;
                }
                Part::Name(name) => name,
            };

            let candidate = current.join(&name);
            let entry = self.entries.get(&candidate).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such entry: {}", candidate.display()),
                )
            })?;
            let is_last = queue.is_empty();

            match &entry.kind {
                MemKind::Symlink { target } if !is_last || follow_last => {
                    hops += 1;
                    if hops > MAX_SYMLINK_HOPS {
                        return Err(io::Error::other("too many levels of symbolic links"));
                    }
                    for part in parts(target).into_iter().rev() {
                        queue.push_front(part);
                    }
                }
                MemKind::Unstatable => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("permission denied: {}", candidate.display()),
                    ));
                }
                MemKind::File { .. } | MemKind::Symlink { .. } if !is_last => {
                    return Err(io::Error::other(format!(
                        "not a directory: {}",
                        candidate.display()
                    )));
                }
                _ => current = candidate,
            }
        }

        if self.entries.contains_key(&current) {
            Ok(current)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such entry: {}", path.display()),
            ))
        }
    }
}

enum Part {
    Root,
    Parent,
    Name(OsString),
}

fn parts(path: &Path) -> Vec<Part> {
    path.components()
        .filter_map(|c| match c {
            Component::Prefix(_) | Component::RootDir => Some(Part::Root),
            Component::CurDir => None,
            Component::ParentDir => Some(Part::Parent),
            Component::Normal(name) => Some(Part::Name(name.to_os_string())),
        })
        .collect()
}

impl FileSystem for MemoryFs {
    fn metadata(&self, path: &Path, follow_links: bool) -> io::Result<EntryMeta> {
        let resolved = self.resolve(path, follow_links)?;
        let entry = &self.entries[&resolved];
        let (kind, len) = match &entry.kind {
            MemKind::File { len } => (FileKind::File, *len),
            MemKind::Dir { .. } => (FileKind::Dir, 0),
            MemKind::Symlink { target } => {
                (FileKind::Symlink, target.as_os_str().len() as u64)
            }
            MemKind::Unstatable => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
        };

        Ok(EntryMeta {
            kind,
            len,
            id: Some(FileId {
                dev: 0,
                ino: entry.ino,
            }),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListing> {
        let resolved = self.resolve(path, true)?;
        match self.entries[&resolved].kind {
            MemKind::Dir { listable: true } => {}
            MemKind::Dir { listable: false } => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("cannot list {}", path.display()),
                ));
            }
            _ => {
                return Err(io::Error::other(format!(
                    "not a directory: {}",
                    path.display()
                )));
            }
        }

        Ok(self
            .entries
            .keys()
            .filter(|key| key.parent() == Some(resolved.as_path()))
            .filter_map(|key| key.file_name())
            .map(|name| Ok(path.join(name)))
            .collect())
    }
}
