//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the collectors to work with both the real
//! `/proc` filesystem and an in-memory mock. Unlike a plain path listing,
//! `read_dir` reports each entry's kind without following symlinks, which
//! the sysctl tree walker relies on for its traversal-safety rules.

use std::io;
use std::path::{Path, PathBuf};

/// The kind of a directory entry, as reported without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link. Never followed by the collectors.
    Symlink,
    /// Anything else (sockets, devices, ...).
    Other,
}

/// One directory entry: its path and its (non-followed) kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Abstraction for filesystem operations.
///
/// Implementations must be shareable across threads; collectors run
/// concurrently during a snapshot.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Lists entries of a directory, sorted by path.
    ///
    /// Entry kinds are determined without following symlinks, so a
    /// symlink to a directory is reported as [`EntryKind::Symlink`].
    /// Sorting keeps a collector's output order stable across runs.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // file_type() reports the symlink itself, not its target.
            let file_type = entry.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirEntry {
                path: entry.path(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
