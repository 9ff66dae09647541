//! In-memory mock filesystem for testing collectors without real `/proc`.
//!
//! `MockFs` simulates a filesystem in memory, including symlinks and
//! permission-denied files, so the traversal-safety rules of the sysctl
//! walker can be exercised in plain unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::{DirEntry, EntryKind, FileSystem};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: BTreeMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: BTreeSet<PathBuf>,
    /// Symlinks and their (unused) targets.
    symlinks: BTreeMap<PathBuf, PathBuf>,
    /// Files that exist but fail to read with permission denied.
    unreadable: BTreeSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory, including its parents.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a symlink pointing at `target`.
    ///
    /// Collectors never follow symlinks, so the target may point anywhere,
    /// including outside any mocked tree.
    pub fn add_symlink(&mut self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.symlinks
            .insert(path, target.as_ref().to_path_buf());
    }

    /// Adds a file whose reads fail with `PermissionDenied`.
    ///
    /// Models write-only or restricted proc pseudo-files.
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.unreadable.insert(path);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            ));
        }

        let mut entries = Vec::new();
        for (p, kind) in self
            .files
            .keys()
            .chain(self.unreadable.iter())
            .map(|p| (p, EntryKind::File))
            .chain(self.symlinks.keys().map(|p| (p, EntryKind::Symlink)))
            .chain(self.directories.iter().map(|p| (p, EntryKind::Dir)))
        {
            if p.parent() == Some(path) {
                entries.push(DirEntry {
                    path: p.clone(),
                    kind,
                });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/sys/kernel/ostype", "Linux\n");

        let entries = fs.read_dir(Path::new("/proc/sys")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, Path::new("/proc/sys/kernel"));
        assert_eq!(entries[0].kind, EntryKind::Dir);
    }

    #[test]
    fn test_read_dir_reports_kinds() {
        let mut fs = MockFs::new();
        fs.add_file("/root/file", "x");
        fs.add_dir("/root/dir");
        fs.add_symlink("/root/link", "/elsewhere");

        let entries = fs.read_dir(Path::new("/root")).unwrap();
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        // Sorted: dir, file, link.
        assert_eq!(
            kinds,
            [EntryKind::Dir, EntryKind::File, EntryKind::Symlink]
        );
    }

    #[test]
    fn test_unreadable_file() {
        let mut fs = MockFs::new();
        fs.add_unreadable("/proc/sys/vm/drop_caches");

        let err = fs
            .read_to_string(Path::new("/proc/sys/vm/drop_caches"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        // Still listed as a file.
        let entries = fs.read_dir(Path::new("/proc/sys/vm")).unwrap();
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[test]
    fn test_missing_paths() {
        let fs = MockFs::new();
        assert!(fs.read_to_string(Path::new("/missing")).is_err());
        assert!(fs.read_dir(Path::new("/missing")).is_err());
    }
}
