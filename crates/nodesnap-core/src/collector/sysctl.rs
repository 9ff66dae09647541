//! Collector for kernel tunables from the `<proc>/sys` tree.
//!
//! The walk is defensive: `/proc/sys` is a live pseudo-filesystem that
//! contains write-only files, permission-restricted files and, on a
//! hostile or misconfigured system, symlinks pointing outside the tree.

use std::path::{Path, PathBuf};

use crate::cancel::CancelToken;
use crate::collector::traits::{EntryKind, FileSystem};
use crate::collector::{CollectError, Collector};
use crate::model::{Configuration, SysctlConfig};

/// Recursively walks the sysctl tree, emitting one record per readable
/// regular file with `key` = the file's path and `value` = its trimmed
/// contents.
///
/// Traversal rules, checked for every visited entry:
/// - symlinks are skipped, never opened or descended into
/// - any entry whose path is not under the configured root aborts the
///   walk with [`CollectError::Traversal`]
/// - files that cannot be read are skipped, the walk continues
/// - cancellation is checked once per entry
///
/// The subtree rooted at `<root>/net` is excluded wholesale.
pub struct SysctlCollector<F: FileSystem> {
    fs: F,
    root: PathBuf,
    net_root: PathBuf,
}

impl<F: FileSystem> SysctlCollector<F> {
    /// Creates a new sysctl collector rooted at `<proc_path>/sys`.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl AsRef<Path>) -> Self {
        let root = proc_path.as_ref().join("sys");
        let net_root = root.join("net");
        Self { fs, root, net_root }
    }

    fn walk(
        &self,
        dir: &Path,
        cancel: &CancelToken,
        res: &mut Vec<Configuration>,
    ) -> Result<(), CollectError> {
        for entry in self.fs.read_dir(dir)? {
            if cancel.is_cancelled() {
                return Err(CollectError::Cancelled);
            }

            // Skip symlinks to prevent directory traversal attacks.
            if entry.kind == EntryKind::Symlink {
                continue;
            }

            // Ensure the path is under the root (defense in depth).
            if !entry.path.starts_with(&self.root) {
                return Err(CollectError::Traversal(entry.path));
            }

            if entry.path.starts_with(&self.net_root) {
                continue;
            }

            match entry.kind {
                EntryKind::Dir => self.walk(&entry.path, cancel, res)?,
                EntryKind::File => {
                    // Skip files we can't read (some proc files are
                    // write-only or restricted).
                    if let Ok(content) = self.fs.read_to_string(&entry.path) {
                        res.push(Configuration::Sysctl(SysctlConfig {
                            key: entry.path.to_string_lossy().into_owned(),
                            value: content.trim().to_string(),
                        }));
                    }
                }
                EntryKind::Symlink | EntryKind::Other => {}
            }
        }
        Ok(())
    }
}

impl<F: FileSystem> Collector for SysctlCollector<F> {
    fn collect(&self, cancel: &CancelToken) -> Result<Vec<Configuration>, CollectError> {
        let mut res = Vec::with_capacity(500);
        self.walk(&self.root, cancel, &mut res)?;
        Ok(res)
    }
}
