//! Collector for loaded kernel modules from `<proc>/modules`.

use std::path::{Path, PathBuf};

use crate::cancel::CancelToken;
use crate::collector::traits::FileSystem;
use crate::collector::{CollectError, Collector};
use crate::model::{Configuration, KmodConfig};

/// Reads the kernel's loaded-module listing and emits one record per
/// module, named by the first whitespace-delimited token of each
/// non-blank line.
pub struct KmodCollector<F: FileSystem> {
    fs: F,
    modules_path: PathBuf,
}

impl<F: FileSystem> KmodCollector<F> {
    /// Creates a new kernel module collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            modules_path: proc_path.as_ref().join("modules"),
        }
    }
}

impl<F: FileSystem> Collector for KmodCollector<F> {
    fn collect(&self, cancel: &CancelToken) -> Result<Vec<Configuration>, CollectError> {
        // Single cheap file read, one check up front is enough.
        if cancel.is_cancelled() {
            return Err(CollectError::Cancelled);
        }

        let listing = self.fs.read_to_string(&self.modules_path)?;

        let mut res = Vec::with_capacity(100);
        for line in listing.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.split_whitespace().next() {
                res.push(Configuration::KMod(KmodConfig {
                    name: name.to_string(),
                }));
            }
        }

        Ok(res)
    }
}
