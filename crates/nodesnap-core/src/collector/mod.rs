//! Configuration collectors for the node snapshot.
//!
//! Each collector gathers one category of low-level configuration:
//!
//! - [`KmodCollector`] — loaded kernel modules from `<proc>/modules`
//! - [`SystemdCollector`] — systemd unit properties via the service manager
//! - [`GrubCollector`] — kernel boot parameters from `<proc>/cmdline`
//! - [`SysctlCollector`] — kernel tunables from the `<proc>/sys` tree
//!
//! Collectors are independent and fail independently; the snapshotter runs
//! them concurrently under one shared [`CancelToken`]. Filesystem access
//! goes through the [`FileSystem`] trait so tests can substitute
//! [`MockFs`] without touching collector logic, and the systemd query goes
//! through [`PropertyQuery`] for the same reason.
//!
//! [`CancelToken`]: crate::cancel::CancelToken
//! [`FileSystem`]: traits::FileSystem
//! [`MockFs`]: mock::MockFs
//! [`PropertyQuery`]: systemd::PropertyQuery

mod factory;
mod grub;
mod kmod;
pub mod mock;
mod sysctl;
mod systemd;
pub mod traits;

use std::io;
use std::path::PathBuf;

use crate::cancel::CancelToken;
use crate::model::Configuration;

pub use factory::{CollectorFactory, DefaultCollectorFactory};
pub use grub::GrubCollector;
pub use kmod::KmodCollector;
pub use sysctl::SysctlCollector;
pub use systemd::{DEFAULT_UNITS, PropertyQuery, SystemctlQuery, SystemdCollector};
pub use traits::{FileSystem, RealFs};

/// A capability that gathers one category of configuration data.
///
/// Implementations must be safe to share across threads; the snapshotter
/// invokes all collectors concurrently.
pub trait Collector: Send + Sync {
    /// Collects all records of this collector's category.
    ///
    /// The cancellation token is checked at coarse-grained points; once it
    /// is observed cancelled, the collector returns
    /// [`CollectError::Cancelled`].
    fn collect(&self, cancel: &CancelToken) -> Result<Vec<Configuration>, CollectError>;
}

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// The underlying source could not be read. The wrapped
    /// `io::ErrorKind` distinguishes a missing source from a
    /// permission problem.
    Io(io::Error),
    /// Querying the service manager for a unit failed.
    Query { unit: String, reason: String },
    /// A visited path escaped the configured tree root.
    Traversal(PathBuf),
    /// The cancellation token was observed cancelled.
    Cancelled,
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Query { unit, reason } => {
                write!(f, "failed to query unit {}: {}", unit, reason)
            }
            CollectError::Traversal(path) => {
                write!(f, "path traversal detected: {}", path.display())
            }
            CollectError::Cancelled => write!(f, "collection cancelled"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Io(e)
    }
}
