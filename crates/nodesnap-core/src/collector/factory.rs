//! Factory for constructing the four collector variants.
//!
//! The snapshotter depends only on [`CollectorFactory`], so tests can
//! swap in a factory producing stub collectors without touching
//! orchestration logic.

use std::path::PathBuf;

use crate::collector::grub::GrubCollector;
use crate::collector::kmod::KmodCollector;
use crate::collector::sysctl::SysctlCollector;
use crate::collector::systemd::{DEFAULT_UNITS, SystemctlQuery, SystemdCollector};
use crate::collector::traits::{FileSystem, RealFs};
use crate::collector::Collector;

/// Creates collectors with their dependencies.
pub trait CollectorFactory: Send + Sync {
    /// Creates the kernel module collector.
    fn kmod_collector(&self) -> Box<dyn Collector>;
    /// Creates the systemd unit collector.
    fn systemd_collector(&self) -> Box<dyn Collector>;
    /// Creates the boot parameter collector.
    fn grub_collector(&self) -> Box<dyn Collector>;
    /// Creates the sysctl tunable collector.
    fn sysctl_collector(&self) -> Box<dyn Collector>;
}

/// Factory wiring collectors to a filesystem, a proc path and the
/// configured systemd units. Construction only, no I/O.
pub struct DefaultCollectorFactory<F: FileSystem + Clone + 'static> {
    fs: F,
    proc_path: PathBuf,
    /// Systemd units to query. Exposed so callers can override the
    /// default set.
    pub systemd_units: Vec<String>,
}

impl DefaultCollectorFactory<RealFs> {
    /// Creates a factory with production dependencies: the real
    /// filesystem rooted at `/proc` and the default unit set.
    pub fn new() -> Self {
        Self::with_fs(RealFs::new(), "/proc")
    }
}

impl Default for DefaultCollectorFactory<RealFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem + Clone + 'static> DefaultCollectorFactory<F> {
    /// Creates a factory over an arbitrary filesystem and proc path.
    pub fn with_fs(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            systemd_units: DEFAULT_UNITS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the systemd unit list.
    pub fn systemd_units(mut self, units: Vec<String>) -> Self {
        self.systemd_units = units;
        self
    }
}

impl<F: FileSystem + Clone + 'static> CollectorFactory for DefaultCollectorFactory<F> {
    fn kmod_collector(&self) -> Box<dyn Collector> {
        Box::new(KmodCollector::new(self.fs.clone(), &self.proc_path))
    }

    fn systemd_collector(&self) -> Box<dyn Collector> {
        Box::new(SystemdCollector::new(
            self.systemd_units.clone(),
            SystemctlQuery::new(),
        ))
    }

    fn grub_collector(&self) -> Box<dyn Collector> {
        Box::new(GrubCollector::new(self.fs.clone(), &self.proc_path))
    }

    fn sysctl_collector(&self) -> Box<dyn Collector> {
        Box::new(SysctlCollector::new(self.fs.clone(), &self.proc_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_configured_units_propagate() {
        let factory = DefaultCollectorFactory::with_fs(MockFs::new(), "/proc")
            .systemd_units(vec!["test.service".into()]);

        assert_eq!(factory.systemd_units, ["test.service"]);

        // The collector carries exactly the configured list; building it
        // performs no protocol I/O.
        let collector =
            SystemdCollector::new(factory.systemd_units.clone(), SystemctlQuery::new());
        assert_eq!(collector.units(), ["test.service"]);
    }

    #[test]
    fn test_default_units() {
        let factory = DefaultCollectorFactory::with_fs(MockFs::new(), "/proc");
        assert_eq!(factory.systemd_units, ["containerd.service"]);
    }

    #[test]
    fn test_collectors_read_from_injected_fs() {
        let mut fs = MockFs::new();
        fs.add_file("/fake/modules", "overlay 151552 0 - Live 0x0\n");
        fs.add_file("/fake/cmdline", "quiet\n");
        fs.add_file("/fake/sys/kernel/ostype", "Linux\n");

        let factory = DefaultCollectorFactory::with_fs(fs, "/fake");
        let cancel = CancelToken::new();

        assert_eq!(factory.kmod_collector().collect(&cancel).unwrap().len(), 1);
        assert_eq!(factory.grub_collector().collect(&cancel).unwrap().len(), 1);
        assert_eq!(factory.sysctl_collector().collect(&cancel).unwrap().len(), 1);
    }
}
