//! Collector for kernel boot parameters from `<proc>/cmdline`.

use std::path::{Path, PathBuf};

use crate::cancel::CancelToken;
use crate::collector::traits::FileSystem;
use crate::collector::{CollectError, Collector};
use crate::model::{Configuration, GrubConfig};

/// Reads the kernel command line and emits one record per parameter.
///
/// Tokens are whitespace-separated; a token `K=V` splits on the first `=`
/// into key and value, a bare token becomes a key with an empty value.
/// Record order matches token order.
pub struct GrubCollector<F: FileSystem> {
    fs: F,
    cmdline_path: PathBuf,
}

impl<F: FileSystem> GrubCollector<F> {
    /// Creates a new boot parameter collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            cmdline_path: proc_path.as_ref().join("cmdline"),
        }
    }
}

impl<F: FileSystem> Collector for GrubCollector<F> {
    fn collect(&self, cancel: &CancelToken) -> Result<Vec<Configuration>, CollectError> {
        if cancel.is_cancelled() {
            return Err(CollectError::Cancelled);
        }

        let cmdline = self.fs.read_to_string(&self.cmdline_path)?;

        let mut res = Vec::new();
        for token in cmdline.split_whitespace() {
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, v),
                None => (token, ""),
            };
            res.push(Configuration::Grub(GrubConfig {
                key: key.to_string(),
                value: value.to_string(),
            }));
        }

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    fn collector_with(cmdline: &str) -> GrubCollector<MockFs> {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cmdline", cmdline);
        GrubCollector::new(fs, "/proc")
    }

    fn grub(key: &str, value: &str) -> Configuration {
        Configuration::Grub(GrubConfig {
            key: key.into(),
            value: value.into(),
        })
    }

    #[test]
    fn test_collect_boot_parameters() {
        let collector = collector_with("quiet splash root=/dev/sda1\n");

        let configs = collector.collect(&CancelToken::new()).unwrap();

        assert_eq!(
            configs,
            vec![
                grub("quiet", ""),
                grub("splash", ""),
                grub("root", "/dev/sda1"),
            ]
        );
    }

    #[test]
    fn test_value_keeps_embedded_equals() {
        // Only the first '=' separates key from value.
        let collector = collector_with("console=ttyS0,115200 crashkernel=auto=x");

        let configs = collector.collect(&CancelToken::new()).unwrap();

        assert_eq!(
            configs,
            vec![
                grub("console", "ttyS0,115200"),
                grub("crashkernel", "auto=x"),
            ]
        );
    }

    #[test]
    fn test_empty_cmdline() {
        let collector = collector_with("\n");
        let configs = collector.collect(&CancelToken::new()).unwrap();
        assert!(configs.is_empty());
    }

    #[test]
    fn test_missing_cmdline_is_io_error() {
        let collector = GrubCollector::new(MockFs::new(), "/proc");

        let err = collector.collect(&CancelToken::new()).unwrap_err();
        assert!(matches!(err, CollectError::Io(_)));
    }

    #[test]
    fn test_cancelled_before_read() {
        let collector = collector_with("quiet");
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = collector.collect(&cancel).unwrap_err();
        assert!(matches!(err, CollectError::Cancelled));
    }
}
