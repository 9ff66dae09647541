//! Snapshot orchestration: run all collectors concurrently, aggregate,
//! serialize.
//!
//! The four collectors run on scoped threads under one shared
//! cancellation scope. The first collector to fail cancels the scope;
//! collectors that never reach another cancellation check run to
//! completion (the scope is a cooperative signal, not a hard interrupt),
//! but their results are discarded along with the run. A failed run
//! never reaches the serializer: a snapshot with silently missing
//! sections would be worse than no snapshot.

use std::sync::Mutex;
use std::thread;

use tracing::{debug, error, info};

use crate::cancel::CancelToken;
use crate::collector::{CollectError, Collector, CollectorFactory};
use crate::model::Snapshot;
use crate::serializer::{SerializeError, Serializer};

/// Error type for a failed snapshot run.
#[derive(Debug)]
pub enum SnapshotError {
    /// A collector failed; this is the first failure observed.
    Collect(CollectError),
    /// All collectors succeeded but the output could not be rendered.
    Serialize(SerializeError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Collect(e) => write!(f, "failed to collect snapshot: {}", e),
            SnapshotError::Serialize(e) => write!(f, "failed to serialize snapshot: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Collect(e) => Some(e),
            SnapshotError::Serialize(e) => Some(e),
        }
    }
}

/// Collects configuration from the current node and hands the aggregate
/// to a serializer.
pub struct NodeSnapshotter {
    factory: Box<dyn CollectorFactory>,
    serializer: Box<dyn Serializer>,
}

impl NodeSnapshotter {
    /// Creates a snapshotter from a collector factory and an output sink.
    pub fn new(factory: Box<dyn CollectorFactory>, serializer: Box<dyn Serializer>) -> Self {
        Self {
            factory,
            serializer,
        }
    }

    /// Runs one snapshot: collect concurrently, aggregate, serialize.
    ///
    /// Returns the first collector error if any collector failed, or the
    /// serializer error if rendering failed. All collector threads are
    /// joined before this function returns.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<(), SnapshotError> {
        if cancel.is_cancelled() {
            return Err(SnapshotError::Collect(CollectError::Cancelled));
        }

        info!("starting node snapshot");

        let scope = cancel.child();
        let snapshot: Mutex<Snapshot> = Mutex::new(Vec::with_capacity(670));
        let first_error: Mutex<Option<CollectError>> = Mutex::new(None);

        let collectors: [(&str, Box<dyn Collector>); 4] = [
            ("kmod", self.factory.kmod_collector()),
            ("systemd", self.factory.systemd_collector()),
            ("grub", self.factory.grub_collector()),
            ("sysctl", self.factory.sysctl_collector()),
        ];

        thread::scope(|s| {
            let scope = &scope;
            let snapshot = &snapshot;
            let first_error = &first_error;

            for (name, collector) in &collectors {
                s.spawn(move || {
                    debug!(collector = name, "collecting");
                    match collector.collect(scope) {
                        Ok(records) => {
                            debug!(collector = name, count = records.len(), "collected");
                            // Lock held only for the append; collectors
                            // never block each other on I/O.
                            snapshot.lock().unwrap().extend(records);
                        }
                        Err(e) => {
                            error!(collector = name, error = %e, "collection failed");
                            scope.cancel();
                            let mut slot = first_error.lock().unwrap();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                        }
                    }
                });
            }
        });

        if let Some(e) = first_error.into_inner().unwrap() {
            return Err(SnapshotError::Collect(e));
        }

        let snapshot = snapshot.into_inner().unwrap();
        info!(total_configs = snapshot.len(), "snapshot collection complete");

        self.serializer
            .serialize(&snapshot)
            .map_err(SnapshotError::Serialize)
    }
}
