//! Collector for systemd unit properties.
//!
//! Properties are obtained through the service manager's control
//! interface; the production implementation shells out to
//! `systemctl show`, which prints the full property set of a unit as
//! `KEY=VALUE` lines. The query sits behind the [`PropertyQuery`] trait
//! so tests can substitute a fake without any process I/O.

use std::collections::BTreeMap;
use std::process::Command;

use crate::cancel::CancelToken;
use crate::collector::{CollectError, Collector};
use crate::model::{Configuration, SystemdConfig};

/// Units queried when the caller does not supply a list.
pub const DEFAULT_UNITS: &[&str] = &["containerd.service"];

/// Abstraction over the service manager property query.
pub trait PropertyQuery: Send + Sync {
    /// Returns the full property set of `unit`.
    fn unit_properties(&self, unit: &str) -> Result<BTreeMap<String, String>, CollectError>;
}

/// Production query that runs `systemctl show --no-pager <unit>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemctlQuery;

impl SystemctlQuery {
    /// Creates a new systemctl-backed query.
    pub fn new() -> Self {
        Self
    }
}

impl PropertyQuery for SystemctlQuery {
    fn unit_properties(&self, unit: &str) -> Result<BTreeMap<String, String>, CollectError> {
        let output = Command::new("systemctl")
            .args(["show", "--no-pager", unit])
            .output()
            .map_err(CollectError::Io)?;

        if !output.status.success() {
            return Err(CollectError::Query {
                unit: unit.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_properties(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parses `KEY=VALUE` lines into a property map.
///
/// Lines without `=` are ignored; only the first `=` separates key from
/// value, since unit properties routinely contain `=` in their values.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    for line in content.lines() {
        if let Some((key, value)) = line.split_once('=') {
            properties.insert(key.to_string(), value.to_string());
        }
    }
    properties
}

/// Queries the property set of each configured unit and emits one record
/// per unit.
///
/// A single unit failure aborts the whole collector call; a diagnostic
/// snapshot with silently missing units would be worse than none.
pub struct SystemdCollector<Q: PropertyQuery> {
    units: Vec<String>,
    query: Q,
}

impl<Q: PropertyQuery> SystemdCollector<Q> {
    /// Creates a new systemd collector for the given units.
    ///
    /// An empty list falls back to [`DEFAULT_UNITS`].
    pub fn new(units: Vec<String>, query: Q) -> Self {
        let units = if units.is_empty() {
            DEFAULT_UNITS.iter().map(|s| s.to_string()).collect()
        } else {
            units
        };
        Self { units, query }
    }

    /// Returns the configured unit names.
    pub fn units(&self) -> &[String] {
        &self.units
    }
}

impl<Q: PropertyQuery> Collector for SystemdCollector<Q> {
    fn collect(&self, cancel: &CancelToken) -> Result<Vec<Configuration>, CollectError> {
        let mut res = Vec::with_capacity(self.units.len());

        for unit in &self.units {
            // One check per unit query round-trip.
            if cancel.is_cancelled() {
                return Err(CollectError::Cancelled);
            }

            let properties = self.query.unit_properties(unit)?;
            res.push(Configuration::SystemD(SystemdConfig {
                unit: unit.clone(),
                properties,
            }));
        }

        Ok(res)
    }
}
