//! Data model for collected configuration records.
//!
//! A [`Configuration`] is one immutable unit of collected data, tagged with
//! the collector that produced it. The aggregate of one snapshot run is a
//! plain `Vec<Configuration>`; ordering across collectors is unspecified
//! (they run concurrently) but each collector's own records keep their
//! natural production order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate of all configuration records from one snapshot run.
pub type Snapshot = Vec<Configuration>;

/// One collected configuration record.
///
/// Serializes with an explicit `kind` tag and a kind-specific `data`
/// payload, so consumers can switch on `kind` before interpreting the
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Configuration {
    /// One loaded kernel module.
    KMod(KmodConfig),
    /// Property set of one systemd unit.
    SystemD(SystemdConfig),
    /// One kernel boot parameter.
    Grub(GrubConfig),
    /// One sysctl tunable.
    Sysctl(SysctlConfig),
}

impl Configuration {
    /// Returns the `kind` tag identifying the producing collector.
    pub fn kind(&self) -> &'static str {
        match self {
            Configuration::KMod(_) => "KMod",
            Configuration::SystemD(_) => "SystemD",
            Configuration::Grub(_) => "Grub",
            Configuration::Sysctl(_) => "Sysctl",
        }
    }
}

/// A loaded kernel module, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmodConfig {
    pub name: String,
}

/// A systemd unit and its property set as reported by the service manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemdConfig {
    pub unit: String,
    pub properties: BTreeMap<String, String>,
}

/// A kernel boot parameter. `value` is empty for bare flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrubConfig {
    pub key: String,
    pub value: String,
}

/// A sysctl tunable: absolute file path under the tunable tree and its
/// whitespace-trimmed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysctlConfig {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        let kmod = Configuration::KMod(KmodConfig {
            name: "nvidia".into(),
        });
        let grub = Configuration::Grub(GrubConfig {
            key: "quiet".into(),
            value: String::new(),
        });
        assert_eq!(kmod.kind(), "KMod");
        assert_eq!(grub.kind(), "Grub");
    }

    #[test]
    fn test_json_tagging() {
        let record = Configuration::Sysctl(SysctlConfig {
            key: "/proc/sys/kernel/ostype".into(),
            value: "Linux".into(),
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""kind":"Sysctl""#));
        assert!(json.contains(r#""key":"/proc/sys/kernel/ostype""#));
        assert!(json.contains(r#""value":"Linux""#));
    }

    #[test]
    fn test_json_round_trip() {
        let record = Configuration::SystemD(SystemdConfig {
            unit: "containerd.service".into(),
            properties: BTreeMap::from([("ActiveState".into(), "active".into())]),
        });

        let json = serde_json::to_string(&record).unwrap();
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
