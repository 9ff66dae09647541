//! Snapshot output in JSON, YAML or table form.
//!
//! `Format` is a closed enum, so the writer can only ever be handed a
//! supported format; leniency toward unrecognized format names lives in
//! [`Format::parse_lossy`], which falls back to JSON with a warning.

use std::io::{self, Write};

use tracing::warn;

use crate::model::Snapshot;

/// Output format for the rendered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Pretty JSON with 2-space indentation.
    #[default]
    Json,
    /// YAML with 2-space indentation.
    Yaml,
    /// Human-readable enumerated listing.
    Table,
}

impl Format {
    /// Parses a format name, falling back to JSON for anything
    /// unrecognized.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "json" => Format::Json,
            "yaml" => Format::Yaml,
            "table" => Format::Table,
            other => {
                warn!("unknown output format {:?}, falling back to json", other);
                Format::Json
            }
        }
    }
}

/// Error type for serialization failures.
#[derive(Debug)]
pub enum SerializeError {
    /// JSON encoding failed.
    Json(serde_json::Error),
    /// YAML encoding failed.
    Yaml(serde_yaml::Error),
    /// Writing to the output failed.
    Io(io::Error),
}

impl std::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializeError::Json(e) => write!(f, "failed to serialize to JSON: {}", e),
            SerializeError::Yaml(e) => write!(f, "failed to serialize to YAML: {}", e),
            SerializeError::Io(e) => write!(f, "failed to write output: {}", e),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Json(e) => Some(e),
            SerializeError::Yaml(e) => Some(e),
            SerializeError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for SerializeError {
    fn from(e: io::Error) -> Self {
        SerializeError::Io(e)
    }
}

/// Output sink for the aggregate snapshot.
pub trait Serializer: Send {
    /// Renders the snapshot to the sink.
    fn serialize(&mut self, snapshot: &Snapshot) -> Result<(), SerializeError>;
}

/// Serializer writing the snapshot to any `Write` destination in the
/// configured format.
pub struct Writer<W: Write> {
    format: Format,
    output: W,
}

impl Writer<io::Stdout> {
    /// Creates a writer targeting stdout.
    pub fn stdout(format: Format) -> Self {
        Writer::new(format, io::stdout())
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer with the given format and output destination.
    pub fn new(format: Format, output: W) -> Self {
        Self { format, output }
    }

    fn write_json(&mut self, snapshot: &Snapshot) -> Result<(), SerializeError> {
        serde_json::to_writer_pretty(&mut self.output, snapshot).map_err(SerializeError::Json)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn write_yaml(&mut self, snapshot: &Snapshot) -> Result<(), SerializeError> {
        serde_yaml::to_writer(&mut self.output, snapshot).map_err(SerializeError::Yaml)
    }

    fn write_table(&mut self, snapshot: &Snapshot) -> Result<(), SerializeError> {
        writeln!(self.output, "Configuration Snapshot:")?;
        writeln!(self.output, "----------------------")?;

        for (i, config) in snapshot.iter().enumerate() {
            use crate::model::Configuration::*;
            match config {
                KMod(c) => writeln!(self.output, "[{}] KMod {}", i + 1, c.name)?,
                SystemD(c) => writeln!(
                    self.output,
                    "[{}] SystemD {} ({} properties)",
                    i + 1,
                    c.unit,
                    c.properties.len()
                )?,
                Grub(c) if c.value.is_empty() => {
                    writeln!(self.output, "[{}] Grub {}", i + 1, c.key)?
                }
                Grub(c) => writeln!(self.output, "[{}] Grub {}={}", i + 1, c.key, c.value)?,
                Sysctl(c) => writeln!(self.output, "[{}] Sysctl {} = {}", i + 1, c.key, c.value)?,
            }
        }
        Ok(())
    }
}

impl<W: Write + Send> Serializer for Writer<W> {
    fn serialize(&mut self, snapshot: &Snapshot) -> Result<(), SerializeError> {
        match self.format {
            Format::Json => self.write_json(snapshot),
            Format::Yaml => self.write_yaml(snapshot),
            Format::Table => self.write_table(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Configuration, GrubConfig, KmodConfig};

    fn sample() -> Snapshot {
        vec![
            Configuration::KMod(KmodConfig {
                name: "nvidia".into(),
            }),
            Configuration::Grub(GrubConfig {
                key: "root".into(),
                value: "/dev/sda1".into(),
            }),
        ]
    }

    fn render(format: Format) -> String {
        let mut out = Vec::new();
        Writer::new(format, &mut out).serialize(&sample()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_output() {
        let text = render(Format::Json);
        assert!(text.contains("\"kind\": \"KMod\""));
        assert!(text.contains("\"name\": \"nvidia\""));
        // 2-space indentation.
        assert!(text.contains("\n  {"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_yaml_output() {
        let text = render(Format::Yaml);
        assert!(text.contains("kind: KMod"));
        assert!(text.contains("name: nvidia"));
        assert!(text.contains("value: /dev/sda1"));
    }

    #[test]
    fn test_table_output() {
        let text = render(Format::Table);
        assert!(text.starts_with("Configuration Snapshot:"));
        assert!(text.contains("[1] KMod nvidia"));
        assert!(text.contains("[2] Grub root=/dev/sda1"));
    }

    #[test]
    fn test_empty_snapshot_json() {
        let mut out = Vec::new();
        Writer::new(Format::Json, &mut out)
            .serialize(&Vec::new())
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_format_parse_lossy() {
        assert_eq!(Format::parse_lossy("json"), Format::Json);
        assert_eq!(Format::parse_lossy("YAML"), Format::Yaml);
        assert_eq!(Format::parse_lossy("table"), Format::Table);
        // Unrecognized names fall back to JSON.
        assert_eq!(Format::parse_lossy("xml"), Format::Json);
        assert_eq!(Format::parse_lossy(""), Format::Json);
    }
}
