use crate::sbom_generation::domain::SbomMetadata;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Builds the document-level metadata of a BOM: when it was made, by which
/// tool, and under which serial number.
///
/// Nothing else in a BOM depends on the clock or on randomness, so two runs
/// over the same lockfiles differ only in the fields produced here.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Metadata naming this tool, stamped with the current time
    pub fn generate_default_metadata() -> SbomMetadata {
        Self::generate_metadata(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn generate_metadata(tool_name: &str, tool_version: &str) -> SbomMetadata {
        Self::generate_at(Utc::now(), tool_name, tool_version)
    }

    /// Metadata for a fixed point in time; the serial number is still fresh
    pub fn generate_at(at: DateTime<Utc>, tool_name: &str, tool_version: &str) -> SbomMetadata {
        SbomMetadata::new(
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_name.to_string(),
            tool_version.to_string(),
            Self::serial_number(),
        )
    }

    fn serial_number() -> String {
        Uuid::new_v4().urn().to_string()
    }
}
