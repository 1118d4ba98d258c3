use crate::sbom_generation::policies::ComponentFields;
use crate::shared::Result;
use std::path::Path;

/// MetadataTemplateReader port for reading imported BOM metadata
///
/// The template is a partial CycloneDX document whose
/// `metadata.component` describes the top-level component.
pub trait MetadataTemplateReader {
    /// Reads the top-level component fields from a template file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON
    fn read_template(&self, path: &Path) -> Result<ComponentFields>;
}
