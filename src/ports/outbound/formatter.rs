use crate::sbom_generation::domain::Bom;
use crate::shared::Result;

/// SbomFormatter port for formatting SBOM output
///
/// This port abstracts the rendering of an assembled BOM into a document
/// format (CycloneDX JSON).
pub trait SbomFormatter {
    /// Formats the assembled BOM
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, bom: &Bom) -> Result<String>;
}
