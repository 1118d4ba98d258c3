use crate::sbom_generation::domain::Bom;

/// SbomResponse - Internal response DTO from SBOM generation use case
///
/// Holds the assembled BOM, ready for a formatter.
#[derive(Debug, Clone)]
pub struct SbomResponse {
    pub bom: Bom,
    /// Recoverable problems reported during the scan
    pub warnings: Vec<String>,
}

impl SbomResponse {
    pub fn new(bom: Bom, warnings: Vec<String>) -> Self {
        Self { bom, warnings }
    }
}
