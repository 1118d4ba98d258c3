use crate::sbom_generation::domain::ScannedPackageSet;
use crate::shared::Result;
use std::path::Path;

/// Everything a package source found for one scan path
#[derive(Debug, Clone)]
pub struct SourceScan {
    /// Name of the scanned project, used for the top-level component
    pub project_name: String,
    /// One set per resolution target (project and target framework)
    pub sets: Vec<ScannedPackageSet>,
}

/// PackageSource port for reading raw package records
///
/// This port abstracts the discovery and parsing of lockfiles and project
/// files. Each returned set is resolved independently before merging.
pub trait PackageSource {
    /// Reads the package sets for a project directory or lockfile
    ///
    /// # Errors
    /// Returns an error if:
    /// - No lockfile can be found at the path
    /// - The lockfile cannot be read or parsed
    fn read_sources(&self, project_path: &Path) -> Result<SourceScan>;
}
