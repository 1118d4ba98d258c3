use dotnet_sbom::prelude::*;
use std::path::Path;

/// Mock PackageSource for testing
pub struct MockPackageSource {
    pub project_name: String,
    pub sets: Vec<ScannedPackageSet>,
}

impl MockPackageSource {
    pub fn new(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            sets: Vec::new(),
        }
    }

    pub fn with_set(mut self, set: ScannedPackageSet) -> Self {
        self.sets.push(set);
        self
    }
}

impl PackageSource for MockPackageSource {
    fn read_sources(&self, _project_path: &Path) -> Result<SourceScan> {
        Ok(SourceScan {
            project_name: self.project_name.clone(),
            sets: self.sets.clone(),
        })
    }
}
