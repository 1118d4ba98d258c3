use async_trait::async_trait;
use dotnet_sbom::prelude::*;
use dotnet_sbom::sbom_generation::domain::Ecosystem;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock MetadataRepository for testing
///
/// Known packages return their registered metadata, unknown ones a stub.
/// Clones share the lookup counter.
#[derive(Clone)]
pub struct MockMetadataRepository {
    pub metadata: HashMap<String, Option<PackageMetadata>>,
    pub should_fail: bool,
    pub lookups: Arc<AtomicUsize>,
}

impl MockMetadataRepository {
    pub fn new() -> Self {
        Self {
            metadata: HashMap::new(),
            should_fail: false,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_license(mut self, package: &str, version: &str, license: &str) -> Self {
        self.metadata.insert(
            format!("{}@{}", package, version),
            Some(PackageMetadata {
                license: Some(LicenseInfo::SpdxId(license.to_string())),
                description: Some(format!("{} package", package)),
                ..PackageMetadata::default()
            }),
        );
        self
    }

    /// The registry has never heard of this package
    pub fn with_unknown(mut self, package: &str, version: &str) -> Self {
        self.metadata.insert(format!("{}@{}", package, version), None);
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataRepository for MockMetadataRepository {
    async fn fetch_metadata(
        &self,
        _ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageMetadata>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            anyhow::bail!("Mock registry failure");
        }

        Ok(self
            .metadata
            .get(&format!("{}@{}", name, version))
            .cloned()
            .unwrap_or_else(|| Some(PackageMetadata::stub())))
    }
}
