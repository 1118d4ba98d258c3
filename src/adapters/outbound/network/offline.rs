use crate::ports::outbound::MetadataRepository;
use crate::sbom_generation::domain::{Ecosystem, PackageMetadata};
use crate::shared::Result;
use async_trait::async_trait;

/// OfflineMetadataRepository answers every lookup with a stub
///
/// Used with `--offline`: components carry only what the lockfile knows
/// (name, version, purl, content hash).
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineMetadataRepository;

impl OfflineMetadataRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataRepository for OfflineMetadataRepository {
    async fn fetch_metadata(
        &self,
        _ecosystem: Ecosystem,
        _name: &str,
        _version: &str,
    ) -> Result<Option<PackageMetadata>> {
        Ok(Some(PackageMetadata::stub()))
    }
}
