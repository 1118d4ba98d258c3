use crate::sbom_generation::domain::{Ecosystem, PackageMetadata};
use crate::shared::Result;
use async_trait::async_trait;

/// MetadataRepository port for fetching registry metadata
///
/// This port abstracts the package registries (the NuGet registration
/// API, the npm registry) used to retrieve license, description, publisher
/// and hashes for a package version.
///
/// # Async Support
/// Lookups are independent of each other and are issued concurrently.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Fetches metadata for a specific package version
    ///
    /// # Returns
    /// * `Ok(Some(metadata))` - the registry knows the package; a stub
    ///   metadata value stands for "registry answered 404"
    /// * `Ok(None)` - the package is unknown and should be left out
    ///
    /// # Errors
    /// Returns an error only for transport-level failures (connection
    /// errors, unexpected status codes, unparseable responses).
    async fn fetch_metadata(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageMetadata>>;
}
