/// Network adapters for the package registries and the GitHub license API
mod caching_client;
mod github_license_resolver;
mod http_client;
mod offline;
mod registry_client;

pub use caching_client::CachingMetadataRepository;
pub use github_license_resolver::GitHubLicenseResolver;
pub use offline::OfflineMetadataRepository;
pub use registry_client::RegistryMetadataRepository;
