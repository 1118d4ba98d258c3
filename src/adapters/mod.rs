/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// providing the actual integration with the filesystem, the package
/// registries, the GitHub API and the .NET SDK.
pub mod outbound;
