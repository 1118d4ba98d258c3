pub mod component;
pub mod dependency_edge;
pub mod dependency_graph;
pub mod license_info;
pub mod package;
pub mod package_metadata;
pub mod package_set;
pub mod sbom_metadata;
pub mod version_range;

pub use component::{bom_ref_for, package_url, Component, ComponentType};
pub use dependency_edge::{DependencyEdge, EdgeResolution, UnresolvedReason};
pub use dependency_graph::Dependency;
pub use license_info::LicenseInfo;
pub use package::{
    DependencyType, Ecosystem, PackageId, PackageName, PackageRecord, Scope, Version,
};
pub use package_metadata::{ComponentHash, HashAlgorithm, PackageMetadata};
pub use package_set::{PackageSet, ScannedPackageSet};
pub use sbom_metadata::{Bom, SbomMetadata};
pub use version_range::{compare_versions, is_exact_version, NuGetVersion, VersionRange};
