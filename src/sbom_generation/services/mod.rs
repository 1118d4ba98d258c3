mod bom_assembler;
mod dependency_classifier;
mod graph_merger;
mod orphan_pruner;
mod package_filter;
mod sbom_generator;
mod scope_policy;
mod version_resolver;

pub use bom_assembler::{
    AssemblyOutcome, AssemblyWarning, BomAssembler, BomRefLookup, MetadataLookup,
};
pub use dependency_classifier::{Classification, DependencyClassifier};
pub use graph_merger::GraphMerger;
pub use orphan_pruner::{OrphanPruner, PruneOutcome, RootPolicy};
pub use package_filter::{FilterOutcome, PackageFilter};
pub use sbom_generator::SbomGenerator;
pub use scope_policy::{DevScopeOutcome, ScopePolicy};
pub use version_resolver::{ResolutionOutcome, ResolutionWarning, VersionRangeResolver};
