//! dotnet-sbom - CycloneDX SBOM generation for .NET projects
//!
//! Reads NuGet `packages.lock.json` files (and npm `package-lock.json` files
//! found alongside them), resolves every dependency reference to a concrete
//! package, applies scope and exclusion rules, and assembles a CycloneDX 1.6
//! bill of materials with a dependency graph.
//!
//! # Architecture
//!
//! - **Domain Layer** (`sbom_generation`): Package records, version ranges,
//!   graph resolution, filtering, pruning and BOM assembly
//! - **Application Layer** (`application`): The generate-SBOM use case and its DTOs
//! - **Ports** (`ports`): Interfaces to lockfiles, registries, `dotnet restore` and the console
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Error types, exit codes and file safety checks
//!
//! # Example
//!
//! ```no_run
//! use dotnet_sbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn run() -> Result<()> {
//! let use_case = GenerateSbomUseCase::new(
//!     FileSystemReader::new(),
//!     OfflineMetadataRepository::new(),
//!     StderrProgressReporter::new(),
//!     DotnetRestoreRunner::new(),
//!     FileSystemReader::new(),
//! );
//!
//! let request = SbomRequest::new(PathBuf::from("src/MyApp"))
//!     .with_dependency_exclude_filter(Some("NLog".to_string()));
//! let response = use_case.execute(request).await?;
//!
//! let output = CycloneDxFormatter::new().format(&response.bom)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::CycloneDxFormatter;
    pub use crate::adapters::outbound::network::{
        CachingMetadataRepository, GitHubLicenseResolver, OfflineMetadataRepository,
        RegistryMetadataRepository,
    };
    pub use crate::adapters::outbound::process::DotnetRestoreRunner;
    pub use crate::application::dto::{SbomRequest, SbomResponse};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        MetadataRepository, MetadataTemplateReader, OutputPresenter, PackageSource,
        ProgressReporter, RestoreRunner, SbomFormatter, SourceScan,
    };
    pub use crate::sbom_generation::domain::{
        Bom, Component, ComponentType, LicenseInfo, PackageMetadata, PackageRecord, PackageSet,
        ScannedPackageSet,
    };
    pub use crate::sbom_generation::policies::{ComponentFields, LicensePriority};
    pub use crate::shared::error::{ExitCode, SbomError};
    pub use crate::shared::Result;
}
