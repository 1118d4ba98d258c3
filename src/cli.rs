use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::DEFAULT_RESTORE_TIMEOUT;
use crate::sbom_generation::domain::ComponentType;

/// Generate CycloneDX SBOMs for .NET projects from NuGet lockfiles
#[derive(Parser, Debug)]
#[command(name = "dotnet-sbom")]
#[command(version)]
#[command(
    about = "Generate CycloneDX SBOMs for .NET projects from NuGet lockfiles",
    long_about = None
)]
pub struct Args {
    /// Project or solution directory, or a packages.lock.json / package-lock.json
    /// file (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave out development dependencies instead of marking them excluded
    #[arg(long)]
    pub exclude_dev: bool,

    /// Leave out test projects instead of marking their packages excluded
    #[arg(short = 't', long)]
    pub exclude_test_projects: bool,

    /// Keep project references as components instead of folding them into the project
    #[arg(long)]
    pub include_project_references: bool,

    /// Comma-separated list of `name` or `name@version` entries to exclude,
    /// together with dependencies only they pull in
    #[arg(long, value_name = "FILTER")]
    pub dependency_exclude_filter: Option<String>,

    /// Override the top-level component name
    #[arg(long, value_name = "NAME")]
    pub set_name: Option<String>,

    /// Override the top-level component version
    #[arg(long, value_name = "VERSION")]
    pub set_version: Option<String>,

    /// Override the top-level component type (application, library, ...)
    #[arg(long, value_name = "TYPE")]
    pub set_type: Option<ComponentType>,

    /// Run `dotnet restore` before reading lockfiles
    #[arg(long)]
    pub restore: bool,

    /// Seconds to wait for `dotnet restore`
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_RESTORE_TIMEOUT.as_secs())]
    pub restore_timeout: u64,

    /// CycloneDX JSON file whose metadata.component describes the top-level component
    #[arg(long, value_name = "FILE")]
    pub import_metadata: Option<PathBuf>,

    /// Resolve GitHub-hosted license URLs through the GitHub license API
    #[arg(long)]
    pub enable_github_licenses: bool,

    /// Token for the GitHub API (raises the rate limit)
    #[arg(long, value_name = "TOKEN", requires = "enable_github_licenses")]
    pub github_token: Option<String>,

    /// Skip registry lookups; components carry lockfile data only
    #[arg(long, conflicts_with = "enable_github_licenses")]
    pub offline: bool,

    /// Path to a config file (defaults to dotnet-sbom.config.yml next to the scanned path)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
