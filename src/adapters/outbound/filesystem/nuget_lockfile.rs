use crate::sbom_generation::domain::{
    DependencyType, Ecosystem, PackageRecord, PackageSet, ScannedPackageSet,
};
use crate::shared::Result;
use anyhow::Context;
use base64::Engine;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Lockfile name written by `dotnet restore --use-lock-file`
pub const NUGET_LOCKFILE_NAME: &str = "packages.lock.json";

/// Version given to project references, which the lockfile lists without one
const PROJECT_REFERENCE_VERSION: &str = "1.0.0";

#[derive(Debug, Deserialize)]
struct PackagesLockFile {
    #[serde(default)]
    dependencies: BTreeMap<String, BTreeMap<String, LockedDependency>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockedDependency {
    #[serde(rename = "type")]
    kind: LockedKind,
    #[serde(default)]
    resolved: Option<String>,
    #[serde(default)]
    content_hash: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
enum LockedKind {
    Direct,
    Transitive,
    Project,
    CentralTransitive,
}

/// Parses a `packages.lock.json` into one package set per target framework
///
/// # Arguments
/// * `content` - Raw lockfile JSON
/// * `project_name` - Owning project, used in set origins
/// * `is_test_project` - Marks every produced set as a test project set
pub fn parse_nuget_lockfile(
    content: &str,
    project_name: &str,
    is_test_project: bool,
) -> Result<Vec<ScannedPackageSet>> {
    let lockfile: PackagesLockFile =
        serde_json::from_str(content).context("Failed to parse packages.lock.json")?;

    lockfile
        .dependencies
        .into_iter()
        .map(|(target, entries)| {
            let packages = entries
                .into_iter()
                .map(|(name, entry)| to_record(name, entry))
                .collect::<Result<PackageSet>>()
                .with_context(|| format!("Invalid entry in target {}", target))?;

            Ok(ScannedPackageSet::new(format!("{} ({})", project_name, target), packages)
                .with_test_project(is_test_project))
        })
        .collect()
}

fn to_record(name: String, entry: LockedDependency) -> Result<PackageRecord> {
    let version = match (entry.kind, entry.resolved) {
        (_, Some(resolved)) => resolved,
        (LockedKind::Project, None) => PROJECT_REFERENCE_VERSION.to_string(),
        (_, None) => anyhow::bail!("Package {} has no resolved version", name),
    };

    let dependency_type = if entry.kind == LockedKind::Project {
        DependencyType::Project
    } else {
        DependencyType::Package
    };
    let is_direct = matches!(entry.kind, LockedKind::Direct | LockedKind::Project);

    let mut record = PackageRecord::new(name, version)?
        .with_ecosystem(Ecosystem::NuGet)
        .with_dependency_type(dependency_type)
        .with_direct_reference(is_direct)
        .with_content_hash(entry.content_hash.as_deref().and_then(content_hash_to_hex));

    for (dependency, requirement) in &entry.dependencies {
        record = record.with_dependency(dependency, requirement)?;
    }

    Ok(record)
}

/// NuGet stores the SHA-512 of the package as base64; CycloneDX wants hex
pub fn content_hash_to_hex(content_hash: &str) -> Option<String> {
    base64::engine::general_purpose::STANDARD
        .decode(content_hash.trim())
        .ok()
        .filter(|bytes| bytes.len() == 64)
        .map(hex::encode)
}
