use super::nuget_lockfile::content_hash_to_hex;
use crate::sbom_generation::domain::{
    Ecosystem, PackageRecord, PackageSet, ScannedPackageSet, Scope,
};
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Lockfile name written by npm 7 and later
pub const NPM_LOCKFILE_NAME: &str = "package-lock.json";

const NODE_MODULES: &str = "node_modules/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLock {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    lockfile_version: u32,
    #[serde(default)]
    packages: Option<BTreeMap<String, LockedPackage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockedPackage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dev: bool,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,
}

/// Parses an npm `package-lock.json` (lockfile version 2 or 3)
///
/// The whole lockfile forms a single resolution set. Packages nested under
/// another package's `node_modules` become separate records when their
/// version differs from the hoisted copy.
pub fn parse_npm_lockfile(
    content: &str,
    fallback_name: &str,
) -> Result<(String, ScannedPackageSet)> {
    let lock: PackageLock =
        serde_json::from_str(content).context("Failed to parse package-lock.json")?;

    let Some(mut packages) = lock.packages else {
        anyhow::bail!(
            "lockfileVersion {} has no \"packages\" section; regenerate it with npm 7 or later",
            lock.lockfile_version
        );
    };

    let root = packages.remove("").unwrap_or_default();
    let project_name = root
        .name
        .clone()
        .or(lock.name)
        .unwrap_or_else(|| fallback_name.to_string());

    let direct: BTreeSet<&str> = root
        .dependencies
        .keys()
        .chain(root.dev_dependencies.keys())
        .chain(root.optional_dependencies.keys())
        .map(String::as_str)
        .collect();

    let mut set = PackageSet::new();
    for (path, entry) in &packages {
        if entry.link {
            continue;
        }
        let Some(name) = package_name(path, entry) else {
            continue;
        };
        let Some(version) = entry.version.clone() else {
            continue;
        };

        let is_hoisted = path
            .strip_prefix(NODE_MODULES)
            .is_some_and(|rest| !rest.contains(NODE_MODULES));
        let scope = if entry.optional {
            Scope::Optional
        } else {
            Scope::Required
        };
        let hash = entry
            .integrity
            .as_deref()
            .and_then(|integrity| integrity.strip_prefix("sha512-"))
            .and_then(content_hash_to_hex);

        let mut record = PackageRecord::new(name.clone(), version)
            .with_context(|| format!("Invalid package entry at {}", path))?
            .with_ecosystem(Ecosystem::Npm)
            .with_direct_reference(is_hoisted && direct.contains(name.as_str()))
            .with_dev_dependency(entry.dev)
            .with_scope(scope)
            .with_content_hash(hash);

        for (dependency, requirement) in entry
            .dependencies
            .iter()
            .chain(entry.optional_dependencies.iter())
        {
            record = record.with_dependency(dependency, requirement)?;
        }

        set.insert(record);
    }

    let origin = format!("{} (npm)", project_name);
    Ok((project_name, ScannedPackageSet::new(origin, set)))
}

/// Name of an installed `packages` entry: explicit for aliases, otherwise
/// the last `node_modules/` segment of its path. Workspace sources outside
/// `node_modules` yield `None`.
fn package_name(path: &str, entry: &LockedPackage) -> Option<String> {
    let index = path.rfind(NODE_MODULES)?;
    let installed_as = &path[index + NODE_MODULES.len()..];
    if installed_as.is_empty() {
        return None;
    }
    Some(entry.name.clone().unwrap_or_else(|| installed_as.to_string()))
}
