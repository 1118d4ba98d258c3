use crate::sbom_generation::domain::{PackageId, PackageSet, ScannedPackageSet, Scope};
use std::collections::HashSet;

/// Result of applying the dev-dependency rule
#[derive(Debug, Clone)]
pub struct DevScopeOutcome {
    pub packages: PackageSet,
    pub removed: HashSet<PackageId>,
}

/// ScopePolicy derives record scope from the dev and test-project flags
pub struct ScopePolicy;

impl ScopePolicy {
    /// Applies the test-project rule to one scanned set.
    ///
    /// Returns `None` when test projects are excluded and this set belongs to
    /// one; otherwise every record of a test project is marked `Excluded`.
    pub fn apply_test_project(
        scanned: ScannedPackageSet,
        exclude_test_projects: bool,
    ) -> Option<ScannedPackageSet> {
        if !scanned.is_test_project {
            return Some(scanned);
        }
        if exclude_test_projects {
            return None;
        }

        let ScannedPackageSet {
            origin,
            is_test_project,
            packages,
        } = scanned;
        let packages = packages.map_records(|record| record.with_scope(Scope::Excluded));

        Some(ScannedPackageSet {
            origin,
            is_test_project,
            packages,
        })
    }

    /// Marks dev dependencies `Excluded`, or removes them when `exclude_dev` is set
    pub fn apply_dev_dependencies(packages: PackageSet, exclude_dev: bool) -> DevScopeOutcome {
        if !exclude_dev {
            let packages = packages.map_records(|record| {
                if record.is_dev_dependency() {
                    record.with_scope(Scope::Excluded)
                } else {
                    record
                }
            });
            return DevScopeOutcome {
                packages,
                removed: HashSet::new(),
            };
        }

        let removed: HashSet<PackageId> = packages
            .iter()
            .filter(|record| record.is_dev_dependency())
            .map(|record| record.id())
            .collect();

        let packages = packages
            .retain(|record| !record.is_dev_dependency())
            .without_edges_to(&removed);

        DevScopeOutcome { packages, removed }
    }
}
