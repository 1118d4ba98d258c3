use crate::sbom_generation::domain::{
    compare_versions, is_exact_version, DependencyEdge, Ecosystem, PackageId, PackageSet,
    UnresolvedReason, VersionRange,
};
use std::collections::HashMap;

/// A dependency edge that could not be pinned to a version in its resolution set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionWarning {
    pub parent: String,
    pub dependency: String,
    pub requirement: String,
    pub reason: UnresolvedReason,
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} depends on {} {} but {}",
            self.parent, self.dependency, self.requirement, self.reason
        )
    }
}

/// Result of resolving one package set
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub packages: PackageSet,
    pub warnings: Vec<ResolutionWarning>,
}

/// VersionRangeResolver pins range requirements to versions present in the set.
///
/// Each call works on a single resolution set (one target framework of one
/// project). Sets are resolved independently and unioned afterwards, so the
/// same name may legitimately resolve to different versions in different sets.
pub struct VersionRangeResolver;

impl VersionRangeResolver {
    /// Resolves every pending edge in `packages`.
    ///
    /// A bare version whose exact record is present resolves to it. Any
    /// other requirement is read as a range (a bare NuGet version being a
    /// minimum) and the highest satisfying version wins; the
    /// set already reflects the restore's choice, so this only matters when
    /// the set carries more than one version of a name. Unsatisfiable or
    /// unparseable ranges stay unresolved and are reported as warnings.
    pub fn resolve(packages: PackageSet) -> ResolutionOutcome {
        let mut pinned: HashMap<PackageId, Vec<DependencyEdge>> = HashMap::new();
        let mut warnings = Vec::new();

        for record in packages.iter() {
            if record.dependencies().iter().all(DependencyEdge::is_resolved) {
                continue;
            }

            let edges = record
                .dependencies()
                .iter()
                .map(|edge| {
                    if edge.is_resolved() {
                        return edge.clone();
                    }
                    match Self::resolve_edge(&packages, edge, record.ecosystem()) {
                        Ok(version) => edge.resolved_to(&version),
                        Err(reason) => {
                            warnings.push(ResolutionWarning {
                                parent: record.to_string(),
                                dependency: edge.target().to_string(),
                                requirement: edge.requirement().to_string(),
                                reason: reason.clone(),
                            });
                            edge.unresolved(reason)
                        }
                    }
                })
                .collect();

            pinned.insert(record.id(), edges);
        }

        let packages = packages.map_records(|record| match pinned.remove(&record.id()) {
            Some(edges) => record.with_dependencies(edges),
            None => record,
        });

        ResolutionOutcome { packages, warnings }
    }

    fn resolve_edge(
        packages: &PackageSet,
        edge: &DependencyEdge,
        ecosystem: Ecosystem,
    ) -> std::result::Result<String, UnresolvedReason> {
        let requirement = edge.requirement();
        if is_exact_version(requirement)
            && packages.contains(&PackageId::new(edge.target().as_str(), requirement))
        {
            return Ok(requirement.to_string());
        }

        let range = VersionRange::parse(requirement, ecosystem)
            .map_err(|e| UnresolvedReason::InvalidRange(e.to_string()))?;

        packages
            .find_by_name(edge.target().as_str())
            .into_iter()
            .filter(|candidate| range.satisfied_by(candidate.version()))
            .max_by(|a, b| compare_versions(a.version(), b.version(), ecosystem))
            .map(|candidate| candidate.version().to_string())
            .ok_or(UnresolvedReason::NoMatchingVersion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{EdgeResolution, PackageRecord};

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord::new(name.to_string(), version.to_string()).unwrap()
    }

    fn edge_of<'a>(set: &'a PackageSet, id: &PackageId) -> &'a DependencyEdge {
        &set.get(id).unwrap().dependencies()[0]
    }

    #[test]
    fn test_range_resolves_to_version_present_in_set() {
        // Restore picked 4.5.1 for the [4.5, ) range; 4.5.0 never appears
        let set: PackageSet = vec![
            record("App", "1.0.0")
                .with_dependency("System.Memory", "[4.5, )")
                .unwrap(),
            record("System.Memory", "4.5.1"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);

        assert!(outcome.warnings.is_empty());
        let edge = edge_of(&outcome.packages, &PackageId::new("app", "1.0.0"));
        assert_eq!(edge.resolved_version(), Some("4.5.1"));
    }

    #[test]
    fn test_multiple_candidates_resolve_deterministically() {
        let build = || -> PackageSet {
            vec![
                record("App", "1.0.0")
                    .with_dependency("System.Memory", "[4.5, )")
                    .unwrap(),
                record("System.Memory", "4.5.0"),
                record("System.Memory", "4.5.1"),
            ]
            .into_iter()
            .collect()
        };

        let first = VersionRangeResolver::resolve(build());
        let second = VersionRangeResolver::resolve(build());
        let app = PackageId::new("app", "1.0.0");

        assert_eq!(edge_of(&first.packages, &app).resolved_version(), Some("4.5.1"));
        assert_eq!(
            edge_of(&first.packages, &app),
            edge_of(&second.packages, &app)
        );
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let set: PackageSet = vec![
            record("App", "1.0.0")
                .with_dependency("system.memory", "[4.5, )")
                .unwrap(),
            record("System.Memory", "4.5.5"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        let edge = edge_of(&outcome.packages, &PackageId::new("app", "1.0.0"));
        assert_eq!(edge.resolved_version(), Some("4.5.5"));
    }

    #[test]
    fn test_unsatisfiable_range_is_warning_not_error() {
        let set: PackageSet = vec![
            record("App", "1.0.0")
                .with_dependency("Foo", "[9.0, )")
                .unwrap(),
            record("Foo", "8.0.0"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].reason, UnresolvedReason::NoMatchingVersion);
        assert_eq!(outcome.warnings[0].parent, "App@1.0.0");
        let edge = edge_of(&outcome.packages, &PackageId::new("app", "1.0.0"));
        assert_eq!(
            edge.resolution(),
            &EdgeResolution::Unresolved(UnresolvedReason::NoMatchingVersion)
        );
    }

    #[test]
    fn test_invalid_range_is_reported() {
        let set: PackageSet = vec![record("App", "1.0.0")
            .with_dependency("Foo", "[1.0")
            .unwrap()]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        assert!(matches!(
            outcome.warnings[0].reason,
            UnresolvedReason::InvalidRange(_)
        ));
    }

    #[test]
    fn test_bare_version_present_in_set_is_kept() {
        let set: PackageSet = vec![
            record("App", "1.0.0").with_dependency("Foo", "6.0.0").unwrap(),
            record("Foo", "6.0.0"),
            record("Foo", "8.0.0"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        assert!(outcome.warnings.is_empty());
        let edge = edge_of(&outcome.packages, &PackageId::new("app", "1.0.0"));
        assert_eq!(edge.resolved_version(), Some("6.0.0"));
    }

    #[test]
    fn test_bare_nuget_version_is_a_minimum() {
        // Lockfiles record the declared minimum; restore picked 6.0.1
        let set: PackageSet = vec![
            record("App", "1.0.0").with_dependency("Foo", "6.0.0").unwrap(),
            record("Foo", "6.0.1"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        assert!(outcome.warnings.is_empty());
        let edge = edge_of(&outcome.packages, &PackageId::new("app", "1.0.0"));
        assert_eq!(edge.requirement(), "6.0.0");
        assert_eq!(edge.resolved_version(), Some("6.0.1"));
    }

    #[test]
    fn test_bare_version_below_every_candidate_is_unmatched() {
        let set: PackageSet = vec![
            record("App", "1.0.0").with_dependency("Foo", "9.0.0").unwrap(),
            record("Foo", "8.0.0"),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        assert_eq!(outcome.warnings[0].reason, UnresolvedReason::NoMatchingVersion);
    }

    #[test]
    fn test_bare_npm_version_must_match_exactly() {
        let set: PackageSet = vec![
            record("app", "1.0.0")
                .with_ecosystem(Ecosystem::Npm)
                .with_dependency("lodash", "4.17.20")
                .unwrap(),
            record("lodash", "4.17.21").with_ecosystem(Ecosystem::Npm),
        ]
        .into_iter()
        .collect();

        let outcome = VersionRangeResolver::resolve(set);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].reason, UnresolvedReason::NoMatchingVersion);
    }

    #[test]
    fn test_bare_requirement_resolves_per_target() {
        let build = |bumped: &str| -> PackageSet {
            vec![
                record("P", "1.0.0")
                    .with_direct_reference(true)
                    .with_dependency("Foo", "6.0.0")
                    .unwrap(),
                record("Foo", bumped),
            ]
            .into_iter()
            .collect()
        };

        let p = PackageId::new("p", "1.0.0");
        let net6 = VersionRangeResolver::resolve(build("6.0.1"));
        let net8 = VersionRangeResolver::resolve(build("8.0.0"));

        assert_eq!(edge_of(&net6.packages, &p).resolved_version(), Some("6.0.1"));
        assert_eq!(edge_of(&net8.packages, &p).resolved_version(), Some("8.0.0"));
    }

    #[test]
    fn test_sets_resolve_independently() {
        let net6: PackageSet = vec![
            record("App", "1.0.0")
                .with_dependency("Foo", "[6.0, )")
                .unwrap(),
            record("Foo", "6.0.0"),
        ]
        .into_iter()
        .collect();
        let net8: PackageSet = vec![
            record("App", "1.0.0")
                .with_dependency("Foo", "[8.0, )")
                .unwrap(),
            record("Foo", "8.0.0"),
        ]
        .into_iter()
        .collect();

        let app = PackageId::new("app", "1.0.0");
        let six = VersionRangeResolver::resolve(net6);
        let eight = VersionRangeResolver::resolve(net8);

        assert_eq!(edge_of(&six.packages, &app).resolved_version(), Some("6.0.0"));
        assert_eq!(edge_of(&eight.packages, &app).resolved_version(), Some("8.0.0"));
    }
}
