use crate::sbom_generation::domain::{PackageId, PackageSet};
use std::collections::{BTreeSet, HashSet};

/// Result of classifying a package set into direct and transitive packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub direct: BTreeSet<PackageId>,
    /// True when no record carried a direct flag and the root set was inferred
    pub inferred: bool,
}

impl Classification {
    pub fn is_direct(&self, id: &PackageId) -> bool {
        self.direct.contains(id)
    }
}

/// DependencyClassifier service for telling direct from transitive packages
///
/// This service contains pure business logic and works only with domain objects.
pub struct DependencyClassifier;

impl DependencyClassifier {
    /// Determines which packages the top-level component depends on directly
    ///
    /// Records flagged as direct references win. When no record in the set
    /// carries the flag (packages.config style scans), every record that is
    /// not the target of another record's edge is treated as direct.
    pub fn classify(packages: &PackageSet) -> Classification {
        let flagged: BTreeSet<PackageId> = packages
            .iter()
            .filter(|record| record.is_direct_reference())
            .map(|record| record.id())
            .collect();

        if !flagged.is_empty() || packages.is_empty() {
            return Classification {
                direct: flagged,
                inferred: false,
            };
        }

        let referenced = Self::referenced_ids(packages);
        let direct = packages
            .ids()
            .filter(|id| !referenced.contains(*id))
            .cloned()
            .collect();

        Classification {
            direct,
            inferred: true,
        }
    }

    /// Ids that some other record points at
    fn referenced_ids(packages: &PackageSet) -> HashSet<PackageId> {
        let mut referenced = HashSet::new();
        for record in packages.iter() {
            let own_id = record.id();
            for edge in record.dependencies() {
                for target in packages.edge_targets(edge, record.ecosystem()) {
                    if target != own_id {
                        referenced.insert(target);
                    }
                }
            }
        }
        referenced
    }
}
