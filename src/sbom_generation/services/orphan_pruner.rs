use super::dependency_classifier::DependencyClassifier;
use crate::sbom_generation::domain::{PackageId, PackageSet};
use std::collections::{HashSet, VecDeque};

/// Result of an orphan pruning pass
#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub packages: PackageSet,
    pub removed: Vec<PackageId>,
}

/// Where the pruning walk starts.
///
/// Must be decided on the set as read, before any exclusion: once every
/// flagged record has been removed, the remaining set looks unflagged and
/// would otherwise promote its leftovers to roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootPolicy {
    /// Only records flagged as direct references are roots
    Flagged,
    /// The input carried no flags; roots are the records nothing points at
    Inferred,
}

impl RootPolicy {
    pub fn for_input(packages: &PackageSet) -> Self {
        if packages.iter().any(|record| record.is_direct_reference()) {
            RootPolicy::Flagged
        } else {
            RootPolicy::Inferred
        }
    }
}

/// OrphanPruner removes packages no longer reachable from a direct reference
pub struct OrphanPruner;

impl OrphanPruner {
    /// Breadth-first walk from the roots `policy` selects, following
    /// dependency edges.
    ///
    /// Anything not reached is dropped. A package shared by several parents
    /// survives as long as one of them does. The visited set makes cyclic
    /// input terminate.
    pub fn prune(packages: PackageSet, policy: RootPolicy) -> PruneOutcome {
        let roots: Vec<PackageId> = match policy {
            RootPolicy::Flagged => packages
                .iter()
                .filter(|record| record.is_direct_reference())
                .map(|record| record.id())
                .collect(),
            RootPolicy::Inferred => DependencyClassifier::classify(&packages)
                .direct
                .into_iter()
                .collect(),
        };

        let mut visited: HashSet<PackageId> = HashSet::new();
        let mut queue: VecDeque<PackageId> = roots.into_iter().collect();

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(record) = packages.get(&id) else {
                continue;
            };
            for edge in record.dependencies() {
                for target in packages.edge_targets(edge, record.ecosystem()) {
                    if !visited.contains(&target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        let removed: Vec<PackageId> = packages
            .ids()
            .filter(|id| !visited.contains(*id))
            .cloned()
            .collect();

        if removed.is_empty() {
            return PruneOutcome {
                packages,
                removed,
            };
        }

        PruneOutcome {
            packages: packages.retain(|record| visited.contains(&record.id())),
            removed,
        }
    }
}
