use crate::sbom_generation::domain::{DependencyEdge, PackageId, PackageRecord, PackageSet};
use std::collections::{BTreeMap, HashSet};

/// GraphMerger unions package sets from several sources into one working set
pub struct GraphMerger;

impl GraphMerger {
    /// Unions `sets` keyed by package identity.
    ///
    /// Records present in more than one source are combined: the direct flag
    /// is set if any source sets it, the dev flag only if every source does,
    /// dependency edges are unioned and scope takes the least restrictive
    /// value. Distinct versions of one name are kept side by side.
    pub fn merge<I>(sets: I) -> PackageSet
    where
        I: IntoIterator<Item = PackageSet>,
    {
        let mut merged = PackageSet::new();
        for set in sets {
            for record in set {
                let combined = match merged.get(&record.id()) {
                    Some(existing) => Self::merge_records(existing.clone(), record),
                    None => record,
                };
                merged.upsert(combined);
            }
        }
        merged
    }

    fn merge_records(existing: PackageRecord, incoming: PackageRecord) -> PackageRecord {
        let is_direct = existing.is_direct_reference() || incoming.is_direct_reference();
        let is_dev = existing.is_dev_dependency() && incoming.is_dev_dependency();
        let scope = existing.scope().least_restrictive(incoming.scope());
        let content_hash = existing
            .content_hash()
            .or(incoming.content_hash())
            .map(str::to_string);
        let edges = Self::union_edges(existing.dependencies(), incoming.dependencies());

        existing
            .with_direct_reference(is_direct)
            .with_dev_dependency(is_dev)
            .with_scope(scope)
            .with_content_hash(content_hash)
            .with_dependencies(edges)
    }

    /// Unions two edge lists.
    ///
    /// Resolved edges are keyed by target and version so different versions
    /// of one dependency coexist; an unresolved edge is dropped once a
    /// resolved edge to the same name is known.
    fn union_edges(left: &[DependencyEdge], right: &[DependencyEdge]) -> Vec<DependencyEdge> {
        let mut resolved: BTreeMap<(String, String), DependencyEdge> = BTreeMap::new();
        let mut unresolved: BTreeMap<String, DependencyEdge> = BTreeMap::new();

        for edge in left.iter().chain(right) {
            let name = edge.target().key().to_string();
            match edge.resolved_version() {
                Some(version) => {
                    resolved
                        .entry((name, version.to_string()))
                        .or_insert_with(|| edge.clone());
                }
                None => {
                    unresolved.entry(name).or_insert_with(|| edge.clone());
                }
            }
        }

        let resolved_names: HashSet<&str> =
            resolved.keys().map(|(name, _)| name.as_str()).collect();
        let pending: Vec<DependencyEdge> = unresolved
            .into_iter()
            .filter(|(name, _)| !resolved_names.contains(name.as_str()))
            .map(|(_, edge)| edge)
            .collect();

        resolved.into_values().chain(pending).collect()
    }

    /// Hides project references from the working set.
    ///
    /// Packages a project reference depended on are promoted to direct
    /// references, edges to the hidden projects are stripped and the project
    /// records are removed.
    pub fn hide_project_references(packages: PackageSet) -> PackageSet {
        let projects: HashSet<PackageId> = packages
            .iter()
            .filter(|record| record.is_project_reference())
            .map(|record| record.id())
            .collect();

        if projects.is_empty() {
            return packages;
        }

        let promoted: HashSet<PackageId> = packages
            .iter()
            .filter(|record| record.is_project_reference())
            .flat_map(|project| {
                project
                    .dependencies()
                    .iter()
                    .flat_map(|edge| packages.edge_targets(edge, project.ecosystem()))
                    .collect::<Vec<_>>()
            })
            .filter(|id| !projects.contains(id))
            .collect();

        packages
            .retain(|record| !record.is_project_reference())
            .without_edges_to(&projects)
            .map_records(|record| {
                if promoted.contains(&record.id()) {
                    record.with_direct_reference(true)
                } else {
                    record
                }
            })
    }
}
