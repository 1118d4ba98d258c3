use super::dependency_edge::DependencyEdge;
use super::package::{Ecosystem, PackageId, PackageRecord};
use super::version_range::{is_exact_version, VersionRange};
use std::collections::{BTreeMap, HashSet};

/// Working set of package records keyed by identity.
///
/// Backed by a `BTreeMap` so iteration order is deterministic. The graph
/// passes consume a set and return a new one rather than mutating shared state.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    records: BTreeMap<PackageId, PackageRecord>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record; returns false and keeps the existing one on duplicates
    pub fn insert(&mut self, record: PackageRecord) -> bool {
        let id = record.id();
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, record);
        true
    }

    /// Inserts or replaces the record with the same identity
    pub fn upsert(&mut self, record: PackageRecord) {
        self.records.insert(record.id(), record);
    }

    pub fn get(&self, id: &PackageId) -> Option<&PackageRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.records.contains_key(id)
    }

    /// All records sharing `name`, compared case-insensitively
    pub fn find_by_name(&self, name: &str) -> Vec<&PackageRecord> {
        let key = name.to_lowercase();
        self.records
            .iter()
            .filter(|(id, _)| id.name() == key)
            .map(|(_, record)| record)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PackageId> {
        self.records.keys()
    }

    /// Keeps only the records matching `predicate`
    pub fn retain<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&PackageRecord) -> bool,
    {
        self.records.retain(|_, record| predicate(record));
        self
    }

    /// Rebuilds every record through `f`; identity must not change
    pub fn map_records<F>(self, mut f: F) -> Self
    where
        F: FnMut(PackageRecord) -> PackageRecord,
    {
        self.records
            .into_values()
            .map(&mut f)
            .collect()
    }

    /// Records an edge may point at.
    ///
    /// An edge resolved to a present version, or a pending bare-version edge
    /// whose exact version is present, yields that record only. Otherwise
    /// every same-named record is a candidate, narrowed to those satisfying
    /// the requirement when it parses as a range.
    pub fn edge_targets(&self, edge: &DependencyEdge, ecosystem: Ecosystem) -> Vec<PackageId> {
        if let Some(version) = pinned_version(edge) {
            let id = PackageId::new(edge.target().as_str(), version);
            if self.contains(&id) {
                return vec![id];
            }
        }

        let candidates = self.find_by_name(edge.target().as_str());
        let satisfying: Vec<PackageId> = match VersionRange::parse(edge.requirement(), ecosystem)
        {
            Ok(range) => candidates
                .iter()
                .filter(|r| range.satisfied_by(r.version()))
                .map(|r| r.id())
                .collect(),
            Err(_) => Vec::new(),
        };

        if satisfying.is_empty() {
            candidates.iter().map(|r| r.id()).collect()
        } else {
            satisfying
        }
    }

    /// Drops edges that pointed at the `removed` records.
    ///
    /// Resolved or bare-version edges are dropped when their exact target was
    /// removed; range edges when no record with the target name survives.
    pub fn without_edges_to(self, removed: &HashSet<PackageId>) -> Self {
        if removed.is_empty() {
            return self;
        }
        let surviving_names: HashSet<String> =
            self.ids().map(|id| id.name().to_string()).collect();

        self.map_records(|record| {
            let kept: Vec<DependencyEdge> = record
                .dependencies()
                .iter()
                .filter(|edge| match pinned_version(edge) {
                    Some(version) => {
                        !removed.contains(&PackageId::new(edge.target().as_str(), version))
                    }
                    None => surviving_names.contains(edge.target().key()),
                })
                .cloned()
                .collect();
            record.with_dependencies(kept)
        })
    }
}

/// The version an edge names outright: its resolution, or a bare requirement
fn pinned_version(edge: &DependencyEdge) -> Option<&str> {
    let requirement = edge.requirement();
    edge.resolved_version()
        .or_else(|| is_exact_version(requirement).then_some(requirement))
}

impl FromIterator<PackageRecord> for PackageSet {
    fn from_iter<T: IntoIterator<Item = PackageRecord>>(iter: T) -> Self {
        let mut set = PackageSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl IntoIterator for PackageSet {
    type Item = PackageRecord;
    type IntoIter = std::collections::btree_map::IntoValues<PackageId, PackageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

/// A package set as produced by one source, e.g. one target framework of one project
#[derive(Debug, Clone)]
pub struct ScannedPackageSet {
    /// Human-readable origin such as `MyApp.csproj (net8.0)`
    pub origin: String,
    /// Whether the owning project is a test project
    pub is_test_project: bool,
    pub packages: PackageSet,
}

impl ScannedPackageSet {
    pub fn new(origin: impl Into<String>, packages: PackageSet) -> Self {
        Self {
            origin: origin.into(),
            is_test_project: false,
            packages,
        }
    }

    pub fn with_test_project(mut self, is_test_project: bool) -> Self {
        self.is_test_project = is_test_project;
        self
    }
}
