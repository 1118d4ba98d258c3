use super::dependency_classifier::DependencyClassifier;
use crate::sbom_generation::domain::{
    Bom, Component, Dependency, DependencyEdge, Ecosystem, PackageId, PackageMetadata,
    PackageRecord, PackageSet, SbomMetadata, Scope,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Metadata lookup results keyed by package identity.
///
/// `None` means the registry does not know the package; such records are
/// left out of the BOM.
pub type MetadataLookup = HashMap<PackageId, Option<PackageMetadata>>;

/// Non-fatal problems found while assembling the BOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// The metadata lookup returned nothing for this package
    MissingMetadata { package: String },
    /// An unresolved edge matched no single component and was left out
    DroppedEdge {
        parent: String,
        dependency: String,
        requirement: String,
    },
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyWarning::MissingMetadata { package } => {
                write!(f, "No metadata found for {}; left out of the BOM", package)
            }
            AssemblyWarning::DroppedEdge {
                parent,
                dependency,
                requirement,
            } => write!(
                f,
                "Dependency {} {} of {} matched no single component; edge left out",
                dependency, requirement, parent
            ),
        }
    }
}

/// Assembled BOM plus the warnings raised on the way
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    pub bom: Bom,
    pub warnings: Vec<AssemblyWarning>,
}

/// Maps `(ecosystem, name, version)` to the bom-ref of the component built for it.
///
/// Names match ignoring case; versions match exactly, as in `PackageId`.
#[derive(Debug, Default)]
pub struct BomRefLookup {
    by_id: HashMap<(Ecosystem, String, String), String>,
    by_name: HashMap<(Ecosystem, String), Vec<String>>,
}

impl BomRefLookup {
    pub fn insert(&mut self, ecosystem: Ecosystem, name: &str, version: &str, bom_ref: &str) {
        let name = name.to_lowercase();
        let key = (ecosystem, name.clone(), version.to_string());
        if self.by_id.insert(key, bom_ref.to_string()).is_none() {
            self.by_name
                .entry((ecosystem, name))
                .or_default()
                .push(bom_ref.to_string());
        }
    }

    pub fn get(&self, ecosystem: Ecosystem, name: &str, version: &str) -> Option<&str> {
        self.by_id
            .get(&(ecosystem, name.to_lowercase(), version.to_string()))
            .map(String::as_str)
    }

    /// Bom-refs of every component of `ecosystem` sharing `name`
    pub fn candidates(&self, ecosystem: Ecosystem, name: &str) -> &[String] {
        self.by_name
            .get(&(ecosystem, name.to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// BomAssembler turns the final working set into components and dependency nodes
pub struct BomAssembler {
    include_excluded: bool,
}

impl BomAssembler {
    /// `include_excluded` keeps `Excluded`-scope records as components
    pub fn new(include_excluded: bool) -> Self {
        Self { include_excluded }
    }

    /// Builds the BOM for `packages`.
    ///
    /// # Errors
    /// Returns `SbomError::UnableToLocateDependencyBomRef` when a resolved
    /// edge names a version with no component and the name alone does not
    /// identify a single component either.
    pub fn assemble(
        &self,
        packages: &PackageSet,
        metadata: &MetadataLookup,
        top_level: Component,
        sbom_metadata: SbomMetadata,
    ) -> Result<AssemblyOutcome> {
        let mut warnings = Vec::new();
        let mut lookup = BomRefLookup::default();
        let mut components = Vec::new();
        let mut included: Vec<&PackageRecord> = Vec::new();
        // Records deliberately left out; edges into them are dropped quietly
        let mut left_out: HashSet<PackageId> = HashSet::new();

        for record in packages.iter() {
            if record.scope() == Scope::Excluded && !self.include_excluded {
                left_out.insert(record.id());
                continue;
            }
            let Some(found) = metadata.get(&record.id()).cloned().flatten() else {
                warnings.push(AssemblyWarning::MissingMetadata {
                    package: record.to_string(),
                });
                left_out.insert(record.id());
                continue;
            };

            let component = Component::from_record(record, found);
            lookup.insert(
                record.ecosystem(),
                record.name(),
                record.version(),
                component.bom_ref(),
            );
            components.push(component);
            included.push(record);
        }

        let mut dependencies = Vec::with_capacity(included.len() + 1);
        for record in included {
            let parent_ref = lookup
                .get(record.ecosystem(), record.name(), record.version())
                .map(str::to_string)
                .unwrap_or_else(|| record.to_string());

            let mut children = Vec::new();
            for edge in record.dependencies() {
                match Self::locate(packages, &lookup, &left_out, record, edge)? {
                    Located::Found(child) => children.push(child),
                    Located::LeftOut => {}
                    Located::Ambiguous => warnings.push(AssemblyWarning::DroppedEdge {
                        parent: record.to_string(),
                        dependency: edge.target().to_string(),
                        requirement: edge.requirement().to_string(),
                    }),
                }
            }
            dependencies.push(Dependency::new(parent_ref, children));
        }

        let root_children: Vec<String> = DependencyClassifier::classify(packages)
            .direct
            .iter()
            .filter_map(|id| packages.get(id))
            .filter_map(|record| lookup.get(record.ecosystem(), record.name(), record.version()))
            .map(str::to_string)
            .collect();
        dependencies.push(Dependency::new(
            top_level.bom_ref().to_string(),
            root_children,
        ));

        components.sort_by(|a, b| {
            compare_ci(
                &[a.name(), a.version()],
                &[b.name(), b.version()],
            )
        });
        dependencies.sort_by(|a, b| compare_ci(&[a.bom_ref()], &[b.bom_ref()]));

        Ok(AssemblyOutcome {
            bom: Bom {
                metadata: sbom_metadata.with_component(top_level),
                components,
                dependencies,
            },
            warnings,
        })
    }

    fn locate(
        packages: &PackageSet,
        lookup: &BomRefLookup,
        left_out: &HashSet<PackageId>,
        parent: &PackageRecord,
        edge: &DependencyEdge,
    ) -> Result<Located> {
        let name = edge.target().as_str();
        let ecosystem = parent.ecosystem();

        if let Some(version) = edge.resolved_version() {
            if let Some(bom_ref) = lookup.get(ecosystem, name, version) {
                return Ok(Located::Found(bom_ref.to_string()));
            }
            if left_out.contains(&PackageId::new(name, version)) {
                return Ok(Located::LeftOut);
            }
            return match lookup.candidates(ecosystem, name) {
                [single] => Ok(Located::Found(single.clone())),
                [] if Self::all_left_out(packages, left_out, name) => Ok(Located::LeftOut),
                candidates => Err(SbomError::UnableToLocateDependencyBomRef {
                    parent: parent.to_string(),
                    dependency: format!("{}@{}", name, version),
                    details: format!(
                        "{} component(s) named {} and none with version {}",
                        candidates.len(),
                        name,
                        version
                    ),
                }
                .into()),
            };
        }

        // Unresolved range edge: accept a unique match among surviving components
        let matches: Vec<&str> = packages
            .edge_targets(edge, ecosystem)
            .iter()
            .filter_map(|id| lookup.get(ecosystem, id.name(), id.version()))
            .collect();
        match matches.as_slice() {
            [single] => Ok(Located::Found(single.to_string())),
            [] if Self::all_left_out(packages, left_out, name) => Ok(Located::LeftOut),
            _ => match lookup.candidates(ecosystem, name) {
                [single] => Ok(Located::Found(single.clone())),
                _ => Ok(Located::Ambiguous),
            },
        }
    }

    /// True when records named `name` exist and every one of them was left out
    fn all_left_out(packages: &PackageSet, left_out: &HashSet<PackageId>, name: &str) -> bool {
        let same_name = packages.find_by_name(name);
        !same_name.is_empty() && same_name.iter().all(|record| left_out.contains(&record.id()))
    }
}

enum Located {
    Found(String),
    LeftOut,
    Ambiguous,
}

/// Compares key tuples ordinally ignoring case; exact ties broken ordinally
fn compare_ci(a: &[&str], b: &[&str]) -> Ordering {
    let folded = |keys: &[&str]| keys.iter().map(|k| k.to_lowercase()).collect::<Vec<_>>();
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}
