use super::dependency_edge::DependencyEdge;
use crate::shared::Result;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// NewType wrapper for package name with validation
///
/// NuGet package IDs are case-insensitive, so equality and hashing
/// use the lowercase form while the original casing is kept for display.
#[derive(Debug, Clone)]
pub struct PackageName {
    display: String,
    key: String,
}

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        // '@' and '/' only appear in scoped npm names such as @angular/core
        if !name.chars().all(|c| {
            c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '@' || c == '/'
        }) {
            anyhow::bail!(
                "Package name '{}' contains invalid characters. Only alphanumeric, hyphens, underscores, dots, '@' and '/' are allowed.",
                name
            );
        }

        let key = name.to_lowercase();
        Ok(Self { display: name, key })
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercase identity key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, other: &str) -> bool {
        self.key == other.to_lowercase()
    }
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PackageName {}

impl Hash for PackageName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// NewType wrapper for package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if !version
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '+')
        {
            anyhow::bail!(
                "Package version '{}' contains invalid characters. Only alphanumeric, dots, hyphens and plus are allowed.",
                version
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a package record: lowercase name plus exact version.
///
/// Ordering is by name key first, then ordinal on the version string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    name: String,
    version: String,
}

impl PackageId {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            version: version.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Scope of a package in the final BOM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Required,
    Optional,
    Excluded,
}

impl Scope {
    /// Rank used when merging: lower is less restrictive
    fn restrictiveness(self) -> u8 {
        match self {
            Scope::Required => 0,
            Scope::Optional => 1,
            Scope::Excluded => 2,
        }
    }

    /// Returns the less restrictive of two scopes
    pub fn least_restrictive(self, other: Scope) -> Scope {
        if self.restrictiveness() <= other.restrictiveness() {
            self
        } else {
            other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Required => "required",
            Scope::Optional => "optional",
            Scope::Excluded => "excluded",
        }
    }
}

/// Whether a record is a registry package or a reference to another project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyType {
    #[default]
    Package,
    Project,
}

/// Package ecosystem the record was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ecosystem {
    #[default]
    NuGet,
    Npm,
}

impl Ecosystem {
    pub fn purl_type(self) -> &'static str {
        match self {
            Ecosystem::NuGet => "nuget",
            Ecosystem::Npm => "npm",
        }
    }
}

/// One resolved dependency as reported by a package source.
///
/// Equality, hashing and ordering use [`PackageId`] only, so two records
/// that differ just in name casing are the same package.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    name: PackageName,
    version: Version,
    is_direct_reference: bool,
    is_dev_dependency: bool,
    scope: Scope,
    dependency_type: DependencyType,
    ecosystem: Ecosystem,
    dependencies: Vec<DependencyEdge>,
    content_hash: Option<String>,
}

impl PackageRecord {
    pub fn new(name: String, version: String) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            is_direct_reference: false,
            is_dev_dependency: false,
            scope: Scope::Required,
            dependency_type: DependencyType::Package,
            ecosystem: Ecosystem::NuGet,
            dependencies: Vec::new(),
            content_hash: None,
        })
    }

    pub fn with_direct_reference(mut self, is_direct: bool) -> Self {
        self.is_direct_reference = is_direct;
        self
    }

    pub fn with_dev_dependency(mut self, is_dev: bool) -> Self {
        self.is_dev_dependency = is_dev;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_dependency_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_type = dependency_type;
        self
    }

    pub fn with_ecosystem(mut self, ecosystem: Ecosystem) -> Self {
        self.ecosystem = ecosystem;
        self
    }

    pub fn with_content_hash(mut self, content_hash: Option<String>) -> Self {
        self.content_hash = content_hash;
        self
    }

    /// Adds a dependency edge to `name` with the given version or range
    pub fn with_dependency(mut self, name: &str, requirement: &str) -> Result<Self> {
        self.dependencies
            .push(DependencyEdge::new(PackageName::new(name.to_string())?, requirement));
        Ok(self)
    }

    pub fn with_dependencies(mut self, dependencies: Vec<DependencyEdge>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn id(&self) -> PackageId {
        PackageId::new(self.name.as_str(), self.version.as_str())
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn package_name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn is_direct_reference(&self) -> bool {
        self.is_direct_reference
    }

    pub fn is_dev_dependency(&self) -> bool {
        self.is_dev_dependency
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn dependency_type(&self) -> DependencyType {
        self.dependency_type
    }

    pub fn is_project_reference(&self) -> bool {
        self.dependency_type == DependencyType::Project
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }
}

impl PartialEq for PackageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for PackageRecord {}

impl Hash for PackageRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl PartialOrd for PackageRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl std::fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
