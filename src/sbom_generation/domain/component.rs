use super::package::{DependencyType, Ecosystem, PackageRecord, Scope};
use super::package_metadata::{ComponentHash, HashAlgorithm, PackageMetadata};

/// CycloneDX component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    File,
}

impl ComponentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Application => "application",
            ComponentType::Framework => "framework",
            ComponentType::Library => "library",
            ComponentType::Container => "container",
            ComponentType::OperatingSystem => "operating-system",
            ComponentType::Device => "device",
            ComponentType::Firmware => "firmware",
            ComponentType::File => "file",
        }
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "application" => Ok(ComponentType::Application),
            "framework" => Ok(ComponentType::Framework),
            "library" => Ok(ComponentType::Library),
            "container" => Ok(ComponentType::Container),
            "operating-system" | "operatingsystem" => Ok(ComponentType::OperatingSystem),
            "device" => Ok(ComponentType::Device),
            "firmware" => Ok(ComponentType::Firmware),
            "file" => Ok(ComponentType::File),
            _ => Err(format!(
                "Invalid component type: {}. Expected one of application, framework, library, container, operating-system, device, firmware, file",
                s
            )),
        }
    }
}

/// Builds the package URL for a registry package
pub fn package_url(ecosystem: Ecosystem, name: &str, version: &str) -> String {
    // Scoped npm names keep their '/' separator but encode the leading '@'
    let encoded_name = name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "pkg:{}/{}@{}",
        ecosystem.purl_type(),
        encoded_name,
        urlencoding::encode(version)
    )
}

/// Computes the stable bom-ref for a record.
///
/// Registry packages are referenced by purl; project references have no
/// purl and use `Name@Version`.
pub fn bom_ref_for(record: &PackageRecord) -> String {
    match record.dependency_type() {
        DependencyType::Package => {
            package_url(record.ecosystem(), record.name(), record.version())
        }
        DependencyType::Project => format!("{}@{}", record.name(), record.version()),
    }
}

/// A BOM component derived from a package record plus registry metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    bom_ref: String,
    name: String,
    version: String,
    component_type: ComponentType,
    purl: Option<String>,
    scope: Option<Scope>,
    metadata: PackageMetadata,
}

impl Component {
    /// Builds a component; the lockfile hash is added unless the registry
    /// already published a SHA-512
    pub fn from_record(record: &PackageRecord, mut metadata: PackageMetadata) -> Self {
        if let Some(hash) = record.content_hash() {
            let has_sha512 = metadata
                .hashes
                .iter()
                .any(|existing| existing.algorithm == HashAlgorithm::Sha512);
            if !has_sha512 {
                metadata.hashes.push(ComponentHash {
                    algorithm: HashAlgorithm::Sha512,
                    content: hash.to_string(),
                });
            }
        }

        let purl = match record.dependency_type() {
            DependencyType::Package => Some(package_url(
                record.ecosystem(),
                record.name(),
                record.version(),
            )),
            DependencyType::Project => None,
        };

        Self {
            bom_ref: bom_ref_for(record),
            name: record.name().to_string(),
            version: record.version().to_string(),
            component_type: ComponentType::Library,
            purl,
            scope: Some(record.scope()),
            metadata,
        }
    }

    /// The component describing the scanned project itself
    pub fn top_level(name: &str, version: &str, component_type: ComponentType) -> Self {
        Self {
            bom_ref: format!("{}@{}", name, version),
            name: name.to_string(),
            version: version.to_string(),
            component_type,
            purl: None,
            scope: None,
            metadata: PackageMetadata::stub(),
        }
    }

    /// Rebuilds the top-level component with new identity fields
    pub fn renamed(&self, name: &str, version: &str, component_type: ComponentType) -> Self {
        Self {
            bom_ref: format!("{}@{}", name, version),
            name: name.to_string(),
            version: version.to_string(),
            component_type,
            purl: self.purl.clone(),
            scope: self.scope,
            metadata: self.metadata.clone(),
        }
    }

    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn bom_ref(&self) -> &str {
        &self.bom_ref
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn purl(&self) -> Option<&str> {
        self.purl.as_deref()
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }
}
