use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{self, Bom, LicenseInfo, SbomMetadata};
use crate::shared::Result;
use serde::Serialize;

const SPEC_VERSION: &str = "1.6";

/// License name CycloneDX requires when only a URL is known
const URL_ONLY_LICENSE_NAME: &str = "Unknown - See URL";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    bom_format: &'static str,
    spec_version: &'static str,
    serial_number: String,
    version: u32,
    metadata: Metadata,
    components: Vec<Component>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Tools,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<Component>,
}

#[derive(Debug, Serialize)]
struct Tools {
    components: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    component_type: &'static str,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Component {
    #[serde(rename = "type")]
    component_type: &'static str,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<LicenseChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<ExternalReference>,
}

#[derive(Debug, Serialize)]
struct Hash {
    alg: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LicenseChoice {
    Expression { expression: String },
    License { license: License },
}

#[derive(Debug, Serialize)]
struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExternalReference {
    #[serde(rename = "type")]
    reference_type: &'static str,
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.6 JSON format
///
/// Serializes the assembled [`Bom`] as-is: component and dependency order
/// is already deterministic, so two runs over the same input differ only
/// in timestamp and serial number.
pub struct CycloneDxFormatter;

impl CycloneDxFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxFormatter {
    fn format(&self, bom: &Bom) -> Result<String> {
        let document = Document {
            bom_format: "CycloneDX",
            spec_version: SPEC_VERSION,
            serial_number: bom.metadata.serial_number().to_string(),
            version: 1,
            metadata: build_metadata(&bom.metadata),
            components: bom.components.iter().map(build_component).collect(),
            dependencies: bom
                .dependencies
                .iter()
                .map(|node| Dependency {
                    bom_ref: node.bom_ref().to_string(),
                    depends_on: node.child_refs().into_iter().map(String::from).collect(),
                })
                .collect(),
        };

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}

fn build_metadata(metadata: &SbomMetadata) -> Metadata {
    Metadata {
        timestamp: metadata.timestamp().to_string(),
        tools: Tools {
            components: vec![Tool {
                component_type: "application",
                name: metadata.tool_name().to_string(),
                version: metadata.tool_version().to_string(),
            }],
        },
        component: metadata.component().map(build_component),
    }
}

fn build_component(component: &domain::Component) -> Component {
    let metadata = component.metadata();
    Component {
        component_type: component.component_type().as_str(),
        bom_ref: component.bom_ref().to_string(),
        publisher: metadata.publisher.clone(),
        name: component.name().to_string(),
        version: component.version().to_string(),
        description: metadata.description.clone(),
        scope: component.scope().map(|scope| scope.as_str()),
        hashes: metadata
            .hashes
            .iter()
            .map(|hash| Hash {
                alg: hash.algorithm.as_str(),
                content: hash.content.clone(),
            })
            .collect(),
        licenses: metadata.license.iter().map(build_license).collect(),
        purl: component.purl().map(str::to_string),
        external_references: metadata
            .project_url
            .iter()
            .map(|url| ExternalReference {
                reference_type: "website",
                url: url.clone(),
            })
            .collect(),
    }
}

fn build_license(license: &LicenseInfo) -> LicenseChoice {
    match license {
        LicenseInfo::Expression(expression) => LicenseChoice::Expression {
            expression: expression.clone(),
        },
        LicenseInfo::SpdxId(id) => LicenseChoice::License {
            license: License {
                id: Some(id.clone()),
                name: None,
                url: None,
            },
        },
        LicenseInfo::Url(url) => LicenseChoice::License {
            license: License {
                id: None,
                name: Some(URL_ONLY_LICENSE_NAME.to_string()),
                url: Some(url.clone()),
            },
        },
    }
}
