use crate::sbom_generation::domain::{
    ComponentHash, ComponentType, HashAlgorithm, LicenseInfo, PackageMetadata,
};
use crate::sbom_generation::policies::ComponentFields;
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;

/// A CycloneDX document used only for its `metadata.component`
#[derive(Debug, Deserialize)]
struct TemplateDocument {
    #[serde(default)]
    metadata: Option<TemplateMetadata>,
}

#[derive(Debug, Deserialize)]
struct TemplateMetadata {
    #[serde(default)]
    component: Option<TemplateComponent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateComponent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default, rename = "type")]
    component_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    licenses: Vec<TemplateLicenseChoice>,
    #[serde(default)]
    hashes: Vec<TemplateHash>,
    #[serde(default)]
    external_references: Vec<TemplateReference>,
}

#[derive(Debug, Deserialize)]
struct TemplateLicenseChoice {
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    license: Option<TemplateLicense>,
}

#[derive(Debug, Deserialize)]
struct TemplateLicense {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TemplateHash {
    alg: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct TemplateReference {
    #[serde(rename = "type")]
    reference_type: String,
    url: String,
}

/// Extracts the top-level component fields from a CycloneDX JSON template
pub fn parse_metadata_template(content: &str) -> Result<ComponentFields> {
    let document: TemplateDocument =
        serde_json::from_str(content).context("Metadata template is not valid CycloneDX JSON")?;

    let component = document
        .metadata
        .and_then(|metadata| metadata.component)
        .context("Metadata template has no metadata.component")?;

    let component_type = component
        .component_type
        .as_deref()
        .map(str::parse::<ComponentType>)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Metadata template component: {}", e))?;

    let metadata = PackageMetadata {
        license: component.licenses.into_iter().find_map(to_license),
        license_url: None,
        description: component.description,
        publisher: component.publisher,
        project_url: component
            .external_references
            .into_iter()
            .find(|reference| reference.reference_type == "website")
            .map(|reference| reference.url),
        hashes: component.hashes.into_iter().filter_map(to_hash).collect(),
    };

    Ok(ComponentFields {
        name: component.name,
        version: component.version,
        component_type,
        metadata: (!metadata.is_stub()).then_some(metadata),
    })
}

fn to_license(choice: TemplateLicenseChoice) -> Option<LicenseInfo> {
    if let Some(expression) = choice.expression {
        return Some(LicenseInfo::Expression(expression));
    }
    let license = choice.license?;
    license
        .id
        .map(LicenseInfo::SpdxId)
        .or(license.url.map(LicenseInfo::Url))
}

fn to_hash(hash: TemplateHash) -> Option<ComponentHash> {
    let algorithm = match hash.alg.as_str() {
        "SHA-256" => HashAlgorithm::Sha256,
        "SHA-512" => HashAlgorithm::Sha512,
        _ => return None,
    };
    Some(ComponentHash {
        algorithm,
        content: hash.content,
    })
}
