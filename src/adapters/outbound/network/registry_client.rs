use super::http_client::{validate_url_component, HttpClient};
use crate::ports::outbound::MetadataRepository;
use crate::sbom_generation::domain::{Ecosystem, PackageMetadata};
use crate::sbom_generation::policies::LicensePriority;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

const NUGET_REGISTRATION_BASE: &str = "https://api.nuget.org/v3/registration5-gz-semver2";
const NPM_REGISTRY_BASE: &str = "https://registry.npmjs.org";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationLeaf {
    catalog_entry: CatalogEntryRef,
}

/// Registration leaves link to the catalog entry; registration pages inline it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogEntryRef {
    Link(String),
    Inline(Box<CatalogEntry>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(default)]
    license_expression: Option<String>,
    #[serde(default)]
    license_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    authors: Option<Authors>,
    #[serde(default)]
    project_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Authors {
    fn joined(self) -> String {
        match self {
            Authors::One(author) => author,
            Authors::Many(authors) => authors.join(", "),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NpmVersionDocument {
    #[serde(default)]
    license: Option<NpmLicense>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    author: Option<NpmPerson>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmLicense {
    Expression(String),
    Legacy {
        #[serde(rename = "type")]
        license_type: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmPerson {
    Text(String),
    Object { name: String },
}

/// RegistryMetadataRepository adapter for the public package registries
///
/// NuGet packages are looked up through the registration API (leaf, then
/// catalog entry); npm packages through the registry's version document.
/// A registry 404 yields a stub so the component is still emitted.
pub struct RegistryMetadataRepository {
    http: HttpClient,
    nuget_base: String,
    npm_base: String,
}

impl RegistryMetadataRepository {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            nuget_base: NUGET_REGISTRATION_BASE.to_string(),
            npm_base: NPM_REGISTRY_BASE.to_string(),
        })
    }

    /// Points NuGet lookups at another registration hive (e.g. a mirror)
    pub fn with_nuget_base(mut self, base: impl Into<String>) -> Self {
        self.nuget_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_npm_base(mut self, base: impl Into<String>) -> Self {
        self.npm_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn nuget_leaf_url(&self, name: &str, version: &str) -> Result<String> {
        validate_url_component(name, "Package name")?;
        validate_url_component(version, "Version")?;

        Ok(format!(
            "{}/{}/{}.json",
            self.nuget_base,
            urlencoding::encode(&name.to_lowercase()),
            urlencoding::encode(&version.to_lowercase())
        ))
    }

    fn npm_version_url(&self, name: &str, version: &str) -> Result<String> {
        let (scope, bare) = match name.strip_prefix('@').and_then(|n| n.split_once('/')) {
            Some((scope, bare)) => (Some(scope), bare),
            None => (None, name),
        };
        if let Some(scope) = scope {
            validate_url_component(scope, "Package scope")?;
        }
        validate_url_component(bare, "Package name")?;
        validate_url_component(version, "Version")?;

        let encoded_name = match scope {
            Some(scope) => format!(
                "@{}%2F{}",
                urlencoding::encode(scope),
                urlencoding::encode(bare)
            ),
            None => urlencoding::encode(bare).into_owned(),
        };
        Ok(format!(
            "{}/{}/{}",
            self.npm_base,
            encoded_name,
            urlencoding::encode(version)
        ))
    }

    async fn fetch_nuget(&self, name: &str, version: &str) -> Result<PackageMetadata> {
        let url = self.nuget_leaf_url(name, version)?;
        let Some(leaf) = self.http.get_json::<RegistrationLeaf>(&url).await? else {
            return Ok(PackageMetadata::stub());
        };

        let entry = match leaf.catalog_entry {
            CatalogEntryRef::Inline(entry) => *entry,
            CatalogEntryRef::Link(link) => {
                if !link.starts_with("https://") {
                    anyhow::bail!("Security: catalog entry link is not https: {}", link);
                }
                match self.http.get_json::<CatalogEntry>(&link).await? {
                    Some(entry) => entry,
                    None => return Ok(PackageMetadata::stub()),
                }
            }
        };

        Ok(nuget_metadata(entry))
    }

    async fn fetch_npm(&self, name: &str, version: &str) -> Result<PackageMetadata> {
        let url = self.npm_version_url(name, version)?;
        Ok(self
            .http
            .get_json::<NpmVersionDocument>(&url)
            .await?
            .map(npm_metadata)
            .unwrap_or_default())
    }
}

#[async_trait]
impl MetadataRepository for RegistryMetadataRepository {
    async fn fetch_metadata(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageMetadata>> {
        let metadata = match ecosystem {
            Ecosystem::NuGet => self.fetch_nuget(name, version).await?,
            Ecosystem::Npm => self.fetch_npm(name, version).await?,
        };
        Ok(Some(metadata))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn nuget_metadata(entry: CatalogEntry) -> PackageMetadata {
    let license_url = non_empty(entry.license_url);
    PackageMetadata {
        license: LicensePriority::select_license(
            entry.license_expression.as_deref(),
            license_url.as_deref(),
        ),
        license_url,
        description: non_empty(entry.description),
        publisher: non_empty(entry.authors.map(Authors::joined)),
        project_url: non_empty(entry.project_url),
        hashes: Vec::new(),
    }
}

fn npm_metadata(document: NpmVersionDocument) -> PackageMetadata {
    let expression = document.license.map(|license| match license {
        NpmLicense::Expression(expression) => expression,
        NpmLicense::Legacy { license_type } => license_type,
    });
    PackageMetadata {
        license: LicensePriority::select_license(expression.as_deref(), None),
        license_url: None,
        description: non_empty(document.description),
        publisher: non_empty(document.author.map(|author| match author {
            NpmPerson::Text(text) => text,
            NpmPerson::Object { name } => name,
        })),
        project_url: non_empty(document.homepage),
        hashes: Vec::new(),
    }
}
