use super::http_client::{validate_url_component, HttpClient};
use crate::ports::outbound::MetadataRepository;
use crate::sbom_generation::domain::{Ecosystem, LicenseInfo, PackageMetadata};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com", "raw.githubusercontent.com"];

/// SPDX id GitHub reports when it found a license file it cannot classify
const NO_ASSERTION: &str = "NOASSERTION";

#[derive(Debug, Deserialize)]
struct RepositoryLicense {
    license: Option<LicenseSummary>,
}

#[derive(Debug, Deserialize)]
struct LicenseSummary {
    spdx_id: Option<String>,
}

/// `owner/repo` extracted from a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq)]
struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    fn from_url(url: &str) -> Option<Self> {
        let rest = url
            .trim()
            .strip_prefix("https://")
            .or_else(|| url.trim().strip_prefix("http://"))?;
        let (host, path) = rest.split_once('/')?;
        if !GITHUB_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            return None;
        }

        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let owner = segments.next()?;
        let name = segments.next()?.trim_end_matches(".git");
        if validate_url_component(owner, "Repository owner").is_err()
            || validate_url_component(name, "Repository name").is_err()
        {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    fn cache_key(&self) -> String {
        format!("{}/{}", self.owner, self.name).to_lowercase()
    }
}

/// GitHubLicenseResolver decorates a MetadataRepository
///
/// When the registry only published a license URL that points into a
/// GitHub repository, the repository's detected license is fetched from
/// the GitHub license API and replaces the URL with an SPDX id. Results
/// are cached per repository.
pub struct GitHubLicenseResolver<R: MetadataRepository> {
    inner: R,
    http: HttpClient,
    token: Option<String>,
    api_base: String,
    cache: DashMap<String, Option<String>>,
}

impl<R: MetadataRepository> GitHubLicenseResolver<R> {
    pub fn new(inner: R, token: Option<String>) -> Result<Self> {
        Ok(Self {
            inner,
            http: HttpClient::new()?,
            token: token.filter(|t| !t.trim().is_empty()),
            api_base: GITHUB_API_BASE.to_string(),
            cache: DashMap::new(),
        })
    }

    /// Points license lookups at another API root (GitHub Enterprise)
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    async fn resolve(&self, repository: &Repository, license_url: &str) -> Result<Option<String>> {
        let key = repository.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let spdx_id = self.fetch_spdx_id(repository, license_url).await?;
        self.cache.insert(key, spdx_id.clone());
        Ok(spdx_id)
    }

    async fn fetch_spdx_id(
        &self,
        repository: &Repository,
        license_url: &str,
    ) -> Result<Option<String>> {
        let failed = |details: String| SbomError::GitHubLicenseResolutionFailed {
            url: license_url.to_string(),
            details,
        };

        let api_url = format!(
            "{}/repos/{}/{}/license",
            self.api_base, repository.owner, repository.name
        );
        let mut request = self
            .http
            .inner()
            .get(&api_url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| failed(e.to_string()))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(SbomError::InvalidGitHubApiCredentials.into());
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let exhausted = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|value| value.to_str().ok())
                .is_some_and(|remaining| remaining.trim() == "0");
            if exhausted {
                return Err(SbomError::GitHubApiRateLimitExceeded.into());
            }
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(failed(format!("GitHub API returned status code {}", status)).into());
        }

        let body: RepositoryLicense = response
            .json()
            .await
            .map_err(|e| failed(format!("Invalid response: {}", e)))?;

        Ok(body
            .license
            .and_then(|license| license.spdx_id)
            .filter(|id| !id.is_empty() && id != NO_ASSERTION))
    }
}

#[async_trait]
impl<R: MetadataRepository> MetadataRepository for GitHubLicenseResolver<R> {
    async fn fetch_metadata(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageMetadata>> {
        let Some(mut metadata) = self.inner.fetch_metadata(ecosystem, name, version).await? else {
            return Ok(None);
        };

        let github_url = match &metadata.license {
            Some(LicenseInfo::Url(url)) => {
                Repository::from_url(url).map(|repo| (repo, url.clone()))
            }
            _ => None,
        };

        if let Some((repository, url)) = github_url {
            if let Some(spdx_id) = self.resolve(&repository, &url).await? {
                metadata.license = Some(LicenseInfo::SpdxId(spdx_id));
            }
        }

        Ok(Some(metadata))
    }
}
