use crate::shared::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Thin wrapper around `reqwest::Client` shared by the registry adapters
///
/// Every request gets the crate user agent and a 10 second timeout.
/// Transport errors, 5xx and 429 responses are retried with a linear
/// backoff; a 404 is reported as `Ok(None)` without retrying.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// GETs and deserializes a JSON document, retrying transient failures
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let mut attempt = 1;
        loop {
            match self.try_get_json(url).await {
                Ok(found) => return Ok(found),
                Err(RequestFailure::Permanent(e)) => return Err(e),
                Err(RequestFailure::Transient(e)) if attempt >= self.max_retries => return Err(e),
                Err(RequestFailure::Transient(_)) => {
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> std::result::Result<Option<T>, RequestFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RequestFailure::Transient(e.into()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error = anyhow::anyhow!("{} returned status code {}", url, status);
            return Err(if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                RequestFailure::Transient(error)
            } else {
                RequestFailure::Permanent(error)
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| {
                RequestFailure::Permanent(anyhow::anyhow!("Invalid response from {}: {}", url, e))
            })
    }
}

enum RequestFailure {
    Transient(anyhow::Error),
    Permanent(anyhow::Error),
}

/// Validates a package name or version before it is placed in a URL path
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("{} is empty", component_type);
    }

    if component.contains('/') || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains('@') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}
