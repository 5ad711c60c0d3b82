//! Client for the GitHub Releases API and the managed-variant bundle
//! endpoints.

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// A release fetched from the GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag the release was published under
    pub tag_name: String,
    /// Assets attached to the release
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One asset attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset filename
    pub name: String,
    /// Asset API URL; requesting it with `Accept: application/octet-stream`
    /// yields the asset bytes on any host variant
    pub url: String,
}

/// Asset listing served by the managed variant's internal bundle lookup.
///
/// Maps asset filenames to the identifiers its download endpoint accepts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnterpriseBundleAssets {
    /// Asset filename to asset identifier
    #[serde(default)]
    pub assets: HashMap<String, u64>,
}

#[derive(Debug, Deserialize)]
struct EnterpriseBundleDownload {
    url: Option<String>,
}

/// Client bound to one GitHub API endpoint, optionally authenticated.
#[derive(Debug, Clone)]
pub struct GitHubApiClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubApiClient {
    /// Create a client for the given API endpoint.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("qlsetup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// The API endpoint this client talks to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the release of `repository` (an `owner/repo` pair) published
    /// under `tag`.
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be sent, the release does not exist,
    /// or the response body does not deserialize.
    pub async fn release_by_tag(&self, repository: &str, tag: &str) -> Result<Release> {
        let url = format!("{}/repos/{repository}/releases/tags/{tag}", self.api_url);
        debug!(%url, "fetching GitHub release");
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::http(&url, e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::release_not_found(repository, tag));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(&url, format!("HTTP status {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| Error::malformed_response(&url, e.to_string()))
    }

    /// GET an API path relative to the endpoint and deserialize the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be sent, the response status is not a
    /// success, or the body does not deserialize.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        debug!(%url, "GitHub API request");
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::http(&url, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(&url, format!("HTTP status {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| Error::malformed_response(&url, e.to_string()))
    }

    /// List the bundle assets the managed variant serves for a release tag.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint is unreachable or responds with an error.
    pub async fn find_enterprise_bundle(&self, tag: &str) -> Result<EnterpriseBundleAssets> {
        self.get_json(&format!("enterprise/code-scanning/codeql-bundle/find/{tag}"))
            .await
    }

    /// Resolve the download URL of a managed-variant bundle asset.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint is unreachable or responds with an error.
    pub async fn enterprise_bundle_download_url(&self, asset_id: u64) -> Result<Option<String>> {
        let response: EnterpriseBundleDownload = self
            .get_json(&format!(
                "enterprise/code-scanning/codeql-bundle/download/{asset_id}"
            ))
            .await?;
        Ok(response.url)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }
}
