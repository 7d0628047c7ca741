//! PyPI registry client for fetching Python release metadata and source archives

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_PYPI_REGISTRY;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::{Artifact, PackageReleases};

/// PyPI registry client
#[derive(Clone)]
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PYPI_REGISTRY.to_string())
    }
}

impl PypiRegistry {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
    releases: IndexMap<String, Vec<Artifact>>,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    /// Latest version (according to PyPI)
    version: String,
}

fn check_status(response: Response, what: &str) -> Result<Response, RegistryError> {
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(what.to_string()));
    }

    if !response.status().is_success() {
        return Err(RegistryError::InvalidResponse(format!(
            "PyPI returned status {} for {}",
            response.status(),
            what
        )));
    }

    Ok(response)
}

#[async_trait]
impl Registry for PypiRegistry {
    async fn fetch_release_metadata(
        &self,
        package_name: &str,
    ) -> Result<PackageReleases, RegistryError> {
        let url = format!("{}/pypi/{}/json", self.base_url, package_name);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, package_name)?;

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        debug!(
            "Found {} releases for package {}, current {}",
            pypi_response.releases.len(),
            package_name,
            pypi_response.info.version
        );

        Ok(PackageReleases::new(
            pypi_response.info.version,
            pypi_response.releases,
        ))
    }

    async fn fetch_artifact(&self, artifact: &Artifact) -> Result<Vec<u8>, RegistryError> {
        debug!("Downloading artifact: {}", artifact.url);

        let response = self.client.get(&artifact.url).send().await?;
        let response = check_status(response, &artifact.url)?;
        let bytes = response.bytes().await?;

        debug!("Downloaded {} bytes from {}", bytes.len(), artifact.url);
        Ok(bytes.to_vec())
    }
}
