//! Registry trait for fetching release metadata and artifacts

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::{Artifact, PackageReleases};

/// Trait for talking to a package index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every known release of a package and its currently tagged version
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "requests")
    ///
    /// # Returns
    /// * `Ok(PackageReleases)` - Raw release map in registry order plus the current version
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_release_metadata(
        &self,
        package_name: &str,
    ) -> Result<PackageReleases, RegistryError>;

    /// Downloads the raw bytes of a distributed file
    async fn fetch_artifact(&self, artifact: &Artifact) -> Result<Vec<u8>, RegistryError>;
}
