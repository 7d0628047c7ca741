//! Release metadata shared by the registry client and the lag calculator

use indexmap::IndexMap;
use serde::Deserialize;

use crate::config::SOURCE_PACKAGE_TYPE;

/// One distributable file of a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// Download URL
    pub url: String,
    /// Distribution kind (e.g. "sdist", "bdist_wheel")
    #[serde(rename = "packagetype")]
    pub package_type: String,
    /// Upload timestamp, `YYYY-MM-DDTHH:MM:SS`
    pub upload_time: String,
}

impl Artifact {
    pub fn is_source(&self) -> bool {
        self.package_type == SOURCE_PACKAGE_TYPE
    }
}

/// Raw release metadata of a package as published by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReleases {
    /// Version currently tagged as latest by the registry
    pub current_version: String,
    /// Files per raw version string, in registry document order
    pub releases: IndexMap<String, Vec<Artifact>>,
}

impl PackageReleases {
    pub fn new(current_version: impl Into<String>, releases: IndexMap<String, Vec<Artifact>>) -> Self {
        Self {
            current_version: current_version.into(),
            releases,
        }
    }
}

/// Find the source distribution among a release's files
pub fn find_source(files: &[Artifact]) -> Option<&Artifact> {
    files.iter().find(|file| file.is_source())
}
