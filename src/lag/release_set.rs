//! Normalized, ordered release history of one package

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use indexmap::IndexMap;
use semver::Version;
use tracing::debug;

use crate::version::semver::normalize;
use crate::version::types::{Artifact, find_source};

/// Releases keyed by normalized version, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSet {
    releases: BTreeMap<Version, Vec<Artifact>>,
}

impl ReleaseSet {
    /// Build from the raw registry map.
    ///
    /// Raw strings that normalize to the same version collapse into one entry.
    /// A spelling that is not already canonical always takes the slot, so the
    /// last such spelling in `releases` wins. A canonical spelling only fills
    /// an empty slot.
    pub fn from_releases(releases: &IndexMap<String, Vec<Artifact>>) -> Self {
        let mut normalized = BTreeMap::new();

        for (raw, files) in releases {
            let version = normalize(raw);
            if *raw == version.to_string() {
                normalized.entry(version).or_insert_with(|| files.clone());
            } else if normalized.insert(version.clone(), files.clone()).is_some() {
                debug!("Release '{}' replaces an earlier entry for {}", raw, version);
            }
        }

        Self {
            releases: normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// All versions, ascending
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.releases.keys()
    }

    /// The sdist of `version`, if the release exists and has one
    pub fn source_artifact(&self, version: &Version) -> Option<&Artifact> {
        self.releases
            .get(version)
            .and_then(|files| find_source(files))
    }

    /// Number of releases newer than `selected`.
    ///
    /// This is the position, in descending order, of the first release not
    /// newer than `selected`.
    pub fn release_count(&self, selected: &Version) -> usize {
        self.releases.range((Excluded(selected), Unbounded)).count()
    }
}
