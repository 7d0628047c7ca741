//! Per-package lag computation

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use semver::Version;
use tracing::debug;

use crate::config::UPLOAD_TIME_FORMAT;
use crate::inspect::ArtifactInspector;
use crate::inspect::archive::ArchiveFormat;
use crate::lag::error::LagError;
use crate::lag::release_set::ReleaseSet;
use crate::version::constraint::Constraint;
use crate::version::registry::Registry;
use crate::version::semver::normalize;
use crate::version::types::Artifact;

/// Lag of one package relative to its latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagResult {
    /// Package name as requested
    pub package: String,
    /// Release selected for the requested constraint
    pub version: Version,
    /// Number of releases newer than `version`
    pub release_count: usize,
    /// Upload time of the current release minus that of `version` (may be negative)
    pub time_lag: TimeDelta,
    /// Dependency declarations of `version`, verbatim
    pub dependencies: Vec<String>,
}

/// Computes [`LagResult`]s from registry metadata and source artifacts
pub struct LagCalculator {
    registry: Arc<dyn Registry>,
    inspector: ArtifactInspector,
}

impl LagCalculator {
    pub fn new(registry: Arc<dyn Registry>, inspector: ArtifactInspector) -> Self {
        Self {
            registry,
            inspector,
        }
    }

    /// Compute the lag of the newest release of `package` satisfying `constraint`
    pub async fn compute_lag(
        &self,
        package: &str,
        constraint: &Constraint,
    ) -> Result<LagResult, LagError> {
        let metadata = self.registry.fetch_release_metadata(package).await?;
        debug!("Current version: {}", metadata.current_version);

        let releases = ReleaseSet::from_releases(&metadata.releases);
        let current_file = source_of(
            &releases,
            package,
            &normalize(&metadata.current_version),
        )?;

        let version = constraint.select(releases.versions())?;
        debug!("Version to check: {}", version);

        let release_count = releases.release_count(&version);
        let selected_file = source_of(&releases, package, &version)?;

        let time_lag = upload_time(current_file)? - upload_time(selected_file)?;

        let format = ArchiveFormat::from_url(&selected_file.url)?;
        let bytes = self.registry.fetch_artifact(selected_file).await?;
        let dependencies = self.inspector.inspect(&bytes, format).await?;

        Ok(LagResult {
            package: package.to_string(),
            version,
            release_count,
            time_lag,
            dependencies,
        })
    }
}

fn source_of<'a>(
    releases: &'a ReleaseSet,
    package: &str,
    version: &Version,
) -> Result<&'a Artifact, LagError> {
    releases
        .source_artifact(version)
        .ok_or_else(|| LagError::MissingSourceArtifact {
            package: package.to_string(),
            version: version.to_string(),
        })
}

fn upload_time(artifact: &Artifact) -> Result<NaiveDateTime, LagError> {
    NaiveDateTime::parse_from_str(&artifact.upload_time, UPLOAD_TIME_FORMAT).map_err(|source| {
        LagError::InvalidUploadTime {
            value: artifact.upload_time.clone(),
            source,
        }
    })
}
