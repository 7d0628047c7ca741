use std::io;

use thiserror::Error;

use crate::inspect::error::InspectError;
use crate::version::error::{RegistryError, VersionError};

#[derive(Debug, Error)]
pub enum LagError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error("No source distribution for {package} {version}")]
    MissingSourceArtifact { package: String, version: String },

    #[error("Invalid upload time '{value}': {source}")]
    InvalidUploadTime {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
}
