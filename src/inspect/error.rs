use std::path::PathBuf;

use thiserror::Error;

use crate::parser::traits::ParseError;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Unsupported artifact format: {0}")]
    UnsupportedFormat(String),

    #[error("Archive entry escapes the extraction directory: {}", .0.display())]
    PathTraversal(PathBuf),

    #[error("No package directory found in {}", .0.display())]
    PackageLayout(PathBuf),

    #[error("Failed to extract dependency metadata: {0}")]
    MetadataExtraction(String),

    #[error("Failed to parse {}: {source}", file.display())]
    Parse { file: PathBuf, source: ParseError },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
