use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Invalid constraint '{input}': {reason}")]
    InvalidConstraint { input: String, reason: String },

    #[error("No release satisfies '{constraint}'")]
    NoMatchingVersion { constraint: String },
}

impl VersionError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        VersionError::InvalidConstraint {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
