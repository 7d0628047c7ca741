//! Parser trait definition

/// Trait for parsing dependency metadata files
pub trait Parser {
    /// Name of the file this parser reads, relative to its directory
    fn file_name(&self) -> &'static str;

    /// Parse the content and extract raw dependency declarations
    fn parse(&self, content: &str) -> Result<Vec<String>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}
