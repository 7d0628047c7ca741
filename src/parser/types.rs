//! Common types for parsers

use crate::version::constraint::Constraint;

/// A parsed dependency declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Normalized package name (e.g., "requests", "zope-interface")
    pub name: String,
    /// Versions the declaring package accepts
    pub constraint: Constraint,
}

impl Dependency {
    pub fn new(name: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}
