//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (Dependency)
//! - requires_txt.rs: `*.egg-info/requires.txt` parser
//! - pyproject_toml.rs: `pyproject.toml` `[project].dependencies` parser
//! - requirement.rs: PEP 508 declaration grammar

pub mod pyproject_toml;
pub mod requirement;
pub mod requires_txt;
pub mod traits;
pub mod types;

pub use pyproject_toml::PyprojectTomlParser;
pub use requirement::parse_declaration;
pub use requires_txt::RequiresTxtParser;
pub use traits::{ParseError, Parser};
pub use types::Dependency;
