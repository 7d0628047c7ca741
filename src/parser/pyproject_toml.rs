//! pyproject.toml parser for statically declared dependencies (PEP 621)
//!
//! Only `[project].dependencies` is read: those are the requirements installed
//! with the package. `[build-system].requires` and optional dependencies are
//! not runtime requirements and are ignored.

use tracing::warn;

use crate::parser::traits::{ParseError, Parser};

/// Parser for pyproject.toml files
#[derive(Debug, Default)]
pub struct PyprojectTomlParser;

impl PyprojectTomlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PyprojectTomlParser {
    fn file_name(&self) -> &'static str {
        "pyproject.toml"
    }

    fn parse(&self, content: &str) -> Result<Vec<String>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_toml_ng::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set TOML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse TOML content");
            ParseError::ParseFailed("Failed to parse TOML".to_string())
        })?;

        let root = tree.root_node();
        let mut results = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "table" && table_name(child, content).as_deref() == Some("project") {
                extract_dependencies(child, content, &mut results);
            }
        }

        Ok(results)
    }
}

/// Name of a `[table]` node, or None for array tables and malformed headers
fn table_name(table_node: tree_sitter::Node, content: &str) -> Option<String> {
    let header = table_node.child(0)?;
    if header.kind() != "[" {
        return None;
    }

    let mut cursor = table_node.walk();
    let name = table_node
        .children(&mut cursor)
        .find(|child| child.kind() == "bare_key" || child.kind() == "dotted_key")
        .map(|child| content[child.byte_range()].to_string());
    name
}

/// Collect the strings of the `dependencies = [...]` pair in a table
fn extract_dependencies(table_node: tree_sitter::Node, content: &str, results: &mut Vec<String>) {
    let mut cursor = table_node.walk();

    for child in table_node.children(&mut cursor) {
        if child.kind() != "pair" {
            continue;
        }

        let mut pair_cursor = child.walk();
        let mut is_dependencies = false;

        for pair_child in child.children(&mut pair_cursor) {
            match pair_child.kind() {
                "bare_key" => {
                    is_dependencies = &content[pair_child.byte_range()] == "dependencies";
                }
                "array" if is_dependencies => {
                    extract_strings(pair_child, content, results);
                }
                _ => {}
            }
        }
    }
}

fn extract_strings(array_node: tree_sitter::Node, content: &str, results: &mut Vec<String>) {
    let mut cursor = array_node.walk();

    for child in array_node.children(&mut cursor) {
        if child.kind() != "string" {
            continue;
        }

        // Remove only the outer quotes from TOML string
        // TOML strings are either "..." or '...' (literal string)
        let trimmed = content[child.byte_range()].trim();
        let dep_str = if (trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\''))
        {
            &trimmed[1..trimmed.len() - 1]
        } else {
            trimmed
        };

        let dep_str = dep_str.trim();
        if !dep_str.is_empty() {
            results.push(dep_str.to_string());
        }
    }
}
