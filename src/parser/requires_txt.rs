//! `requires.txt` parser for `*.egg-info` directories
//!
//! setuptools writes unconditional requirements first, followed by
//! `[extra]` / `[:marker]` sections. Only the unconditional block is read.

use crate::parser::traits::{ParseError, Parser};

/// Parser for `requires.txt` files
#[derive(Debug, Default)]
pub struct RequiresTxtParser;

impl RequiresTxtParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for RequiresTxtParser {
    fn file_name(&self) -> &'static str {
        "requires.txt"
    }

    fn parse(&self, content: &str) -> Result<Vec<String>, ParseError> {
        Ok(content
            .lines()
            .map(str::trim)
            .take_while(|line| !line.starts_with('['))
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}
