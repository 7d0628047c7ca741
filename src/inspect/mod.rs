//! Artifact inspection layer
//!
//! Turns a downloaded source archive into the list of dependency declarations
//! of the package it contains.
//!
//! # Modules
//!
//! - [`archive`]: Archive format detection, safe extraction, package root lookup
//! - [`introspect`]: `setup.py` introspection in a child Python process
//! - [`error`]: Error types for inspection

pub mod archive;
pub mod error;
pub mod introspect;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::debug;

use crate::inspect::archive::{ArchiveFormat, extract, locate_package_root};
use crate::inspect::error::InspectError;
use crate::inspect::introspect::BuildIntrospector;
use crate::parser::{Parser, PyprojectTomlParser, RequiresTxtParser};

const EGG_INFO_SUFFIX: &str = ".egg-info";

/// Extracts source archives and discovers the dependencies they declare.
///
/// Discovery tries, in order:
/// 1. `requires.txt` of the single `*.egg-info` directory in the package root
/// 2. `[project].dependencies` of `pyproject.toml`
/// 3. the [`BuildIntrospector`] (running `setup.py`)
pub struct ArtifactInspector {
    introspector: Arc<dyn BuildIntrospector>,
    temp_root: Option<PathBuf>,
}

impl ArtifactInspector {
    pub fn new(introspector: Arc<dyn BuildIntrospector>) -> Self {
        Self {
            introspector,
            temp_root: None,
        }
    }

    /// Create extraction directories under `temp_root` instead of the system temp dir
    pub fn with_temp_root(mut self, temp_root: PathBuf) -> Self {
        self.temp_root = Some(temp_root);
        self
    }

    /// Extract an archive and return the dependency declarations of its package.
    ///
    /// The extraction directory is removed before this returns, whatever the outcome.
    pub async fn inspect(
        &self,
        bytes: &[u8],
        format: ArchiveFormat,
    ) -> Result<Vec<String>, InspectError> {
        let extract_dir = self.extract_to_scoped_dir(bytes, format)?;
        let package_root = locate_package_root(extract_dir.path())?;
        debug!("Package root: {}", package_root.display());

        self.get_dependencies(&package_root).await
    }

    /// Extract an archive into a fresh directory that is deleted when the handle drops
    pub fn extract_to_scoped_dir(
        &self,
        bytes: &[u8],
        format: ArchiveFormat,
    ) -> Result<TempDir, InspectError> {
        let extract_dir = self.scoped_dir()?;
        extract(bytes, format, extract_dir.path())?;
        Ok(extract_dir)
    }

    fn scoped_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("techlag-");
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    /// Dependency declarations of an extracted package
    pub async fn get_dependencies(&self, package_root: &Path) -> Result<Vec<String>, InspectError> {
        let requires = egg_info_requires(package_root)?;
        if !requires.is_empty() {
            debug!("Requires (egg-info): {:?}", requires);
            return Ok(requires);
        }

        let requires = read_declarations(&PyprojectTomlParser::new(), package_root)?;
        if !requires.is_empty() {
            debug!("Requires (pyproject.toml): {:?}", requires);
            return Ok(requires);
        }

        let requires = self.introspector.install_requires(package_root).await?;
        debug!("Requires (setup.py): {:?}", requires);
        Ok(requires)
    }
}

/// `requires.txt` of the package's egg-info, if there is exactly one egg-info directory
fn egg_info_requires(package_root: &Path) -> Result<Vec<String>, InspectError> {
    let mut egg_infos = Vec::new();
    for entry in fs::read_dir(package_root)? {
        let path = entry?.path();
        let is_egg_info = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(EGG_INFO_SUFFIX));
        if is_egg_info && path.is_dir() {
            egg_infos.push(path);
        }
    }

    let [egg_info] = egg_infos.as_slice() else {
        debug!(
            "Expected one egg-info directory in {}, found {}",
            package_root.display(),
            egg_infos.len()
        );
        return Ok(Vec::new());
    };

    debug!("Looking for dependencies in egg: {}", egg_info.display());
    read_declarations(&RequiresTxtParser::new(), egg_info)
}

/// Parse `dir/<parser file>`; a missing file yields no declarations
fn read_declarations(parser: &dyn Parser, dir: &Path) -> Result<Vec<String>, InspectError> {
    let path = dir.join(parser.file_name());
    match fs::read_to_string(&path) {
        Ok(content) => parser
            .parse(&content)
            .map_err(|source| InspectError::Parse { file: path, source }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}
