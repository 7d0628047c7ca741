//! Technical lag computation
//!
//! # Modules
//!
//! - [`release_set`]: Normalized release history of a package
//! - [`calculator`]: Lag of one package against its latest release
//! - [`walker`]: Recursive traversal over declared dependencies
//! - [`report`]: Text rendering of lag results
//! - [`error`]: Error types for lag computation

pub mod calculator;
pub mod error;
pub mod release_set;
pub mod report;
pub mod walker;

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use crate::config::LagConfig;
use crate::inspect::ArtifactInspector;
use crate::inspect::introspect::SetupPyIntrospector;
use crate::lag::calculator::{LagCalculator, LagResult};
use crate::lag::error::LagError;
use crate::lag::walker::DependencyWalker;
use crate::version::constraint::Constraint;
use crate::version::registries::PypiRegistry;
use crate::version::semver::normalize;

/// Build a walker talking to the configured registry and interpreter
pub fn build_walker(config: &LagConfig) -> DependencyWalker {
    let registry = Arc::new(PypiRegistry::new(config.registry_url.clone()));
    let introspector = Arc::new(SetupPyIntrospector::new(config.python.clone()));

    let mut inspector = ArtifactInspector::new(introspector);
    if let Some(temp_dir) = &config.temp_dir {
        inspector = inspector.with_temp_root(temp_dir.clone());
    }

    DependencyWalker::new(LagCalculator::new(registry, inspector))
        .with_cycle_detection(config.detect_cycles)
}

/// Report the lag of `package` at `version` and of its whole dependency tree to `out`
pub async fn run<W: Write>(
    config: &LagConfig,
    package: &str,
    version: &str,
    out: &mut W,
) -> Result<LagResult, LagError> {
    let constraint = Constraint::exact(normalize(version));
    info!("Computing lag for {} {}", package, constraint);

    build_walker(config).walk(package, &constraint, out).await
}
