//! Build-script introspection for packages without static dependency metadata
//!
//! `setup.py` is executed by a separate Python process, stopped right after the
//! `setup()` call has been recorded. The process reports `install_requires` as a
//! JSON array on a marker line of its stdout.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::debug;

use crate::config::DEFAULT_PYTHON;
use crate::inspect::error::InspectError;

const SETUP_SCRIPT: &str = "setup.py";

const REQUIRES_MARKER: &str = "__TECHLAG_INSTALL_REQUIRES__";

const INTROSPECT_SCRIPT: &str = r#"
import json
import os
import sys

sys.path.insert(0, os.getcwd())
sys.argv = ["setup.py"]
try:
    import setuptools  # installs the distutils shim on Python >= 3.12
except ImportError:
    pass
from distutils.core import run_setup

dist = run_setup("setup.py", stop_after="init")
requires = getattr(dist, "install_requires", None) or []
if isinstance(requires, str):
    requires = requires.splitlines()
sys.stdout.write("\n__TECHLAG_INSTALL_REQUIRES__" + json.dumps([str(r) for r in requires]) + "\n")
"#;

/// Trait for reading declared install requirements out of a package's build script
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BuildIntrospector: Send + Sync {
    /// Returns the `install_requires` of the package extracted at `package_root`
    async fn install_requires(&self, package_root: &Path) -> Result<Vec<String>, InspectError>;
}

/// Runs `setup.py` under a Python interpreter in a child process
#[derive(Debug, Clone)]
pub struct SetupPyIntrospector {
    python: String,
}

impl Default for SetupPyIntrospector {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON.to_string())
    }
}

impl SetupPyIntrospector {
    pub fn new(python: String) -> Self {
        Self { python }
    }
}

#[async_trait]
impl BuildIntrospector for SetupPyIntrospector {
    async fn install_requires(&self, package_root: &Path) -> Result<Vec<String>, InspectError> {
        if !package_root.join(SETUP_SCRIPT).is_file() {
            return Err(InspectError::MetadataExtraction(format!(
                "no {} in {}",
                SETUP_SCRIPT,
                package_root.display()
            )));
        }

        debug!(
            "Dependencies not found in metadata, running {} in {}",
            SETUP_SCRIPT,
            package_root.display()
        );

        let output = Command::new(&self.python)
            .arg("-c")
            .arg(INTROSPECT_SCRIPT)
            .current_dir(package_root)
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                InspectError::MetadataExtraction(format!("failed to run {}: {}", self.python, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().last().unwrap_or("no output");
            return Err(InspectError::MetadataExtraction(format!(
                "{} exited with {}: {}",
                SETUP_SCRIPT, output.status, reason
            )));
        }

        parse_introspection_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the JSON payload of the last marker line
fn parse_introspection_output(stdout: &str) -> Result<Vec<String>, InspectError> {
    let payload = stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(REQUIRES_MARKER))
        .ok_or_else(|| {
            InspectError::MetadataExtraction(format!("{SETUP_SCRIPT} did not report install_requires"))
        })?;

    serde_json::from_str(payload).map_err(|e| {
        InspectError::MetadataExtraction(format!("unreadable install_requires: {e}"))
    })
}
