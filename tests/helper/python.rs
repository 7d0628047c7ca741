//! Stand-in interpreter for `setup.py` introspection

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable that answers every introspection with `requires`
pub fn fake_python(dir: &Path, requires: &[&str]) -> PathBuf {
    let payload = serde_json::to_string(requires).unwrap();
    let script = format!(
        "#!/bin/sh\necho 'running setup.py'\necho '__TECHLAG_INSTALL_REQUIRES__{payload}'\n"
    );

    let path = dir.join("fake-python");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
