//! PEP 508 requirement lines to (name, constraint) pairs

use std::str::FromStr;
use std::sync::LazyLock;

use pep508_rs::{Requirement, VerbatimUrl, VersionOrUrl};
use regex::Regex;
use tracing::{debug, warn};

use crate::parser::types::Dependency;
use crate::version::constraint::Constraint;
use crate::version::error::VersionError;

/// Leading project name and optional extras of a requirement line
static NAME_AND_EXTRAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?\s*(?:\[[^\]]*\])?").unwrap()
});

/// The version specifier exactly as written, without name, extras or markers.
///
/// pep508_rs rewrites versions into PEP 440 canonical form (`1.0.0-rc.1` becomes
/// `1.0rc1`), while registry keys are coerced from their raw spelling. Coercing
/// the written text keeps both sides on the same mapping.
fn written_specifier(declaration: &str) -> &str {
    let requirement = declaration.split(';').next().unwrap_or_default();
    let rest = match NAME_AND_EXTRAS.find(requirement) {
        Some(m) => &requirement[m.end()..],
        None => requirement,
    };
    let rest = rest.trim();

    rest.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(rest)
        .trim()
}

/// Parse a dependency declaration such as `requests[socks]>=2.0,<3.0; python_version>'3'`.
///
/// Returns `Ok(None)` for URL requirements (`pkg @ https://...`), which cannot be
/// looked up on the index. Environment markers are parsed but not evaluated.
pub fn parse_declaration(declaration: &str) -> Result<Option<Dependency>, VersionError> {
    let req = Requirement::<VerbatimUrl>::from_str(declaration.trim())
        .map_err(|e| VersionError::invalid(declaration, e.to_string()))?;

    let constraint = match &req.version_or_url {
        Some(VersionOrUrl::Url(url)) => {
            warn!("Skipping URL dependency '{}' ({})", req.name, url);
            return Ok(None);
        }
        Some(VersionOrUrl::VersionSpecifier(_)) => {
            Constraint::parse(written_specifier(declaration)).map_err(|e| match e {
                VersionError::InvalidConstraint { reason, .. } => {
                    VersionError::invalid(declaration, reason)
                }
                other => other,
            })?
        }
        None => Constraint::any(),
    };

    debug!("Parsed '{}' as {} {}", declaration, req.name, constraint);
    Ok(Some(Dependency::new(req.name.to_string(), constraint)))
}
