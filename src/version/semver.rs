use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

/// Leading `major[.minor[.patch]]` of a release string.
static BASE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.(\d+)(?:\.(\d+))?)?").unwrap());

/// Characters that survive in pre-release and build metadata. Everything else becomes `-`.
static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9+.-]").unwrap());

/// Coerce an arbitrary release string into a semver::Version.
///
/// Never fails. Missing components are padded with zeros and anything after the
/// numeric prefix is mapped onto pre-release or build metadata.
///
/// Examples:
/// - "1" -> 1.0.0
/// - "1.2" -> 1.2.0
/// - "2.0b1" -> 2.0.0-b1
/// - "1.0.post1" -> 1.0.0+post1
/// - "1.2.3.4" -> 1.2.3+4
/// - "dev" -> 0.0.0-dev
pub fn normalize(raw: &str) -> Version {
    match coerce(raw) {
        Some((version, _)) => version,
        None => {
            let rest = strip_prefix_v(raw.trim());
            let cleaned = INVALID_CHARS.replace_all(rest, "-").replace('+', ".");
            Version {
                major: 0,
                minor: 0,
                patch: 0,
                pre: prerelease(&cleaned),
                build: BuildMetadata::EMPTY,
            }
        }
    }
}

/// Coerce a release string that starts with a numeric component.
///
/// Returns the version together with the number of release components that were
/// written explicitly (1 to 3), or `None` when there is no numeric prefix.
pub fn coerce(raw: &str) -> Option<(Version, usize)> {
    let raw = strip_prefix_v(raw.trim());
    let caps = BASE_VERSION.captures(raw)?;

    let component = |i: usize| {
        caps.get(i)
            .map_or(0, |m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
    };
    let precision = (1..=3).filter(|&i| caps.get(i).is_some()).count();

    let rest = INVALID_CHARS.replace_all(&raw[caps[0].len()..], "-");
    let (pre, build) = split_rest(&rest);

    let version = Version {
        major: component(1),
        minor: component(2),
        patch: component(3),
        pre: prerelease(pre),
        build: build_metadata(&build.replace('+', ".")),
    };
    Some((version, precision))
}

fn strip_prefix_v(raw: &str) -> &str {
    match raw.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => raw,
    }
}

/// Split the non-numeric tail into (pre-release, build).
fn split_rest(rest: &str) -> (&str, &str) {
    if let Some(build) = rest.strip_prefix('+').or_else(|| rest.strip_prefix('.')) {
        return ("", build);
    }
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    rest.split_once('+').unwrap_or((rest, ""))
}

fn identifiers(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('.').filter(|s| !s.is_empty())
}

fn prerelease(raw: &str) -> Prerelease {
    let cleaned: Vec<&str> = identifiers(raw)
        .map(|id| {
            if id.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = id.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }
            } else {
                id
            }
        })
        .collect();
    Prerelease::new(&cleaned.join(".")).unwrap_or(Prerelease::EMPTY)
}

fn build_metadata(raw: &str) -> BuildMetadata {
    let cleaned: Vec<&str> = identifiers(raw).collect();
    BuildMetadata::new(&cleaned.join(".")).unwrap_or(BuildMetadata::EMPTY)
}
