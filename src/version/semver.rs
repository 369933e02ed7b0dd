use std::cmp::Ordering;

use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    Latest,
    Outdated,
    Newer,
    Invalid,
}

/// Strip a single leading `v` marker ("v1.2.0" -> "1.2.0")
pub fn normalize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// Does NOT strip 'v' prefix (use `normalize_version` first if needed).
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Semver precedence: build metadata does not take part in ordering
fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Compare the current version against the latest known version
///
/// Identical strings (after stripping the `v` marker) are `Latest` without parsing,
/// so non-semver tags like "main" compare consistently with themselves.
pub fn compare_versions(current: &str, latest: &str) -> CompareResult {
    let current = normalize_version(current);
    let latest = normalize_version(latest);

    if current == latest {
        return CompareResult::Latest;
    }

    let (Some(current), Some(latest)) = (parse_version(current), parse_version(latest)) else {
        return CompareResult::Invalid;
    };

    match cmp_precedence(&current, &latest) {
        Ordering::Less => CompareResult::Outdated,
        Ordering::Equal => CompareResult::Latest,
        Ordering::Greater => CompareResult::Newer,
    }
}

/// Returns true if `latest` is strictly newer than `current`
///
/// Unparseable versions never report an update.
pub fn has_newer(current: &str, latest: &str) -> bool {
    compare_versions(current, latest) == CompareResult::Outdated
}
