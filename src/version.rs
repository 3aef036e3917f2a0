//! Tag name <-> semantic version conversion.

use semver::Version;

/// Prefix added to release tags unless `strip_v_tag_prefix` is set.
pub const TAG_PREFIX: &str = "v";

/// Parse a tag name as a semantic version.
///
/// Handles "v1.2.3" and "1.2.3". Numeric core parts are read as plain
/// integers, so "v01.02.03" is 1.2.3 and short cores such as "v1.2" are padded
/// to 1.2.0. Pre-release and build metadata are kept.
pub fn parse_tag_version(tag_name: &str) -> Option<Version> {
    let raw = tag_name.strip_prefix('v').unwrap_or(tag_name);

    // Split off "-pre" / "+build" so only the numeric core gets normalized.
    let core_end = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, rest) = raw.split_at(core_end);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    let [major, minor, patch] = numbers;
    Version::parse(&format!("{major}.{minor}.{patch}{rest}")).ok()
}

/// Canonical string form of a tag's version, if it has one.
pub fn canonical_version(tag_name: &str) -> Option<String> {
    parse_tag_version(tag_name).map(|v| v.to_string())
}

/// Build the tag name for a new release.
pub fn tag_name(version: &str, strip_v_tag_prefix: bool) -> String {
    if strip_v_tag_prefix {
        version.to_string()
    } else {
        format!("{TAG_PREFIX}{version}")
    }
}
