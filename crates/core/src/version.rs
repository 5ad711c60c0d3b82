//! Version normalization for CodeQL bundles
//!
//! Three identifier formats circulate around a bundle and are never
//! interchangeable without conversion:
//!
//! - *CLI version*: a semantic version such as `2.12.1`.
//! - *Tag name*: a release tag of the form `codeql-bundle-<bundleVersion>`.
//! - *Bundle version*: the tag suffix; sometimes a semantic version,
//!   sometimes a timestamp-like string such as `20230101`.
//!
//! A bundle version that is not itself a semantic version is coerced into
//! one by wrapping it as pre-release metadata of `0.0.0`. The coercion is
//! one-way: there is no defined conversion back.
//!
//! All functions here are side-effect-free and idempotent.

use semver::Version;

use crate::error::{Error, Result};

/// Prefix shared by every bundle release tag.
pub const BUNDLE_TAG_PREFIX: &str = "codeql-bundle-";

/// CLI versions known to be unusable. The pinned-entry validity filter
/// rejects these.
const BROKEN_VERSIONS: &[&str] = &["2.20.4"];

/// Extract the release tag name from a bundle download URL.
///
/// The tag is the path segment matching `codeql-bundle-*` between slashes;
/// the final segment is the asset filename (which shares the prefix) and is
/// never considered.
#[must_use]
pub fn tag_name_from_url(url: &str) -> Option<&str> {
    let segments: Vec<&str> = url.split('/').collect();
    let interior = segments.len().saturating_sub(1);
    segments[..interior]
        .iter()
        .find(|segment| segment.starts_with(BUNDLE_TAG_PREFIX))
        .copied()
}

/// Extract the bundle version from a release tag name.
///
/// Returns `None` for tags that do not carry the bundle prefix.
#[must_use]
pub fn bundle_version_from_tag(tag: &str) -> Option<&str> {
    tag.strip_prefix(BUNDLE_TAG_PREFIX)
}

/// Extract the bundle version from a bundle download URL, if the URL
/// contains a recognizable release tag.
#[must_use]
pub fn bundle_version_from_url(url: &str) -> Option<&str> {
    tag_name_from_url(url).and_then(bundle_version_from_tag)
}

/// Normalize a version string into canonical semantic-version form.
///
/// Strings that already parse as semantic versions (an optional leading `v`
/// is tolerated) are canonicalized; anything else is wrapped as a
/// pre-release of `0.0.0` and canonicalized. The wrapped form failing to
/// parse is a hard error: it means the caller supplied a string that cannot
/// serve as a version identifier at all.
pub fn to_semver(version: &str) -> Result<String> {
    if let Some(parsed) = parse_lenient(version) {
        return Ok(parsed.to_string());
    }
    let wrapped = format!("0.0.0-{version}");
    match parse_lenient(&wrapped) {
        Some(parsed) => {
            tracing::debug!(
                %version,
                "version is not in SemVer format, treating it as pre-release {wrapped}"
            );
            Ok(parsed.to_string())
        }
        None => Err(Error::version(version)),
    }
}

/// Parse a semantic version, tolerating surrounding whitespace and a
/// leading `v` or `V`.
fn parse_lenient(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Whether a string parses as a semantic version, tolerating a leading
/// `v` or `V`.
///
/// Bundle versions that pass this check double as CLI versions.
#[must_use]
pub fn is_semver(version: &str) -> bool {
    parse_lenient(version).is_some()
}

/// Whether a version string is a stable semantic version, exactly `x.y.z`
/// with no pre-release or build metadata.
#[must_use]
pub fn is_stable_semver(version: &str) -> bool {
    Version::parse(version).is_ok_and(|v| v.pre.is_empty() && v.build.is_empty())
}

/// Compute the toolcache key for a bundle.
///
/// When the CLI version is a stable release, the key is the composite
/// `<cliVersion>-<bundleVersion>`. Pre-release and nightly CLI versions
/// (which carry build metadata like `x.y.z+timestamp`) instead key on the
/// coerced bundle version, so that a nightly never overrides a stable
/// cached release sharing the same bundle.
pub fn toolcache_version(cli_version: Option<&str>, bundle_version: &str) -> Result<String> {
    if let Some(cli) = cli_version {
        if is_stable_semver(cli) {
            return Ok(format!("{cli}-{bundle_version}"));
        }
    }
    to_semver(bundle_version)
}

/// Whether a CLI version is usable, i.e. not on the broken-release list.
#[must_use]
pub fn is_good_version(version: &str) -> bool {
    !BROKEN_VERSIONS.contains(&version)
}

/// Extract the tool version encoded in a bundle download URL, in canonical
/// semantic-version form.
///
/// # Errors
///
/// Fails when the URL does not contain a recognizable bundle release tag.
pub fn version_from_url(url: &str) -> Result<String> {
    let bundle_version = bundle_version_from_url(url).ok_or_else(|| {
        Error::configuration(format!(
            "Malformed tools URL: {url}. Version could not be inferred"
        ))
    })?;
    to_semver(bundle_version)
}
