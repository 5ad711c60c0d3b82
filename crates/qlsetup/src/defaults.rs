//! Versions and locations baked into this release.

use crate::resolver::DefaultToolsVersion;

/// Name bundles are cached under in the tool cache.
pub const TOOL_NAME: &str = "CodeQL";

/// The repository whose releases carry the canonical public bundles.
pub const CANONICAL_REPOSITORY: &str = "github/codeql-action";

/// CLI version of the bundle this release ships as its default.
pub const DEFAULT_CLI_VERSION: &str = "2.22.1";

/// Release tag of the default bundle.
pub const DEFAULT_BUNDLE_TAG: &str = "codeql-bundle-v2.22.1";

/// The default bundle version shipped with this release.
#[must_use]
pub fn shipped_defaults() -> DefaultToolsVersion {
    DefaultToolsVersion {
        cli_version: DEFAULT_CLI_VERSION.to_string(),
        tag_name: DEFAULT_BUNDLE_TAG.to_string(),
    }
}
