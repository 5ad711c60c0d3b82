//! Decides where the requested CodeQL bundle comes from.
//!
//! Resolution walks a strictly ordered chain: an explicit local archive
//! wins outright, then the tool cache is consulted under every key the
//! requested version may have been stored under, then deliberately pinned
//! cache entries are considered on enterprise hosts, and only when all of
//! that misses does the engine commit to a download.

use std::path::PathBuf;

use qlsetup_core::{version, SetupConfig};
use qlsetup_toolcache::Toolcache;
use tracing::{debug, info, warn};

use crate::defaults::TOOL_NAME;
use crate::error::Result;
use crate::locator::find_bundle_download_url;

/// How the raw `tools` input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsSpec {
    /// No input was given; the caller-supplied default version applies
    Unset,
    /// `latest`: force the default version, bypassing nothing else
    Latest,
    /// An explicit download URL
    Url(String),
    /// An explicit archive path on the runner
    LocalPath(String),
}

impl ToolsSpec {
    /// Interpret a raw `tools` input string.
    ///
    /// `latest` forces the default version; anything starting with `http`
    /// is a URL; any other non-empty string is a local path.
    #[must_use]
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            None => Self::Unset,
            Some("latest") => Self::Latest,
            Some(s) if s.starts_with("http") => Self::Url(s.to_string()),
            Some(s) => Self::LocalPath(s.to_string()),
        }
    }
}

/// The default bundle version a caller falls back to when no explicit
/// specification is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultToolsVersion {
    /// CLI semantic version, e.g. `2.22.1`
    pub cli_version: String,
    /// Release tag of the bundle shipping that CLI version
    pub tag_name: String,
}

/// Where the requested bundle comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsSource {
    /// An archive already on the runner; extract it and use it in place
    Local {
        /// Path to the bundle archive
        tar_path: PathBuf,
    },
    /// A complete entry already in the tool cache
    Toolcache {
        /// The cached bundle directory
        folder: PathBuf,
        /// Human-readable version label
        tools_version: String,
    },
    /// A release asset that must be downloaded
    Download {
        /// Bundle download URL
        url: String,
        /// Bundle version, when a release tag was recognizable in the URL
        /// or supplied by the defaults
        bundle_version: Option<String>,
        /// CLI semantic version, when known
        cli_version: Option<String>,
        /// Human-readable version label
        tools_version: String,
    },
}

impl ToolsSource {
    /// Human-readable version label for logging and reporting.
    #[must_use]
    pub fn tools_version(&self) -> &str {
        match self {
            Self::Local { .. } => "local",
            Self::Toolcache { tools_version, .. } | Self::Download { tools_version, .. } => {
                tools_version
            }
        }
    }
}

/// Decide where the requested bundle comes from.
///
/// The first step of the chain that produces a source wins; later steps
/// are not consulted. Cache misses and ambiguous cache states are logged
/// and fall through rather than failing.
///
/// # Errors
///
/// Fails on malformed version strings and on HTTP client construction;
/// lookup misses are never errors.
pub async fn resolve_tools_source(
    spec: &ToolsSpec,
    defaults: &DefaultToolsVersion,
    config: &SetupConfig,
    cache: &Toolcache,
) -> Result<ToolsSource> {
    let mut cli_version: Option<String> = None;
    let mut tag_name: Option<String> = None;
    let mut url: Option<String> = None;

    match spec {
        ToolsSpec::LocalPath(path) => {
            info!(%path, "using CodeQL bundle from a local archive");
            return Ok(ToolsSource::Local {
                tar_path: PathBuf::from(path),
            });
        }
        ToolsSpec::Latest => {
            info!(
                version = %defaults.cli_version,
                "'latest' requested, using the default CodeQL version"
            );
            cli_version = Some(defaults.cli_version.clone());
            tag_name = Some(defaults.tag_name.clone());
        }
        ToolsSpec::Unset => {
            cli_version = Some(defaults.cli_version.clone());
            tag_name = Some(defaults.tag_name.clone());
        }
        ToolsSpec::Url(input) => {
            tag_name = version::tag_name_from_url(input).map(str::to_string);
            url = Some(input.clone());
            if let Some(bundle_version) =
                tag_name.as_deref().and_then(version::bundle_version_from_tag)
            {
                // Semantically versioned bundles: the bundle version
                // doubles as the CLI version.
                if version::is_semver(bundle_version) {
                    cli_version = Some(version::to_semver(bundle_version)?);
                }
            }
        }
    }

    let bundle_version = tag_name
        .as_deref()
        .and_then(version::bundle_version_from_tag)
        .map(str::to_string);
    let human_version = match (&cli_version, &bundle_version) {
        (Some(cli), _) => cli.clone(),
        (None, Some(bundle)) => version::to_semver(bundle)?,
        (None, None) => tag_name
            .clone()
            .or_else(|| url.clone())
            .unwrap_or_else(|| "unknown".to_string()),
    };
    debug!(
        cli_version = ?cli_version,
        tag_name = ?tag_name,
        url = ?url,
        "resolved version identifiers"
    );

    let mut folder: Option<PathBuf> = None;

    if let Some(cli) = &cli_version {
        folder = cache.find(TOOL_NAME, cli);

        // Entries written by newer releases carry a `-<bundleVersion>`
        // suffix; accept one only when it is unambiguous.
        if folder.is_none() {
            let all_versions = cache.find_all_versions(TOOL_NAME);
            debug!(versions = ?all_versions, "versions present in the tool cache");
            let prefix = format!("{cli}-");
            let candidates: Vec<&String> = all_versions
                .iter()
                .filter(|v| v.starts_with(&prefix))
                .collect();
            match candidates.as_slice() {
                [single] => {
                    debug!(version = %single, "exactly one suffixed cache entry matches");
                    folder = cache.find(TOOL_NAME, single);
                }
                [] => {}
                _ => {
                    warn!(
                        %cli,
                        candidates = ?candidates,
                        "multiple cache entries match this CLI version, not picking one"
                    );
                }
            }
        }
    }

    // Entries written by older releases are keyed on the coerced bundle
    // version alone.
    if folder.is_none() {
        if let Some(tag) = &tag_name {
            if let Some(fallback) = fallback_toolcache_version(tag)? {
                debug!(%fallback, "retrying the tool cache under the legacy key");
                folder = cache.find(TOOL_NAME, &fallback);
            } else {
                debug!(%tag, "no legacy cache key derivable from this tag");
            }
        }
    }

    if let Some(folder) = folder {
        info!(version = %human_version, folder = %folder.display(), "found CodeQL in the tool cache");
        return Ok(ToolsSource::Toolcache {
            folder,
            tools_version: cli_version.unwrap_or(human_version),
        });
    }
    info!(version = %human_version, "did not find CodeQL in the tool cache");

    // Enterprise hosts may carry a deliberately pinned bundle to spare the
    // download; an explicit specification always overrides it.
    if !config.variant.is_dotcom() && *spec == ToolsSpec::Unset {
        if let Some(source) = find_pinned_entry(cache) {
            return Ok(source);
        }
    }

    let url = match url {
        Some(url) => url,
        None => {
            let tag = tag_name.as_deref().ok_or_else(|| {
                qlsetup_core::Error::internal(
                    "reached the download step with neither a URL nor a release tag",
                )
            })?;
            find_bundle_download_url(config, tag).await?
        }
    };

    Ok(ToolsSource::Download {
        url,
        bundle_version,
        tools_version: cli_version.clone().unwrap_or(human_version),
        cli_version,
    })
}

/// Cache key used by older releases: the coerced bundle version without
/// the CLI version prefix.
fn fallback_toolcache_version(tag_name: &str) -> Result<Option<String>> {
    match version::bundle_version_from_tag(tag_name) {
        Some(bundle_version) => Ok(Some(version::to_semver(bundle_version)?)),
        None => Ok(None),
    }
}

/// Select the single pinned cache entry, if there is exactly one.
fn find_pinned_entry(cache: &Toolcache) -> Option<ToolsSource> {
    let pinned: Vec<String> = cache
        .find_all_versions(TOOL_NAME)
        .into_iter()
        .filter(|v| version::is_good_version(v))
        .filter(|v| cache.is_pinned(TOOL_NAME, v))
        .collect();
    match pinned.as_slice() {
        [only] => {
            let folder = cache.find(TOOL_NAME, only)?;
            info!(version = %only, "using the pinned CodeQL version from the tool cache");
            Some(ToolsSource::Toolcache {
                folder,
                tools_version: only.clone(),
            })
        }
        [] => {
            info!("no pinned CodeQL version in the tool cache");
            None
        }
        _ => {
            warn!(versions = ?pinned, "multiple pinned CodeQL versions in the tool cache, not picking one");
            None
        }
    }
}
