//! Bundle download, extraction, and caching.

use std::path::{Path, PathBuf};
use std::time::Instant;

use qlsetup_core::{version, SetupConfig};
use qlsetup_github::GitHubApiClient;
use qlsetup_toolcache::{
    download_to_dir, extract_tar, log_disk_usage, CompressionMethod, Toolcache,
};
use tracing::{debug, info, warn};

use crate::defaults::{CANONICAL_REPOSITORY, TOOL_NAME};
use crate::error::Result;

/// Outcome of downloading and installing a bundle.
#[derive(Debug)]
pub struct DownloadedTools {
    /// Directory holding the usable bundle
    pub tool_folder: PathBuf,
    /// Human-readable version label
    pub tools_version: String,
    /// Wall-clock duration of the download in milliseconds
    pub download_duration_ms: u64,
}

/// Download a bundle, extract it, and persist it into the tool cache.
///
/// Disk-space snapshots around each stage are advisory logging only and
/// never fail the pipeline. When the bundle version cannot be determined,
/// the extracted tree is returned in place and the tool cache is left
/// untouched.
///
/// # Errors
///
/// Fails when the download, the extraction, or the cache write fails.
pub async fn download_and_install(
    url: &str,
    bundle_version: Option<&str>,
    cli_version: Option<&str>,
    config: &SetupConfig,
    cache: &Toolcache,
    temp_dir: &Path,
) -> Result<DownloadedTools> {
    let client = http_client()?;
    let authorization = download_authorization(url, config);

    info!(%url, "downloading CodeQL bundle");
    log_disk_usage("before downloading the bundle", temp_dir);
    let download_start = Instant::now();
    let archive = download_to_dir(&client, url, temp_dir, authorization.as_deref()).await?;
    let download_duration_ms =
        u64::try_from(download_start.elapsed().as_millis()).unwrap_or(u64::MAX);
    log_disk_usage("after downloading the bundle", temp_dir);
    debug!(archive = %archive.display(), download_duration_ms, "bundle downloaded");

    let method = CompressionMethod::from_url(url);
    let extracted_dir = archive.with_extension("extracted");
    log_disk_usage("before extracting the bundle", temp_dir);
    let extracted = extract_tar(&archive, method, &extracted_dir)?;
    log_disk_usage("after extracting the bundle", temp_dir);

    cleanup_best_effort(&archive, "bundle archive");

    let bundle_version = bundle_version
        .map(str::to_string)
        .or_else(|| version::bundle_version_from_url(url).map(str::to_string));
    let Some(bundle_version) = bundle_version else {
        debug!(%url, "bundle version cannot be determined, skipping the tool cache");
        return Ok(DownloadedTools {
            tool_folder: extracted,
            tools_version: cli_version.map_or_else(|| "unknown".to_string(), str::to_string),
            download_duration_ms,
        });
    };

    let cli_version = match cli_version {
        Some(v) => Some(v.to_string()),
        // Only the public host is guaranteed to carry the canonical
        // release this recovery reads from.
        None if config.variant.is_dotcom() => {
            try_find_cli_version(
                &format!("{}{bundle_version}", version::BUNDLE_TAG_PREFIX),
                config,
            )
            .await
        }
        None => None,
    };

    let toolcache_version = version::toolcache_version(cli_version.as_deref(), &bundle_version)?;
    debug!(version = %toolcache_version, "caching the CodeQL bundle");
    log_disk_usage("before caching the bundle", temp_dir);
    let tool_folder = cache.cache_directory(&extracted, TOOL_NAME, &toolcache_version)?;
    log_disk_usage("after caching the bundle", temp_dir);

    cleanup_best_effort(&extracted, "extracted bundle copy");

    Ok(DownloadedTools {
        tool_folder,
        tools_version: cli_version.unwrap_or(toolcache_version),
        download_duration_ms,
    })
}

/// Decide the `Authorization` header for a bundle download.
///
/// The job's token is attached only when the URL belongs to the job's own
/// host and does not already embed a `token` query parameter; anything
/// else would send credentials to a foreign host.
fn download_authorization(url: &str, config: &SetupConfig) -> Option<String> {
    if url_embeds_token(url) {
        debug!("bundle URL already carries an authorization token");
        return None;
    }
    if let Some(token) = &config.api.token {
        if url.starts_with(&format!("{}/", config.api.url)) {
            debug!("attaching the job's token to the bundle download");
            return Some(format!("Bearer {token}"));
        }
    }
    debug!("downloading the bundle without an authorization token");
    None
}

/// Whether a URL carries a `token` query parameter.
fn url_embeds_token(url: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .any(|pair| pair.split('=').next().unwrap_or(pair) == "token")
}

/// Recover the CLI version from the canonical release's
/// `cli-version-<x.y.z>.txt` marker asset, accepting it only when exactly
/// one such asset exists.
async fn try_find_cli_version(tag_name: &str, config: &SetupConfig) -> Option<String> {
    debug!(%tag_name, "looking up the canonical release to recover the CLI version");
    let client = match GitHubApiClient::new(&config.api.api_url, config.api.token.clone()) {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "could not construct a client for CLI version recovery");
            return None;
        }
    };
    let release = match client.release_by_tag(CANONICAL_REPOSITORY, tag_name).await {
        Ok(release) => release,
        Err(e) => {
            debug!(%tag_name, error = %e, "could not fetch the release for CLI version recovery");
            return None;
        }
    };
    let versions: Vec<&str> = release
        .assets
        .iter()
        .filter_map(|asset| {
            asset
                .name
                .strip_prefix("cli-version-")?
                .strip_suffix(".txt")
        })
        .collect();
    match versions.as_slice() {
        [only] => {
            debug!(cli_version = %only, "recovered the CLI version from the release");
            Some((*only).to_string())
        }
        [] => {
            debug!(%tag_name, "release carries no CLI version marker asset");
            None
        }
        _ => {
            warn!(%tag_name, versions = ?versions, "release carries multiple CLI version marker assets, ignoring them");
            None
        }
    }
}

/// Remove an intermediate artifact, downgrading failure to a warning.
fn cleanup_best_effort(path: &Path, what: &str) {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => debug!(path = %path.display(), "removed {what}"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove {what}"),
    }
}

fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("qlsetup/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            qlsetup_core::Error::configuration(format!("failed to construct HTTP client: {e}"))
        })?;
    Ok(client)
}
