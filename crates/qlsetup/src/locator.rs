//! Release asset location across candidate sources.

use qlsetup_core::{GitHubVariant, Os, SetupConfig, PUBLIC_SERVER_URL};
use qlsetup_github::GitHubApiClient;
use tracing::{debug, info};

use crate::defaults::CANONICAL_REPOSITORY;
use crate::error::Result;
use crate::sources::candidate_sources;

/// Find a download URL for the bundle release tagged `tag`, matching the
/// current operating system.
///
/// On the managed deployment variant its internal bundle lookup is tried
/// once first. Candidate sources are then queried in priority order, each
/// failure logged and swallowed. The canonical repository on the public
/// host is never queried: the moment the loop reaches that pair it stops
/// and synthesizes the well-known public download URL, which is expected
/// to resolve for every published bundle.
///
/// # Errors
///
/// Fails only when an HTTP client cannot be constructed; lookup misses
/// fall through to the synthesized URL instead.
pub async fn find_bundle_download_url(config: &SetupConfig, tag: &str) -> Result<String> {
    let bundle_name = Os::current().bundle_asset_name();

    if config.variant == GitHubVariant::GheDotcom {
        if let Some(url) = try_enterprise_bundle_endpoint(config, tag, bundle_name).await {
            return Ok(url);
        }
    }

    for candidate in candidate_sources(config) {
        // The canonical public release is known to exist; no point in
        // spending an API request on it.
        if candidate.is_public_canonical() {
            break;
        }
        let client = GitHubApiClient::new(&candidate.api_url, config.api.token.clone())?;
        match client.release_by_tag(&candidate.repository, tag).await {
            Ok(release) => {
                if let Some(asset) = release.assets.iter().find(|a| a.name == bundle_name) {
                    info!(
                        repository = %candidate.repository,
                        endpoint = %candidate.api_url,
                        url = %asset.url,
                        "found bundle release asset"
                    );
                    return Ok(asset.url.clone());
                }
                debug!(
                    repository = %candidate.repository,
                    endpoint = %candidate.api_url,
                    %bundle_name,
                    "release exists but carries no asset for this platform"
                );
            }
            Err(e) => {
                info!(
                    repository = %candidate.repository,
                    endpoint = %candidate.api_url,
                    error = %e,
                    "bundle lookup failed, trying the next source"
                );
            }
        }
    }

    Ok(format!(
        "{PUBLIC_SERVER_URL}/{CANONICAL_REPOSITORY}/releases/download/{tag}/{bundle_name}"
    ))
}

/// Ask the managed variant's internal endpoint for the bundle, returning
/// `None` on any miss or failure so the caller falls back to the release
/// search.
async fn try_enterprise_bundle_endpoint(
    config: &SetupConfig,
    tag: &str,
    bundle_name: &str,
) -> Option<String> {
    let client = match GitHubApiClient::new(&config.api.api_url, config.api.token.clone()) {
        Ok(client) => client,
        Err(e) => {
            info!(error = %e, "could not construct a client for the bundle endpoint");
            return None;
        }
    };
    let assets = match client.find_enterprise_bundle(tag).await {
        Ok(assets) => assets,
        Err(e) => {
            info!(
                %tag,
                error = %e,
                "internal bundle lookup failed, falling back to the release search"
            );
            return None;
        }
    };
    let Some(&asset_id) = assets.assets.get(bundle_name) else {
        info!(%tag, %bundle_name, "internal bundle lookup has no asset for this platform");
        return None;
    };
    match client.enterprise_bundle_download_url(asset_id).await {
        Ok(Some(url)) => {
            info!(%tag, asset_id, %url, "located bundle through the internal endpoint");
            Some(url)
        }
        Ok(None) => {
            info!(%tag, asset_id, "internal bundle download returned no URL");
            None
        }
        Err(e) => {
            info!(%tag, asset_id, error = %e, "internal bundle download lookup failed");
            None
        }
    }
}
