//! Resolution chain tests against a real on-disk tool cache.
//!
//! Each test arranges cache entries and a host configuration, then asserts
//! which step of the chain wins. Download decisions on the public host
//! never touch the network: the canonical URL is synthesized, not fetched.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use qlsetup::{resolve_tools_source, DefaultToolsVersion, ToolsSource, ToolsSpec};
use qlsetup_core::{ApiDetails, Os, SetupConfig};
use qlsetup_toolcache::Toolcache;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn add_entry(root: &Path, version: &str) {
    let dir = root.join("CodeQL").join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("codeql"), b"tool").unwrap();
    std::fs::write(
        root.join("CodeQL").join(format!("{version}.complete")),
        b"",
    )
    .unwrap();
}

fn pin_entry(root: &Path, version: &str) {
    std::fs::write(
        root.join("CodeQL").join(version).join("pinned-version"),
        b"",
    )
    .unwrap();
}

fn dotcom_config() -> SetupConfig {
    SetupConfig::new(ApiDetails::public_dotcom())
}

fn ghes_config(api_url: &str) -> SetupConfig {
    SetupConfig::new(ApiDetails {
        url: "https://github.example.com".to_string(),
        api_url: api_url.to_string(),
        token: None,
    })
}

fn defaults(cli_version: &str, tag_name: &str) -> DefaultToolsVersion {
    DefaultToolsVersion {
        cli_version: cli_version.to_string(),
        tag_name: tag_name.to_string(),
    }
}

fn canonical_url(tag: &str) -> String {
    format!(
        "https://github.com/github/codeql-action/releases/download/{tag}/{}",
        Os::current().bundle_asset_name()
    )
}

/// A wiremock server answering 404 to everything, standing in for an
/// enterprise API with no bundle releases.
async fn empty_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_unset_spec_with_empty_cache_downloads_the_default() {
    let temp = TempDir::new().unwrap();
    let cache = Toolcache::new(temp.path().to_path_buf());
    let defaults = defaults("2.15.0", "codeql-bundle-20231114");

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults,
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Download {
            url,
            bundle_version,
            cli_version,
            tools_version,
        } => {
            assert_eq!(url, canonical_url("codeql-bundle-20231114"));
            assert_eq!(bundle_version.as_deref(), Some("20231114"));
            assert_eq!(cli_version.as_deref(), Some("2.15.0"));
            assert_eq!(tools_version, "2.15.0");
        }
        other => panic!("expected a download source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_local_path_wins_over_everything() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.15.0");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::parse(Some("foo/bar.tar.gz")),
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    assert_eq!(
        source,
        ToolsSource::Local {
            tar_path: "foo/bar.tar.gz".into(),
        }
    );
    assert_eq!(source.tools_version(), "local");
}

#[tokio::test]
async fn test_exact_cache_hit_on_cli_version() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.12.1");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.12.1", "codeql-bundle-20230101"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Toolcache {
            folder,
            tools_version,
        } => {
            assert!(folder.ends_with("CodeQL/2.12.1"));
            assert_eq!(tools_version, "2.12.1");
        }
        other => panic!("expected a toolcache source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_single_suffixed_entry_is_accepted() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.12.1-20230101");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.12.1", "codeql-bundle-20230101"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Toolcache {
            folder,
            tools_version,
        } => {
            assert!(folder.ends_with("CodeQL/2.12.1-20230101"));
            assert_eq!(tools_version, "2.12.1");
        }
        other => panic!("expected a toolcache source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ambiguous_suffixed_entries_fall_through_to_download() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.12.1-20230101");
    add_entry(temp.path(), "2.12.1-20230202");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.12.1", "codeql-bundle-20230101"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Download { url, .. } => {
            assert_eq!(url, canonical_url("codeql-bundle-20230101"));
        }
        other => panic!("expected a download source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_legacy_coerced_key_is_found() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "0.0.0-20230101");
    let cache = Toolcache::new(temp.path().to_path_buf());

    // A timestamp-like bundle version yields no CLI version, so only the
    // legacy key can match.
    let url = "https://github.example.com/releases/codeql-bundle-20230101/codeql-bundle-linux64.tar.gz";
    let source = resolve_tools_source(
        &ToolsSpec::parse(Some(url)),
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Toolcache {
            folder,
            tools_version,
        } => {
            assert!(folder.ends_with("CodeQL/0.0.0-20230101"));
            assert_eq!(tools_version, "0.0.0-20230101");
        }
        other => panic!("expected a toolcache source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_semver_tagged_url_hits_suffixed_entry() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.15.0-v2.15.0");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let url = "https://github.com/github/codeql-action/releases/download/codeql-bundle-v2.15.0/codeql-bundle-linux64.tar.gz";
    let source = resolve_tools_source(
        &ToolsSpec::parse(Some(url)),
        &defaults("2.12.1", "codeql-bundle-20230101"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Toolcache { tools_version, .. } => {
            assert_eq!(tools_version, "2.15.0");
        }
        other => panic!("expected a toolcache source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_opaque_url_resolves_to_its_own_download() {
    let temp = TempDir::new().unwrap();
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::parse(Some("https://artifacts.example.com/bundles/12345")),
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Download {
            url,
            bundle_version,
            cli_version,
            tools_version,
        } => {
            assert_eq!(url, "https://artifacts.example.com/bundles/12345");
            assert_eq!(bundle_version, None);
            assert_eq!(cli_version, None);
            assert_eq!(tools_version, "https://artifacts.example.com/bundles/12345");
        }
        other => panic!("expected a download source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pinned_entry_used_on_enterprise_host() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &ghes_config("https://github.example.com/api/v3"),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Toolcache {
            folder,
            tools_version,
        } => {
            assert!(folder.ends_with("CodeQL/2.11.6"));
            assert_eq!(tools_version, "2.11.6");
        }
        other => panic!("expected the pinned source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pinned_entry_ignored_on_dotcom() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &dotcom_config(),
        &cache,
    )
    .await
    .unwrap();

    assert!(matches!(source, ToolsSource::Download { .. }));
}

#[tokio::test]
async fn test_pinned_entry_ignored_for_explicit_url() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::parse(Some("https://artifacts.example.com/bundles/12345")),
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &ghes_config("https://github.example.com/api/v3"),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Download { url, .. } => {
            assert_eq!(url, "https://artifacts.example.com/bundles/12345");
        }
        other => panic!("expected a download source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_latest_ignores_pinned_entries() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    let cache = Toolcache::new(temp.path().to_path_buf());
    let api = empty_api().await;

    let source = resolve_tools_source(
        &ToolsSpec::parse(Some("latest")),
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &ghes_config(&api.uri()),
        &cache,
    )
    .await
    .unwrap();

    match source {
        ToolsSource::Download { url, cli_version, .. } => {
            assert_eq!(url, canonical_url("codeql-bundle-v2.15.0"));
            assert_eq!(cli_version.as_deref(), Some("2.15.0"));
        }
        other => panic!("expected a download source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_multiple_pinned_entries_fall_through() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    add_entry(temp.path(), "2.13.0");
    pin_entry(temp.path(), "2.13.0");
    let cache = Toolcache::new(temp.path().to_path_buf());
    let api = empty_api().await;

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &ghes_config(&api.uri()),
        &cache,
    )
    .await
    .unwrap();

    assert!(matches!(source, ToolsSource::Download { .. }));
}

#[tokio::test]
async fn test_broken_pinned_entry_is_not_eligible() {
    let temp = TempDir::new().unwrap();
    add_entry(temp.path(), "2.20.4");
    pin_entry(temp.path(), "2.20.4");
    add_entry(temp.path(), "2.11.6");
    pin_entry(temp.path(), "2.11.6");
    let cache = Toolcache::new(temp.path().to_path_buf());

    let source = resolve_tools_source(
        &ToolsSpec::Unset,
        &defaults("2.15.0", "codeql-bundle-v2.15.0"),
        &ghes_config("https://github.example.com/api/v3"),
        &cache,
    )
    .await
    .unwrap();

    // 2.20.4 shipped broken; with it filtered out exactly one pinned
    // entry remains.
    match source {
        ToolsSource::Toolcache { tools_version, .. } => {
            assert_eq!(tools_version, "2.11.6");
        }
        other => panic!("expected the pinned source, got {other:?}"),
    }
}
