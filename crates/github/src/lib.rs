//! GitHub API access for qlsetup
//!
//! A small typed client over the pieces of the GitHub REST API the setup
//! engine needs:
//!
//! - Release lookup by tag, returning the release's asset names and asset
//!   API URLs ([`GitHubApiClient::release_by_tag`])
//! - The internal bundle lookup and download endpoints served by the
//!   GitHub-managed deployment variant
//!   ([`GitHubApiClient::find_enterprise_bundle`])
//! - A raw JSON GET escape hatch for anything else
//!   ([`GitHubApiClient::get_json`])
//!
//! The client is bound to one API endpoint at construction time. Bundle
//! resolution builds one client per candidate source, so a request never
//! accidentally crosses hosts with the wrong credentials.

mod error;

pub mod api;

pub use api::{EnterpriseBundleAssets, GitHubApiClient, Release, ReleaseAsset};
pub use error::{Error, Result};
