//! Host configuration for bundle setup
//!
//! Resolution behavior differs across the three deployment variants of the
//! host: the public multi-tenant instance, GitHub Enterprise Server, and
//! the managed `*.ghe.com` variant. The variant, the API endpoints, and the
//! executing action's repository identity are collected once into an
//! immutable [`SetupConfig`] so that every resolution branch is
//! deterministic and unit-testable.

use std::path::PathBuf;

/// Server URL of the public multi-tenant host
pub const PUBLIC_SERVER_URL: &str = "https://github.com";

/// API endpoint of the public multi-tenant host
pub const PUBLIC_API_URL: &str = "https://api.github.com";

/// Deployment variant of the GitHub host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitHubVariant {
    /// The public multi-tenant instance at github.com
    Dotcom,
    /// A self-hosted GitHub Enterprise Server instance
    Ghes,
    /// A managed instance under the ghe.com domain
    GheDotcom,
}

impl GitHubVariant {
    /// Classify a server URL into its deployment variant.
    #[must_use]
    pub fn from_server_url(url: &str) -> Self {
        let host = host_of(url);
        if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("api.github.com")
        {
            Self::Dotcom
        } else if host.to_ascii_lowercase().ends_with(".ghe.com") {
            Self::GheDotcom
        } else {
            Self::Ghes
        }
    }

    /// Whether this is the public multi-tenant host.
    #[must_use]
    pub fn is_dotcom(self) -> bool {
        self == Self::Dotcom
    }
}

/// Endpoint and credential details for one GitHub host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDetails {
    /// Server URL, e.g. `https://github.com`
    pub url: String,
    /// API endpoint, e.g. `https://api.github.com`
    pub api_url: String,
    /// Bearer token for authenticated requests, if available
    pub token: Option<String>,
}

impl ApiDetails {
    /// Details for the public multi-tenant host, unauthenticated.
    #[must_use]
    pub fn public_dotcom() -> Self {
        Self {
            url: PUBLIC_SERVER_URL.to_string(),
            api_url: PUBLIC_API_URL.to_string(),
            token: None,
        }
    }
}

/// Immutable configuration driving tool source resolution
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Endpoints and credentials of the host the job runs on
    pub api: ApiDetails,
    /// Deployment variant of that host
    pub variant: GitHubVariant,
    /// `owner/repo` identity of the executing action, when known.
    /// Differs from the canonical repository when running from a fork.
    pub action_repository: Option<String>,
    /// Root of the runner's tool cache, when configured
    pub tool_cache_dir: Option<PathBuf>,
}

impl SetupConfig {
    /// Build a configuration from host API details, inferring the variant
    /// from the server URL.
    #[must_use]
    pub fn new(api: ApiDetails) -> Self {
        let variant = GitHubVariant::from_server_url(&api.url);
        Self {
            api,
            variant,
            action_repository: None,
            tool_cache_dir: None,
        }
    }

    /// Build a configuration from the runner environment.
    ///
    /// Reads `GITHUB_SERVER_URL`, `GITHUB_API_URL`, `GITHUB_TOKEN` /
    /// `GH_TOKEN`, `GITHUB_ACTION_REPOSITORY`, and `RUNNER_TOOL_CACHE`,
    /// defaulting to the public host when unset.
    #[must_use]
    pub fn from_env() -> Self {
        let url = env_nonempty("GITHUB_SERVER_URL")
            .unwrap_or_else(|| PUBLIC_SERVER_URL.to_string());
        let url = url.trim_end_matches('/').to_string();
        let variant = GitHubVariant::from_server_url(&url);
        let api_url =
            env_nonempty("GITHUB_API_URL").unwrap_or_else(|| default_api_url(&url, variant));
        let token = env_nonempty("GITHUB_TOKEN").or_else(|| env_nonempty("GH_TOKEN"));
        Self {
            api: ApiDetails {
                url,
                api_url,
                token,
            },
            variant,
            action_repository: env_nonempty("GITHUB_ACTION_REPOSITORY"),
            tool_cache_dir: env_nonempty("RUNNER_TOOL_CACHE").map(PathBuf::from),
        }
    }
}

/// The conventional API endpoint for a server URL.
#[must_use]
pub fn default_api_url(server_url: &str, variant: GitHubVariant) -> String {
    match variant {
        GitHubVariant::Dotcom => PUBLIC_API_URL.to_string(),
        GitHubVariant::GheDotcom => format!("https://api.{}", host_of(server_url)),
        GitHubVariant::Ghes => format!("{}/api/v3", server_url.trim_end_matches('/')),
    }
}

/// Extract the host component of a URL, dropping scheme, port, and path.
fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    host.split(':').next().unwrap_or(host)
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
