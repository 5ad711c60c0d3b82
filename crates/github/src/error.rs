//! Error types for GitHub API operations

use miette::Diagnostic;
use thiserror::Error;

/// Error type for GitHub API operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// HTTP transport or status failure
    #[error("GitHub API request to {url} failed: {message}")]
    #[diagnostic(
        code(qlsetup::github::http),
        help("Check network connectivity, the endpoint URL, and token permissions")
    )]
    Http {
        /// The request URL
        url: String,
        /// Error message
        message: String,
    },

    /// Release not found for the requested tag
    #[error("No release with tag {tag} in {repository}")]
    #[diagnostic(code(qlsetup::github::release_not_found))]
    ReleaseNotFound {
        /// The `owner/repo` repository identity
        repository: String,
        /// The requested tag name
        tag: String,
    },

    /// Response body failed to deserialize
    #[error("Malformed GitHub API response from {url}: {message}")]
    #[diagnostic(code(qlsetup::github::malformed_response))]
    MalformedResponse {
        /// The request URL
        url: String,
        /// Error message
        message: String,
    },

    /// HTTP client construction failure
    #[error("Failed to construct HTTP client: {message}")]
    #[diagnostic(code(qlsetup::github::client))]
    Client {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create an HTTP error
    #[must_use]
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a release-not-found error
    #[must_use]
    pub fn release_not_found(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::ReleaseNotFound {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Create a malformed-response error
    #[must_use]
    pub fn malformed_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Result type for GitHub API operations
pub type Result<T> = std::result::Result<T, Error>;
