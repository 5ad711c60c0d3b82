//! Error types for toolcache operations

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for cache, download, and extraction operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error during cache operations
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(qlsetup::toolcache::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },

    /// HTTP download failure
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(
        code(qlsetup::toolcache::download),
        help("Check network connectivity and that the URL is reachable from this runner")
    )]
    Download {
        /// The URL being downloaded
        url: String,
        /// Error message
        message: String,
    },

    /// Archive extraction failure
    #[error("Failed to extract {}: {message}", path.display())]
    #[diagnostic(code(qlsetup::toolcache::extraction))]
    Extraction {
        /// The archive that failed to extract
        path: Box<Path>,
        /// Error message
        message: String,
    },

    /// Configuration or validation error
    #[error("Toolcache configuration error: {message}")]
    #[diagnostic(code(qlsetup::toolcache::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create a download error
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error
    #[must_use]
    pub fn extraction(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.as_ref().into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }
}

/// Result type for toolcache operations
pub type Result<T> = std::result::Result<T, Error>;
