//! Error types for the core crate

use miette::Diagnostic;
use thiserror::Error;

/// Error type for version normalization and configuration
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(qlsetup::core::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A version string that fails to parse even after pre-release wrapping
    #[error("Bundle version {version} is not in SemVer format")]
    #[diagnostic(
        code(qlsetup::core::version),
        help("Bundle versions must be semantic versions or strings valid as pre-release identifiers")
    )]
    Version {
        /// The offending version string
        version: String,
    },

    /// An internal invariant was violated
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(qlsetup::core::internal),
        help("This indicates a bug; please report it")
    )]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create a version error
    #[must_use]
    pub fn version(version: impl Into<String>) -> Self {
        Self::Version {
            version: version.into(),
        }
    }

    /// Create an internal invariant error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
