//! Error type for bundle resolution and installation.

use miette::Diagnostic;
use thiserror::Error;

/// Any failure raised while resolving or installing a bundle
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Version normalization or configuration failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] qlsetup_core::Error),

    /// Cache, download, or extraction failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    Toolcache(#[from] qlsetup_toolcache::Error),

    /// GitHub API failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    GitHub(#[from] qlsetup_github::Error),
}

/// Result type for setup operations
pub type Result<T> = std::result::Result<T, Error>;
