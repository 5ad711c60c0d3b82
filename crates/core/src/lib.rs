//! Core types for qlsetup
//!
//! This crate holds the side-effect-free bottom layer of the bundle setup
//! engine:
//!
//! - Version normalization between CLI versions, release tag names, and
//!   bundle versions ([`version`])
//! - Platform detection and bundle asset naming ([`platform`])
//! - Host deployment-variant classification and the immutable setup
//!   configuration ([`config`])
//!
//! # Version identifiers
//!
//! A bundle is referred to by three distinct strings: the CLI semantic
//! version (`2.12.1`), the release tag (`codeql-bundle-20230101`), and the
//! bundle version captured from the tag (`20230101`). The [`version`]
//! module converts between them; the coercion of an arbitrary bundle
//! version into a semantic version (`0.0.0-20230101`) is one-way.

pub mod config;
pub mod error;
pub mod platform;
pub mod version;

pub use config::{ApiDetails, GitHubVariant, SetupConfig, PUBLIC_API_URL, PUBLIC_SERVER_URL};
pub use error::{Error, Result};
pub use platform::Os;
