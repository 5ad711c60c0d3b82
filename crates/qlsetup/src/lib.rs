//! CodeQL bundle resolution and installation for CI runners
//!
//! Given a tool specification (nothing, `latest`, a URL, or a local
//! archive path), this crate decides where the bundle comes from and makes
//! it usable on the runner:
//!
//! - [`resolver`] walks the ordered decision chain over the tool cache,
//!   pinned enterprise entries, and the download fallback
//! - [`sources`] enumerates the repositories a release may live in,
//!   fork-first
//! - [`locator`] turns a release tag into a concrete download URL
//! - [`pipeline`] downloads, extracts, and persists a bundle into the
//!   tool cache
//! - [`setup`] ties it together behind one entry point,
//!   [`setup_tools`]
//!
//! Every install reports the same shape regardless of how it was
//! realized: the bundle directory, a human-readable version label, and
//! which kind of source produced it.

pub mod defaults;
mod error;
pub mod locator;
pub mod pipeline;
pub mod resolver;
pub mod setup;
pub mod sources;

pub use error::{Error, Result};
pub use locator::find_bundle_download_url;
pub use pipeline::{download_and_install, DownloadedTools};
pub use resolver::{resolve_tools_source, DefaultToolsVersion, ToolsSource, ToolsSpec};
pub use setup::{setup_tools, InstalledTools, ToolsOrigin};
pub use sources::{candidate_sources, CandidateSource};
