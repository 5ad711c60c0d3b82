//! Runner-local tool cache and acquisition primitives for qlsetup
//!
//! This crate provides the capabilities the setup engine calls and never
//! reimplements:
//! - The versioned tool cache: lookup, enumeration, persistence, and pin
//!   detection ([`cache`])
//! - Streaming HTTP download to uniquely named temporary files
//!   ([`download`])
//! - Tarball extraction with compression inference ([`extract`])
//! - Advisory disk-space probing ([`disk`])
//!
//! # Cache layout
//!
//! Entries live under `<root>/<tool>/<version>/` with a sibling
//! `<version>.complete` marker written only after a fully successful copy.
//! Lookups ignore directories without the marker, so an interrupted write
//! never surfaces as a cache hit.

mod error;

pub mod cache;
pub mod disk;
pub mod download;
pub mod extract;

pub use cache::{Toolcache, PINNED_MARKER};
pub use disk::{disk_usage, log_disk_usage, DiskUsage};
pub use download::download_to_dir;
pub use error::{Error, Result};
pub use extract::{extract_tar, CompressionMethod};
