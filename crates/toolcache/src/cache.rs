//! Runner-local tool cache.
//!
//! Tools are stored by name and version string, ensuring:
//! - Cache hits across job steps on the same runner
//! - No re-download when the same bundle is requested twice
//!
//! Structure:
//! ```text
//! <root>/
//! └── CodeQL/
//!     ├── 2.12.1-20230101/        # extracted bundle
//!     │   └── pinned-version      # optional pin marker
//!     └── 2.12.1-20230101.complete
//! ```
//!
//! A version directory only counts as cached once its sibling `.complete`
//! marker exists; a crash mid-copy leaves a directory that every lookup
//! ignores.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Marker file inside a version directory flagging a deliberate pin.
pub const PINNED_MARKER: &str = "pinned-version";

/// Suffix of the sibling marker recording a completed cache write.
const COMPLETE_SUFFIX: &str = ".complete";

/// Runner-local tool cache rooted at a single directory.
#[derive(Debug, Clone)]
pub struct Toolcache {
    root: PathBuf,
}

impl Default for Toolcache {
    fn default() -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("qlsetup")
            .join("tools");
        Self::new(root)
    }
}

impl Toolcache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory a tool version lives in.
    #[must_use]
    pub fn version_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    /// Find a complete cache entry whose version is semver-equal to the
    /// requested one.
    ///
    /// Returns `None` when the requested version does not parse as a
    /// semantic version or no complete entry matches.
    #[must_use]
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let Ok(requested) = Version::parse(version) else {
            debug!(tool, %version, "requested version is not semver, cache lookup skipped");
            return None;
        };
        for cached in self.find_all_versions(tool) {
            if Version::parse(&cached).is_ok_and(|v| v == requested) {
                let dir = self.version_dir(tool, &cached);
                debug!(tool, version = %cached, ?dir, "toolcache hit");
                return Some(dir);
            }
        }
        debug!(tool, %version, "toolcache miss");
        None
    }

    /// List the version strings of all complete cache entries for a tool.
    ///
    /// Directories without a `.complete` marker or whose name is not a
    /// semantic version are skipped.
    #[must_use]
    pub fn find_all_versions(&self, tool: &str) -> Vec<String> {
        let dir = self.root.join(tool);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut versions: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| Version::parse(name).is_ok())
            .filter(|name| self.is_complete(tool, name))
            .collect();
        versions.sort();
        versions
    }

    /// Persist a directory tree into the cache under `tool`/`version`.
    ///
    /// Any existing entry for the same version is replaced. The `.complete`
    /// marker is written last, after the copy fully succeeds.
    pub fn cache_directory(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dest = self.version_dir(tool, version);
        let marker = self.marker_path(tool, version);

        if marker.exists() {
            std::fs::remove_file(&marker).map_err(|e| Error::io(e, &marker, "remove_file"))?;
        }
        if dest.exists() {
            std::fs::remove_dir_all(&dest).map_err(|e| Error::io(e, &dest, "remove_dir_all"))?;
        }
        copy_dir_recursive(source, &dest)?;
        std::fs::write(&marker, b"").map_err(|e| Error::io(e, &marker, "write"))?;

        info!(tool, %version, dest = %dest.display(), "cached tool directory");
        Ok(dest)
    }

    /// Whether a cached version carries the pin marker file.
    #[must_use]
    pub fn is_pinned(&self, tool: &str, version: &str) -> bool {
        self.version_dir(tool, version).join(PINNED_MARKER).exists()
    }

    fn is_complete(&self, tool: &str, version: &str) -> bool {
        self.marker_path(tool, version).exists()
    }

    fn marker_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(format!("{version}{COMPLETE_SUFFIX}"))
    }
}

/// Copy a directory tree, preserving file permissions.
fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| Error::io(e, dest, "create_dir_all"))?;
    let entries = std::fs::read_dir(source).map_err(|e| Error::io(e, source, "read_dir"))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(e, source, "read_dir"))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| Error::io(e, &from, "file_type"))?;
        if file_type.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| Error::io(e, &from, "copy"))?;
        }
    }
    Ok(())
}
