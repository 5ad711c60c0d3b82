//! Tar archive extraction with compression inference.
//!
//! Bundles ship as `.tar.gz` or `.tar.zst`. The compression method is
//! inferred from the download URL or local file name, never from the
//! archive contents.

use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;

use crate::error::{Error, Result};

/// Compression applied to a tool bundle tarball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// gzip (`.tar.gz`, `.tgz`)
    Gzip,
    /// Zstandard (`.tar.zst`)
    Zstd,
}

impl CompressionMethod {
    /// Infer the compression method from a download URL.
    ///
    /// Unrecognized extensions fall back to gzip, the format the canonical
    /// releases publish.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.ends_with(".tar.zst") {
            Self::Zstd
        } else {
            Self::Gzip
        }
    }

    /// Infer the compression method from a local archive path.
    ///
    /// The caller named a concrete file here, so an unrecognized extension
    /// is a configuration error rather than a guess.
    pub fn from_local_path(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::Gzip)
        } else if name.ends_with(".tar.zst") {
            Ok(Self::Zstd)
        } else {
            Err(Error::configuration(format!(
                "Unsupported archive extension for {}: expected .tar.gz, .tgz, or .tar.zst",
                path.display()
            )))
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gzip => write!(f, "gzip"),
            Self::Zstd => write!(f, "zstd"),
        }
    }
}

/// Extract a tarball into `dest`, creating it if needed.
///
/// Returns `dest` on success. Extraction is whole-tree; the bundle layout
/// inside the archive is preserved as-is.
pub fn extract_tar(archive: &Path, method: CompressionMethod, dest: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dest).map_err(|e| Error::io(e, dest, "create_dir_all"))?;
    let file = std::fs::File::open(archive).map_err(|e| Error::io(e, archive, "open"))?;

    match method {
        CompressionMethod::Gzip => unpack(Archive::new(GzDecoder::new(file)), archive, dest)?,
        CompressionMethod::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(file)
                .map_err(|e| Error::extraction(archive, e.to_string()))?;
            unpack(Archive::new(decoder), archive, dest)?;
        }
    }

    info!(
        archive = %archive.display(),
        dest = %dest.display(),
        %method,
        "extracted archive"
    );
    Ok(dest.to_path_buf())
}

fn unpack<R: std::io::Read>(mut archive: Archive<R>, archive_path: &Path, dest: &Path) -> Result<()> {
    archive
        .unpack(dest)
        .map_err(|e| Error::extraction(archive_path, e.to_string()))
}
