//! Advisory disk-space probing.
//!
//! Snapshots around pipeline steps are logging-only; a failed probe is
//! reported at debug level and never interrupts the caller.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Free and total space of the filesystem holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    /// Bytes available to the current process
    pub free_bytes: u64,
    /// Total size of the filesystem in bytes
    pub total_bytes: u64,
}

impl DiskUsage {
    /// Free space in whole megabytes.
    #[must_use]
    pub fn free_mb(self) -> u64 {
        self.free_bytes / (1024 * 1024)
    }

    /// Total space in whole megabytes.
    #[must_use]
    pub fn total_mb(self) -> u64 {
        self.total_bytes / (1024 * 1024)
    }
}

/// Probe the filesystem holding `path`.
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    let free_bytes = fs2::available_space(path).map_err(|e| Error::io(e, path, "statvfs"))?;
    let total_bytes = fs2::total_space(path).map_err(|e| Error::io(e, path, "statvfs"))?;
    Ok(DiskUsage {
        free_bytes,
        total_bytes,
    })
}

/// Log a disk-usage snapshot for a pipeline step, swallowing probe errors.
pub fn log_disk_usage(activity: &str, path: &Path) {
    match disk_usage(path) {
        Ok(usage) => info!(
            activity,
            path = %path.display(),
            free_mb = usage.free_mb(),
            total_mb = usage.total_mb(),
            "disk usage"
        ),
        Err(e) => debug!(
            activity,
            path = %path.display(),
            error = %e,
            "could not read disk usage"
        ),
    }
}
