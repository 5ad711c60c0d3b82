//! Top-level bundle installation.

use std::fmt;
use std::path::{Path, PathBuf};

use qlsetup_core::SetupConfig;
use qlsetup_toolcache::{extract_tar, CompressionMethod, Toolcache};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::pipeline::download_and_install;
use crate::resolver::{resolve_tools_source, DefaultToolsVersion, ToolsSource, ToolsSpec};

/// Which kind of source realized an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolsOrigin {
    /// An archive already on the runner
    Local,
    /// A pre-existing tool cache entry
    Toolcache,
    /// A freshly downloaded release asset
    Download,
}

impl fmt::Display for ToolsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "LOCAL"),
            Self::Toolcache => write!(f, "TOOLCACHE"),
            Self::Download => write!(f, "DOWNLOAD"),
        }
    }
}

/// Uniform result of a bundle installation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledTools {
    /// Directory holding the usable bundle
    pub tool_folder: PathBuf,
    /// Human-readable version label
    pub tools_version: String,
    /// Which kind of source realized the install
    pub tools_source: ToolsOrigin,
    /// Download duration, present only when a download happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_duration_ms: Option<u64>,
}

/// Resolve the requested bundle and make it usable on this runner.
///
/// Local archives are extracted in place under `temp_dir`, cache hits are
/// returned as-is, and downloads run through the full acquisition
/// pipeline. Every outcome reports the same shape.
///
/// # Errors
///
/// Fails on malformed inputs and on download, extraction, or cache
/// failures.
pub async fn setup_tools(
    tools_input: Option<&str>,
    defaults: &DefaultToolsVersion,
    config: &SetupConfig,
    cache: &Toolcache,
    temp_dir: &Path,
) -> Result<InstalledTools> {
    let spec = ToolsSpec::parse(tools_input);
    let source = resolve_tools_source(&spec, defaults, config, cache).await?;
    let tools_version = source.tools_version().to_string();

    match source {
        ToolsSource::Local { tar_path } => {
            let method = CompressionMethod::from_local_path(&tar_path)?;
            let dest = temp_dir.join(Uuid::new_v4().to_string());
            info!(archive = %tar_path.display(), "extracting local CodeQL bundle");
            let tool_folder = extract_tar(&tar_path, method, &dest)?;
            Ok(InstalledTools {
                tool_folder,
                tools_version,
                tools_source: ToolsOrigin::Local,
                download_duration_ms: None,
            })
        }
        ToolsSource::Toolcache { folder, .. } => {
            debug!(folder = %folder.display(), "CodeQL already installed");
            Ok(InstalledTools {
                tool_folder: folder,
                tools_version,
                tools_source: ToolsOrigin::Toolcache,
                download_duration_ms: None,
            })
        }
        ToolsSource::Download {
            url,
            bundle_version,
            cli_version,
            ..
        } => {
            let downloaded = download_and_install(
                &url,
                bundle_version.as_deref(),
                cli_version.as_deref(),
                config,
                cache,
                temp_dir,
            )
            .await?;
            Ok(InstalledTools {
                tool_folder: downloaded.tool_folder,
                tools_version: downloaded.tools_version,
                tools_source: ToolsOrigin::Download,
                download_duration_ms: Some(downloaded.download_duration_ms),
            })
        }
    }
}
