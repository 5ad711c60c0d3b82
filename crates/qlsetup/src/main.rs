//! qlsetup binary entry point.

mod cli;
mod tracing;

use std::path::PathBuf;

use qlsetup::{defaults, setup_tools};
use qlsetup_core::{version, SetupConfig};
use qlsetup_toolcache::Toolcache;

use crate::cli::{Commands, OutputFormat};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = cli::parse();
    crate::tracing::init(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Install { tools, format } => install(tools.as_deref(), format).await,
        Commands::ToolsVersion { url } => {
            let version = version::version_from_url(&url)?;
            println!("{version}");
            Ok(())
        }
    }
}

async fn install(tools: Option<&str>, format: OutputFormat) -> miette::Result<()> {
    let config = SetupConfig::from_env();
    let cache = config
        .tool_cache_dir
        .clone()
        .map_or_else(Toolcache::default, Toolcache::new);
    let temp_dir = std::env::var_os("RUNNER_TEMP")
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join("qlsetup");
    let defaults = defaults::shipped_defaults();

    let installed = setup_tools(tools, &defaults, &config, &cache, &temp_dir).await?;

    match format {
        OutputFormat::Json => {
            let report = serde_json::to_string_pretty(&installed)
                .map_err(|e| miette::miette!("failed to serialize the report: {e}"))?;
            println!("{report}");
        }
        OutputFormat::Text => {
            println!(
                "CodeQL tools version {} ({})",
                installed.tools_version, installed.tools_source
            );
            println!("{}", installed.tool_folder.display());
            if let Some(ms) = installed.download_duration_ms {
                println!("downloaded in {ms} ms");
            }
        }
    }
    Ok(())
}
