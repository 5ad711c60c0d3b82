//! Command-line interface definition for qlsetup.

use clap::{Parser, Subcommand, ValueEnum};

/// Resolve, download, and cache CodeQL bundles for CI runners
#[derive(Debug, Parser)]
#[command(name = "qlsetup")]
#[command(about = "Resolve, download, and cache CodeQL bundles for CI runners")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more detail)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve and install a CodeQL bundle
    Install {
        /// Bundle to install: a download URL, an archive path on this
        /// machine, or "latest" for the default version
        #[arg(long, env = "QLSETUP_TOOLS")]
        tools: Option<String>,

        /// Output format for the installation report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the version encoded in a bundle download URL
    ToolsVersion {
        /// Bundle download URL
        #[arg(long)]
        url: String,
    },
}

/// Output format of the installation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// A single JSON object
    Json,
}

/// Parse command line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_defaults() {
        let cli = Cli::try_parse_from(["qlsetup", "install"]).unwrap();
        match cli.command {
            Commands::Install { tools, format } => {
                assert_eq!(tools, None);
                assert_eq!(format, OutputFormat::Text);
            }
            Commands::ToolsVersion { .. } => panic!("expected install"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_install_with_tools_and_format() {
        let cli = Cli::try_parse_from([
            "qlsetup",
            "install",
            "--tools",
            "latest",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Install { tools, format } => {
                assert_eq!(tools.as_deref(), Some("latest"));
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::ToolsVersion { .. } => panic!("expected install"),
        }
    }

    #[test]
    fn test_tools_version_requires_url() {
        assert!(Cli::try_parse_from(["qlsetup", "tools-version"]).is_err());
        let cli = Cli::try_parse_from([
            "qlsetup",
            "tools-version",
            "--url",
            "https://github.com/github/codeql-action/releases/download/codeql-bundle-20230101/codeql-bundle-linux64.tar.gz",
        ])
        .unwrap();
        match cli.command {
            Commands::ToolsVersion { url } => assert!(url.contains("codeql-bundle-20230101")),
            Commands::Install { .. } => panic!("expected tools-version"),
        }
    }

    #[test]
    fn test_verbose_flag_counts() {
        let cli = Cli::try_parse_from(["qlsetup", "-vv", "install"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["qlsetup", "-v", "-q", "install"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["qlsetup", "frobnicate"]).is_err());
    }
}
