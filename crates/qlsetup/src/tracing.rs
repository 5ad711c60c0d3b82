//! Tracing configuration for the qlsetup binary.

use std::io;

use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the level derives from
/// the `-v`/`-q` flags, defaulting to progress information. Logs go to
/// stderr so stdout stays reserved for command output.
pub fn init(verbose: u8, quiet: bool) -> miette::Result<()> {
    let level = default_level(verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "qlsetup={level},qlsetup_core={level},qlsetup_toolcache={level},qlsetup_github={level}"
            ))
        })
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry().with(env_filter).with(layer).init();
    Ok(())
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_mapping() {
        assert_eq!(default_level(0, false), "info");
        assert_eq!(default_level(1, false), "debug");
        assert_eq!(default_level(2, false), "trace");
        assert_eq!(default_level(3, false), "trace");
        assert_eq!(default_level(0, true), "error");
    }
}
