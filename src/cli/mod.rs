//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod analyze;
pub mod config;
pub mod geocode;
pub mod serve;
pub mod validate;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// GPS validation and regional analysis for crowd-sourced price data
#[derive(Parser)]
#[command(name = "geotrust")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Validate a single coordinate
    Validate(validate::ValidateArgs),

    /// Reverse geocode a coordinate
    Geocode(geocode::GeocodeArgs),

    /// Analyze a region's GPS data over a date window
    Analyze(analyze::AnalyzeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Validate(args) => validate::run(args),
        Commands::Geocode(args) => geocode::run(args).await,
        Commands::Analyze(args) => analyze::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Install the fmt subscriber, honoring `RUST_LOG` when set.
///
/// Logs go to stderr so JSON output on stdout stays parseable.
pub(crate) fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print a value as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> crate::error::Result<()> {
    write_json(value, None)
}

/// Write a value as pretty JSON to a file, or stdout when no path is given
pub(crate) fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> crate::error::Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, &output)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");

        write_json(&serde_json::json!({ "region_code": "ABJ" }), Some(&path)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["region_code"], "ABJ");
    }

    #[test]
    fn test_write_json_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("report.json");

        let err = write_json(&serde_json::json!({}), Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
