//! Analyze command handler
//!
//! Produces the GPS analysis report for one region.

use crate::analysis::region::enrich_with_addresses;
use crate::analysis::RegionAnalysisOrchestrator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::GeocodingClient;
use crate::store::Dataset;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Analyze command arguments
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Region code
    pub region: String,

    /// Start of the date window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: NaiveDate,

    /// End of the date window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Dataset JSON file (regions and price points)
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Reverse geocode the center and cluster centers
    #[arg(long)]
    pub addresses: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print only density statistics
    #[arg(long, conflicts_with = "addresses")]
    pub density: bool,
}

/// Run the analyze command
pub async fn run(args: AnalyzeArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let path = args
        .data
        .or(config.data.path.clone())
        .ok_or_else(|| Error::Data("No dataset given; pass --data or set data.path".to_string()))?;
    let dataset = Arc::new(Dataset::load(&path)?);

    let engine = RegionAnalysisOrchestrator::new(
        &config.validation,
        &config.analysis,
        dataset.clone(),
        dataset,
    );

    if args.density {
        let stats = engine.density(&args.region, args.from, args.to)?;
        return super::write_json(&stats, args.output.as_deref());
    }

    let mut analysis = engine.analyze_region(&args.region, args.from, args.to)?;
    if args.addresses {
        let client = GeocodingClient::from_config(&config.geocoding)?;
        enrich_with_addresses(&mut analysis, &client).await;
    }

    super::write_json(&analysis, args.output.as_deref())
}
