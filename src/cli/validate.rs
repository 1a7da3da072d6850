//! Validate command handler
//!
//! Runs the full coordinate validation pipeline on one point.

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::store::Dataset;
use crate::validate::CoordinateValidator;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Validate command arguments
#[derive(Args)]
pub struct ValidateArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Reported GPS accuracy in meters
    #[arg(long, short = 'a')]
    pub accuracy: Option<f64>,

    /// Region code to check consistency against
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Dataset JSON file providing region centroids
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let coordinate = Coordinate::new(args.lat, args.lng);
    coordinate.validate()?;

    let dataset = match args.data.or(config.data.path.clone()) {
        Some(path) => Dataset::load(&path)?,
        None => Dataset::default(),
    };

    let validator = CoordinateValidator::new(&config.validation, Arc::new(dataset));
    let result = validator.validate(coordinate, args.accuracy, args.region.as_deref());

    super::print_json(&result)
}
