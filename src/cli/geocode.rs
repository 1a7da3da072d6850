//! Geocode command handler
//!
//! Resolves a coordinate to an address through the configured provider.

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::geo::GeocodingClient;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print only the formatted address
    #[arg(long)]
    pub short: bool,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let coordinate = Coordinate::new(args.lat, args.lng);
    coordinate.validate()?;

    let client = GeocodingClient::from_config(&config.geocoding)?;
    let result = client.reverse_geocode(coordinate).await;

    if args.short {
        match (&result.formatted_address, &result.error_message) {
            (Some(address), _) => println!("{}", address),
            (None, Some(message)) => eprintln!("Geocoding failed: {}", message),
            (None, None) => eprintln!("No address found for {}", coordinate),
        }
        return Ok(());
    }

    super::print_json(&result)
}
