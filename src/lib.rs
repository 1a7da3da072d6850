//! geotrust: GPS validation and analysis for crowd-sourced price data
//!
//! A library and CLI tool that checks submitted coordinates for physical and
//! contextual plausibility and summarizes the spatial distribution of a
//! region's price points.
//!
//! ## Features
//!
//! - Haversine distance and country/zone plausibility checks
//! - Accuracy classification and a 0-100 quality score per coordinate
//! - Radius clustering, density and nearest-neighbor search
//! - Cached reverse geocoding through Nominatim
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use geotrust::config::Config;
//! use geotrust::coord::Coordinate;
//! use geotrust::store::Dataset;
//! use geotrust::validate::CoordinateValidator;
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let validator = CoordinateValidator::new(&config.validation, Arc::new(Dataset::default()));
//!
//! // Abidjan, reported accuracy 8 m
//! let result = validator.validate(Coordinate::new(5.36, -4.01), Some(8.0), None);
//! assert!(result.valid);
//! println!("Quality score: {}", result.quality_score);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod geo;
pub mod server;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use coord::{BoundingBox, Coordinate};
pub use error::{Error, Result};
pub use geo::{GeocodingClient, GeocodingResult};
pub use validate::{CoordinateValidator, ValidationResult};
