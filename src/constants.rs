//! Centralized constants for the geotrust crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Kilometers per degree of latitude (approximate, varies slightly with latitude)
    pub const KM_PER_DEGREE: f64 = 111.32;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim reverse geocoding endpoint
    pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

    /// User agent sent to geocoding providers
    pub const USER_AGENT: &str = concat!("geotrust/", env!("CARGO_PKG_VERSION"));
}

/// Cache settings
pub mod cache {
    /// Decimal places kept when bucketing coordinates for the geocoding cache (~11 m)
    pub const KEY_PRECISION: i32 = 4;
}
