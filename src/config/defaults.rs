//! Default configuration values
//!
//! Named constants for all tunable parameters. The country profile is
//! Côte d'Ivoire.

/// Country bounding box: min latitude
pub const DEFAULT_COUNTRY_MIN_LAT: f64 = 4.35;
/// Country bounding box: max latitude
pub const DEFAULT_COUNTRY_MAX_LAT: f64 = 10.74;
/// Country bounding box: min longitude
pub const DEFAULT_COUNTRY_MIN_LNG: f64 = -8.60;
/// Country bounding box: max longitude
pub const DEFAULT_COUNTRY_MAX_LNG: f64 = -2.49;

/// Inclusive upper bounds (meters) for Excellent, Good, Fair and Poor accuracy
pub const DEFAULT_ACCURACY_THRESHOLDS: [f64; 4] = [10.0, 25.0, 50.0, 100.0];

/// Max distance from a region centroid before a coordinate is inconsistent
pub const DEFAULT_REGION_CONSISTENCY_THRESHOLD_METERS: f64 = 50_000.0;

/// Default spatial cluster radius in meters
pub const DEFAULT_CLUSTER_RADIUS_METERS: f64 = 1000.0;

/// Default nearby search radius in kilometers
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Default maximum nearby results
pub const DEFAULT_NEARBY_MAX_RESULTS: usize = 10;

/// Point count above which O(n²) pairwise work is logged as a warning
pub const DEFAULT_PAIRWISE_WARNING_THRESHOLD: usize = 5_000;

/// Default reverse geocoding request timeout in seconds
pub const DEFAULT_GEOCODING_TIMEOUT_SECS: u64 = 10;

/// Default reverse geocoding language
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "fr";

/// Default geocoding cache capacity (entries)
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7880;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geotrust";
