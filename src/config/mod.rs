//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geotrust/config.toml

pub mod defaults;

use crate::analysis::cluster::ClusterStrategy;
use crate::constants::api::{NOMINATIM_REVERSE_URL, USER_AGENT};
use crate::coord::BoundingBox;
use crate::error::{Error, Result};
use crate::validate::bounds::ImplausibleZone;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coordinate validation heuristics
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Region analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Region and price point data
    #[serde(default)]
    pub data: DataConfig,
}

/// Coordinate validation heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accuracy tier upper bounds in meters
    #[serde(default = "default_accuracy_thresholds")]
    pub accuracy_thresholds: [f64; 4],

    /// Max distance from a region centroid in meters
    #[serde(default = "default_region_threshold")]
    pub region_consistency_threshold_meters: f64,

    /// Hard country rectangle
    #[serde(default = "default_country_bounds")]
    pub country_bounds: BoundingBox,

    /// Rectangles where observations are unlikely (ocean, protected areas)
    #[serde(default = "default_implausible_zones")]
    pub implausible_zones: Vec<ImplausibleZone>,
}

/// Region analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Cluster radius in meters
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius_meters: f64,

    /// Cluster algorithm
    #[serde(default)]
    pub cluster_strategy: ClusterStrategy,

    /// Default nearby search radius in kilometers
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_km: f64,

    /// Default nearby result limit
    #[serde(default = "default_nearby_max_results")]
    pub nearby_max_results: usize,

    /// Log a warning when pairwise work exceeds this many points
    #[serde(default = "default_pairwise_warning_threshold")]
    pub pairwise_warning_threshold: usize,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Administrative switch; when false every lookup returns a disabled result
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Reverse geocoding endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Contact email sent with every request (provider usage policy)
    #[serde(default)]
    pub contact_email: String,

    /// Preferred response language
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// HTTP user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Whether results are cached
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Max cached entries
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Region and price point data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON dataset path; an empty dataset is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}
fn default_country_bounds() -> BoundingBox {
    BoundingBox::new(
        DEFAULT_COUNTRY_MIN_LAT,
        DEFAULT_COUNTRY_MAX_LAT,
        DEFAULT_COUNTRY_MIN_LNG,
        DEFAULT_COUNTRY_MAX_LNG,
    )
}
fn default_implausible_zones() -> Vec<ImplausibleZone> {
    vec![
        ImplausibleZone {
            name: "gulf_of_guinea".to_string(),
            reason: "Coordinate lies in the Gulf of Guinea (ocean)".to_string(),
            bounds: BoundingBox::new(4.35, 4.60, -7.50, -2.49),
        },
        ImplausibleZone {
            name: "comoe_park".to_string(),
            reason: "Coordinate lies in Comoe National Park (uninhabited)".to_string(),
            bounds: BoundingBox::new(8.50, 9.60, -4.40, -3.10),
        },
    ]
}
fn default_accuracy_thresholds() -> [f64; 4] {
    DEFAULT_ACCURACY_THRESHOLDS
}
fn default_region_threshold() -> f64 {
    DEFAULT_REGION_CONSISTENCY_THRESHOLD_METERS
}
fn default_cluster_radius() -> f64 {
    DEFAULT_CLUSTER_RADIUS_METERS
}
fn default_nearby_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS_KM
}
fn default_nearby_max_results() -> usize {
    DEFAULT_NEARBY_MAX_RESULTS
}
fn default_pairwise_warning_threshold() -> usize {
    DEFAULT_PAIRWISE_WARNING_THRESHOLD
}
fn default_endpoint() -> String {
    NOMINATIM_REVERSE_URL.to_string()
}
fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_GEOCODING_TIMEOUT_SECS
}
fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            country_bounds: default_country_bounds(),
            implausible_zones: default_implausible_zones(),
            accuracy_thresholds: default_accuracy_thresholds(),
            region_consistency_threshold_meters: default_region_threshold(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cluster_radius_meters: default_cluster_radius(),
            cluster_strategy: ClusterStrategy::default(),
            nearby_radius_km: default_nearby_radius(),
            nearby_max_results: default_nearby_max_results(),
            pairwise_warning_threshold: default_pairwise_warning_threshold(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            contact_email: String::new(),
            accept_language: default_accept_language(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            cache_enabled: true,
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ValidationConfig {
    /// Reject inverted rectangles and non-increasing accuracy thresholds
    pub fn check(&self) -> Result<()> {
        self.country_bounds.validate()?;
        for zone in &self.implausible_zones {
            zone.bounds.validate()?;
        }
        check_thresholds(&self.accuracy_thresholds)?;
        check_positive(
            self.region_consistency_threshold_meters,
            "region_consistency_threshold_meters",
        )
    }
}

impl AnalysisConfig {
    /// Reject non-positive radii
    pub fn check(&self) -> Result<()> {
        check_positive(self.cluster_radius_meters, "cluster_radius_meters")?;
        check_positive(self.nearby_radius_km, "nearby_radius_km")
    }
}

fn check_positive(value: f64, name: &str) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
    }
    Ok(())
}

fn check_thresholds(thresholds: &[f64; 4]) -> Result<()> {
    let increasing = thresholds.windows(2).all(|w| w[0] < w[1]);
    if thresholds[0] <= 0.0 || !increasing || thresholds.iter().any(|t| !t.is_finite()) {
        return Err(Error::Config(format!(
            "Accuracy thresholds must be positive and strictly increasing: {:?}",
            thresholds
        )));
    }
    Ok(())
}

fn parse_thresholds(value: &str) -> Result<[f64; 4]> {
    let parsed: Vec<f64> = value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::Config(format!("Invalid thresholds value: {}", value)))?;

    let thresholds: [f64; 4] = parsed.try_into().map_err(|_| {
        Error::Config(format!("Expected 4 accuracy thresholds, got: {}", value))
    })?;
    check_thresholds(&thresholds)?;
    Ok(thresholds)
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config file: {}", e))
        })?;
        config.validation.check()?;
        config.analysis.check()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["validation", "accuracy_thresholds"] => {
                Some(format!("{:?}", self.validation.accuracy_thresholds))
            }
            ["validation", "region_consistency_threshold_meters"] => {
                Some(self.validation.region_consistency_threshold_meters.to_string())
            }

            ["analysis", "cluster_radius_meters"] => {
                Some(self.analysis.cluster_radius_meters.to_string())
            }
            ["analysis", "cluster_strategy"] => Some(self.analysis.cluster_strategy.to_string()),
            ["analysis", "nearby_radius_km"] => Some(self.analysis.nearby_radius_km.to_string()),
            ["analysis", "nearby_max_results"] => {
                Some(self.analysis.nearby_max_results.to_string())
            }
            ["analysis", "pairwise_warning_threshold"] => {
                Some(self.analysis.pairwise_warning_threshold.to_string())
            }

            ["geocoding", "enabled"] => Some(self.geocoding.enabled.to_string()),
            ["geocoding", "endpoint"] => Some(self.geocoding.endpoint.clone()),
            ["geocoding", "contact_email"] => Some(self.geocoding.contact_email.clone()),
            ["geocoding", "accept_language"] => Some(self.geocoding.accept_language.clone()),
            ["geocoding", "user_agent"] => Some(self.geocoding.user_agent.clone()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),
            ["geocoding", "cache_enabled"] => Some(self.geocoding.cache_enabled.to_string()),
            ["geocoding", "cache_capacity"] => Some(self.geocoding.cache_capacity.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["data", "path"] => Some(
                self.data
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["validation", "accuracy_thresholds"] => {
                self.validation.accuracy_thresholds = parse_thresholds(value)?;
            }
            ["validation", "region_consistency_threshold_meters"] => {
                let threshold: f64 = parse_value(value, "threshold")?;
                check_positive(threshold, key)?;
                self.validation.region_consistency_threshold_meters = threshold;
            }

            ["analysis", "cluster_radius_meters"] => {
                let radius: f64 = parse_value(value, "radius")?;
                check_positive(radius, key)?;
                self.analysis.cluster_radius_meters = radius;
            }
            ["analysis", "cluster_strategy"] => {
                self.analysis.cluster_strategy = value.parse().map_err(Error::Config)?;
            }
            ["analysis", "nearby_radius_km"] => {
                let radius: f64 = parse_value(value, "radius")?;
                check_positive(radius, key)?;
                self.analysis.nearby_radius_km = radius;
            }
            ["analysis", "nearby_max_results"] => {
                self.analysis.nearby_max_results = parse_value(value, "result limit")?;
            }
            ["analysis", "pairwise_warning_threshold"] => {
                self.analysis.pairwise_warning_threshold = parse_value(value, "threshold")?;
            }

            ["geocoding", "enabled"] => {
                self.geocoding.enabled = parse_value(value, "boolean")?;
            }
            ["geocoding", "endpoint"] => {
                self.geocoding.endpoint = value.to_string();
            }
            ["geocoding", "contact_email"] => {
                self.geocoding.contact_email = value.to_string();
            }
            ["geocoding", "accept_language"] => {
                self.geocoding.accept_language = value.to_string();
            }
            ["geocoding", "user_agent"] => {
                self.geocoding.user_agent = value.to_string();
            }
            ["geocoding", "timeout_secs"] => {
                self.geocoding.timeout_secs = parse_value(value, "timeout")?;
            }
            ["geocoding", "cache_enabled"] => {
                self.geocoding.cache_enabled = parse_value(value, "boolean")?;
            }
            ["geocoding", "cache_capacity"] => {
                self.geocoding.cache_capacity = parse_value(value, "capacity")?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }

            ["data", "path"] => {
                self.data.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "validation.accuracy_thresholds",
            "validation.region_consistency_threshold_meters",
            "analysis.cluster_radius_meters",
            "analysis.cluster_strategy",
            "analysis.nearby_radius_km",
            "analysis.nearby_max_results",
            "analysis.pairwise_warning_threshold",
            "geocoding.enabled",
            "geocoding.endpoint",
            "geocoding.contact_email",
            "geocoding.accept_language",
            "geocoding.user_agent",
            "geocoding.timeout_secs",
            "geocoding.cache_enabled",
            "geocoding.cache_capacity",
            "server.host",
            "server.port",
            "data.path",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}
