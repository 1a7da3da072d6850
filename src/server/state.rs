//! Server shared state
//!
//! Holds configuration, the analysis engine and the geocoding client.

use crate::analysis::RegionAnalysisOrchestrator;
use crate::config::Config;
use crate::error::Result;
use crate::geo::GeocodingClient;
use crate::store::Dataset;
use std::sync::Arc;
use tracing::info;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Region analysis and per-point validation
    pub engine: RegionAnalysisOrchestrator,

    /// Cached reverse geocoding
    pub geocoder: GeocodingClient,

    dataset: Arc<Dataset>,
}

impl AppState {
    /// Create application state, loading the dataset named in the config
    pub fn new(config: Config) -> Result<Self> {
        let dataset = match &config.data.path {
            Some(path) => {
                let dataset = Dataset::load(path)?;
                info!(
                    path = %path.display(),
                    regions = dataset.regions().len(),
                    points = dataset.points().len(),
                    "loaded dataset"
                );
                dataset
            }
            None => Dataset::default(),
        };
        Self::with_dataset(config, dataset)
    }

    /// Create application state over an explicit dataset
    pub fn with_dataset(config: Config, dataset: Dataset) -> Result<Self> {
        let dataset = Arc::new(dataset);
        let engine = RegionAnalysisOrchestrator::new(
            &config.validation,
            &config.analysis,
            dataset.clone(),
            dataset.clone(),
        );
        let geocoder = GeocodingClient::from_config(&config.geocoding)?;

        Ok(Self {
            config,
            engine,
            geocoder,
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}
