//! Nominatim reverse geocoding backend (OpenStreetMap)
//!
//! Uses the Nominatim `/reverse` API. The public instance allows 1 request
//! per second and asks for a contact email and identifying User-Agent.

use crate::config::GeocodingConfig;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::ReverseGeocoder;
use std::time::Duration;

/// Nominatim reverse geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    endpoint: String,
    contact_email: String,
    accept_language: String,
}

impl NominatimBackend {
    /// Create a backend from geocoding settings
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            contact_email: config.contact_email.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    /// Build the reverse lookup URL for a coordinate
    fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}?lat={}&lon={}&format=json&addressdetails=1&accept-language={}&zoom=18&email={}",
            self.endpoint,
            coordinate.lat,
            coordinate.lng,
            urlencoding::encode(&self.accept_language),
            urlencoding::encode(&self.contact_email)
        )
    }
}

impl ReverseGeocoder for NominatimBackend {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<serde_json::Value> {
        let url = self.reverse_url(coordinate);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))
    }
}
