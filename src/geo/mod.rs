//! Reverse geocoding
//!
//! [`GeocodingClient`] turns a coordinate into an address through a
//! [`ReverseGeocoder`] backend, behind a [`GeocodeCache`]. Failures never
//! escape as errors: they come back as a `GeocodingResult` with
//! `success = false` and an error message.

pub mod cache;
pub mod nominatim;

use crate::config::GeocodingConfig;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use cache::{CacheKey, CacheStats, GeocodeCache};
use nominatim::NominatimBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of a reverse geocoding call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodingStatus {
    Ok,
    Failed,
    /// Geocoding is switched off in configuration
    Disabled,
}

/// An address resolved from a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub coordinate: Coordinate,
    pub success: bool,
    pub status: GeocodingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hamlet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
}

impl GeocodingResult {
    fn empty(coordinate: Coordinate, status: GeocodingStatus) -> Self {
        Self {
            coordinate,
            success: status == GeocodingStatus::Ok,
            status,
            error_message: None,
            display_name: None,
            formatted_address: None,
            country: None,
            state: None,
            county: None,
            city: None,
            town: None,
            village: None,
            hamlet: None,
            suburb: None,
            road: None,
            house_number: None,
            postcode: None,
            place_type: None,
            place_class: None,
            importance: None,
        }
    }

    pub fn failure(coordinate: Coordinate, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::empty(coordinate, GeocodingStatus::Failed)
        }
    }

    pub fn disabled(coordinate: Coordinate) -> Self {
        Self {
            error_message: Some("Reverse geocoding is disabled".to_string()),
            ..Self::empty(coordinate, GeocodingStatus::Disabled)
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.status == GeocodingStatus::Disabled
    }
}

/// Raw provider access for reverse lookups
pub trait ReverseGeocoder: Send + Sync {
    /// Backend name for logs and status output
    fn name(&self) -> &'static str;

    /// Fetch the provider's JSON body for a coordinate
    fn fetch(&self, coordinate: Coordinate) -> impl std::future::Future<Output = Result<Value>> + Send;
}

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn number(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Join address parts: house number + road, locality, county, state, country.
///
/// Locality is the first of city, town, village, hamlet. Falls back to the
/// display name when every part is missing.
pub fn format_address(result: &GeocodingResult) -> Option<String> {
    let street = match (&result.house_number, &result.road) {
        (Some(number), Some(road)) => Some(format!("{} {}", number, road)),
        (None, Some(road)) => Some(road.clone()),
        (Some(number), None) => Some(number.clone()),
        (None, None) => None,
    };
    let locality = result
        .city
        .as_ref()
        .or(result.town.as_ref())
        .or(result.village.as_ref())
        .or(result.hamlet.as_ref())
        .cloned();

    let parts: Vec<String> = [
        street,
        locality,
        result.county.clone(),
        result.state.clone(),
        result.country.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        result.display_name.clone()
    } else {
        Some(parts.join(", "))
    }
}

/// Parse a provider body (object, or array whose first element is used)
pub fn parse_response(coordinate: Coordinate, body: &Value) -> Result<GeocodingResult> {
    let place = match body {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| Error::Geocoding("Provider returned no results".to_string()))?,
        other => other,
    };

    if !place.is_object() {
        return Err(Error::Geocoding(format!(
            "Unexpected provider response: {}",
            place
        )));
    }
    if let Some(message) = text(place, "error") {
        return Err(Error::Geocoding(message));
    }

    let empty = Value::Null;
    let address = place.get("address").unwrap_or(&empty);

    let mut result = GeocodingResult {
        display_name: text(place, "display_name"),
        country: text(address, "country"),
        state: text(address, "state"),
        county: text(address, "county"),
        city: text(address, "city"),
        town: text(address, "town"),
        village: text(address, "village"),
        hamlet: text(address, "hamlet"),
        suburb: text(address, "suburb"),
        road: text(address, "road"),
        house_number: text(address, "house_number"),
        postcode: text(address, "postcode"),
        place_type: text(place, "type"),
        place_class: text(place, "class"),
        importance: number(place, "importance"),
        ..GeocodingResult::empty(coordinate, GeocodingStatus::Ok)
    };
    result.formatted_address = format_address(&result);
    Ok(result)
}

/// Cached reverse geocoding
#[derive(Debug)]
pub struct GeocodingClient<B = NominatimBackend> {
    backend: B,
    cache: GeocodeCache,
    enabled: bool,
}

impl GeocodingClient<NominatimBackend> {
    /// Build a Nominatim-backed client from settings
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let cache = if config.cache_enabled {
            GeocodeCache::new(config.cache_capacity)
        } else {
            GeocodeCache::disabled(config.cache_capacity)
        };
        Ok(Self::new(NominatimBackend::from_config(config)?, cache, config.enabled))
    }
}

impl<B: ReverseGeocoder> GeocodingClient<B> {
    pub fn new(backend: B, cache: GeocodeCache, enabled: bool) -> Self {
        Self {
            backend,
            cache,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve a coordinate to an address. Never fails; see [`GeocodingResult::success`].
    pub async fn reverse_geocode(&self, coordinate: Coordinate) -> GeocodingResult {
        if !self.enabled {
            return GeocodingResult::disabled(coordinate);
        }

        let Some(key) = CacheKey::from_coordinate(coordinate) else {
            warn!(%coordinate, "refusing to geocode a non-finite coordinate");
            return GeocodingResult::failure(coordinate, "Coordinate is not finite");
        };
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "geocoding cache hit");
            return hit;
        }
        debug!(%key, backend = self.backend.name(), "geocoding cache miss");

        let outcome = match self.backend.fetch(coordinate).await {
            Ok(body) => parse_response(coordinate, &body),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                self.cache.put(key, result.clone());
                result
            }
            Err(e) => {
                warn!(%coordinate, error = %e, "reverse geocoding failed");
                GeocodingResult::failure(coordinate, e.to_string())
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that replays a fixed body and counts calls
    pub(crate) struct StubBackend {
        pub calls: AtomicUsize,
        body: Option<Value>,
    }

    impl StubBackend {
        pub fn returning(body: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body: Some(body),
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body: None,
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ReverseGeocoder for StubBackend {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _coordinate: Coordinate) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| Error::Geocoding("connection refused".to_string()))
        }
    }

    pub(crate) fn abidjan_body() -> Value {
        json!({
            "display_name": "Boulevard de la Republique, Plateau, Abidjan, Cote d'Ivoire",
            "type": "road",
            "class": "highway",
            "importance": 0.42,
            "address": {
                "house_number": "12",
                "road": "Boulevard de la Republique",
                "suburb": "Plateau",
                "city": "Abidjan",
                "county": "Abidjan",
                "state": "District Autonome d'Abidjan",
                "country": "Cote d'Ivoire",
                "postcode": "01"
            }
        })
    }

    fn client(backend: StubBackend) -> GeocodingClient<StubBackend> {
        GeocodingClient::new(backend, GeocodeCache::new(10), true)
    }

    #[test]
    fn test_parse_object() {
        let c = Coordinate::new(5.32, -4.02);
        let result = parse_response(c, &abidjan_body()).unwrap();

        assert!(result.success);
        assert_eq!(result.status, GeocodingStatus::Ok);
        assert_eq!(result.city.as_deref(), Some("Abidjan"));
        assert_eq!(result.place_type.as_deref(), Some("road"));
        assert_eq!(result.place_class.as_deref(), Some("highway"));
        assert_eq!(result.importance, Some(0.42));
        assert_eq!(
            result.formatted_address.as_deref(),
            Some("12 Boulevard de la Republique, Abidjan, Abidjan, District Autonome d'Abidjan, Cote d'Ivoire")
        );
    }

    #[test]
    fn test_parse_array_uses_first() {
        let body = json!([
            { "display_name": "first", "address": { "village": "Kong" } },
            { "display_name": "second" }
        ]);
        let result = parse_response(Coordinate::new(9.15, -4.61), &body).unwrap();

        assert_eq!(result.display_name.as_deref(), Some("first"));
        assert_eq!(result.formatted_address.as_deref(), Some("Kong"));
    }

    #[test]
    fn test_locality_precedence() {
        let body = json!({ "address": { "town": "Man", "village": "Gbepleu", "country": "CI" } });
        let result = parse_response(Coordinate::new(7.4, -7.55), &body).unwrap();
        assert_eq!(result.formatted_address.as_deref(), Some("Man, CI"));
    }

    #[test]
    fn test_falls_back_to_display_name() {
        let body = json!({ "display_name": "Somewhere", "address": {} });
        let result = parse_response(Coordinate::new(7.0, -5.0), &body).unwrap();
        assert_eq!(result.formatted_address.as_deref(), Some("Somewhere"));
    }

    #[test]
    fn test_parse_errors() {
        let c = Coordinate::new(4.4, -5.0);
        assert!(parse_response(c, &json!([])).is_err());
        assert!(parse_response(c, &json!("nope")).is_err());
        let err = parse_response(c, &json!({ "error": "Unable to geocode" })).unwrap_err();
        assert!(err.to_string().contains("Unable to geocode"));
    }

    #[test]
    fn test_importance_as_string() {
        let body = json!({ "display_name": "x", "importance": "0.25" });
        let result = parse_response(Coordinate::new(7.0, -5.0), &body).unwrap();
        assert_eq!(result.importance, Some(0.25));
    }

    #[tokio::test]
    async fn test_same_bucket_hits_cache() {
        let client = client(StubBackend::returning(abidjan_body()));

        let first = client.reverse_geocode(Coordinate::new(5.32001, -4.02001)).await;
        let second = client.reverse_geocode(Coordinate::new(5.32003, -4.01998)).await;

        assert_eq!(client.backend().calls(), 1);
        assert_eq!(first, second);
        assert_eq!(client.cache_stats().size, 1);
    }

    #[tokio::test]
    async fn test_different_bucket_misses() {
        let client = client(StubBackend::returning(abidjan_body()));

        client.reverse_geocode(Coordinate::new(5.3200, -4.0200)).await;
        client.reverse_geocode(Coordinate::new(5.3210, -4.0200)).await;

        assert_eq!(client.backend().calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_data_and_not_cached() {
        let client = client(StubBackend::failing());

        let result = client.reverse_geocode(Coordinate::new(5.32, -4.02)).await;
        assert!(!result.success);
        assert_eq!(result.status, GeocodingStatus::Failed);
        assert!(result.error_message.unwrap().contains("connection refused"));

        client.reverse_geocode(Coordinate::new(5.32, -4.02)).await;
        assert_eq!(client.backend().calls(), 2);
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_provider_error_body_is_failure() {
        let client = client(StubBackend::returning(json!({ "error": "Unable to geocode" })));
        let result = client.reverse_geocode(Coordinate::new(4.4, -5.0)).await;

        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("Geocoding error: Unable to geocode"));
    }

    #[tokio::test]
    async fn test_disabled_short_circuits() {
        let client = GeocodingClient::new(StubBackend::returning(abidjan_body()), GeocodeCache::new(10), false);
        let result = client.reverse_geocode(Coordinate::new(5.32, -4.02)).await;

        assert!(result.is_disabled());
        assert!(!result.success);
        assert_eq!(client.backend().calls(), 0);
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let client = client(StubBackend::returning(abidjan_body()));
        let c = Coordinate::new(5.32, -4.02);

        client.reverse_geocode(c).await;
        client.clear_cache();
        client.reverse_geocode(c).await;

        assert_eq!(client.backend().calls(), 2);
    }

    #[tokio::test]
    async fn test_non_finite_never_touches_null_island_bucket() {
        let client = client(StubBackend::returning(abidjan_body()));

        let nan = client.reverse_geocode(Coordinate::new(f64::NAN, f64::NAN)).await;
        assert!(!nan.success);
        assert_eq!(nan.status, GeocodingStatus::Failed);
        assert_eq!(client.backend().calls(), 0);
        assert_eq!(client.cache_stats().size, 0);

        let zero = client.reverse_geocode(Coordinate::new(0.0, 0.0)).await;
        assert!(zero.success);
        assert_eq!(zero.coordinate, Coordinate::new(0.0, 0.0));
        assert_eq!(client.backend().calls(), 1);
    }

    #[test]
    fn test_disabled_cache_reports_configured_capacity() {
        let config = GeocodingConfig {
            cache_enabled: false,
            cache_capacity: 250,
            ..GeocodingConfig::default()
        };
        let client = GeocodingClient::from_config(&config).unwrap();

        assert_eq!(client.cache_stats(), CacheStats { size: 0, max_size: 250, enabled: false });
    }

    #[tokio::test]
    async fn test_eviction_through_client() {
        let client = GeocodingClient::new(StubBackend::returning(abidjan_body()), GeocodeCache::new(2), true);
        for i in 0..3 {
            client.reverse_geocode(Coordinate::new(5.0 + i as f64 * 0.01, -4.0)).await;
        }
        assert_eq!(client.cache_stats(), CacheStats { size: 2, max_size: 2, enabled: true });
    }
}
