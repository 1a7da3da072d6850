//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::analysis::region::{enrich_with_addresses, RegionGpsAnalysis};
use crate::analysis::{DensityStats, NearbyPoint};
use crate::coord::Coordinate;
use crate::error::Error;
use crate::geo::cache::CacheStats;
use crate::geo::GeocodingResult;
use crate::server::state::AppState;
use crate::store::GpsPoint;
use crate::validate::ValidationResult;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/validate", post(validate_handler))
        .route("/api/geocode/reverse", get(reverse_geocode_handler))
        .route("/api/geocode/cache", get(cache_stats_handler).delete(cache_clear_handler))
        .route("/api/regions/:code/analysis", get(analysis_handler))
        .route("/api/regions/:code/density", get(density_handler))
        .route("/api/nearby", post(nearby_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "REGION_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            Error::RegionNotFound(_) => "REGION_NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub geocoding_enabled: bool,
    pub geocoding_cache: CacheStats,
    pub regions: usize,
    pub points: usize,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoding_enabled: state.geocoder.is_enabled(),
        geocoding_cache: state.geocoder.cache_stats(),
        regions: state.dataset().regions().len(),
        points: state.dataset().points().len(),
    })
}

/// Validate request body
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub lat: f64,
    pub lng: f64,
    /// Reported GPS accuracy in meters
    pub accuracy: Option<f64>,
    pub region_code: Option<String>,
}

/// Validate a single coordinate
///
/// POST /api/validate
async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>, ApiError> {
    let coordinate = Coordinate::new(req.lat, req.lng);
    coordinate.validate()?;

    Ok(Json(state.engine.validator().validate(
        coordinate,
        req.accuracy,
        req.region_code.as_deref(),
    )))
}

/// Coordinate query parameters
#[derive(Debug, Deserialize)]
pub struct CoordinateQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse geocode a coordinate
///
/// GET /api/geocode/reverse?lat=..&lng=..
async fn reverse_geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoordinateQuery>,
) -> Result<Json<GeocodingResult>, ApiError> {
    let coordinate = Coordinate::new(query.lat, query.lng);
    coordinate.validate()?;

    Ok(Json(state.geocoder.reverse_geocode(coordinate).await))
}

/// Geocoding cache statistics
///
/// GET /api/geocode/cache
async fn cache_stats_handler(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.geocoder.cache_stats())
}

/// Clear the geocoding cache
///
/// DELETE /api/geocode/cache
async fn cache_clear_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.geocoder.clear_cache();
    StatusCode::NO_CONTENT
}

/// Date window query parameters
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    /// Reverse geocode the center and cluster centers
    #[serde(default)]
    pub addresses: bool,
}

/// Region GPS analysis
///
/// GET /api/regions/:code/analysis?from=YYYY-MM-DD&to=YYYY-MM-DD&addresses=true
async fn analysis_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<RegionGpsAnalysis>, ApiError> {
    let mut analysis = state.engine.analyze_region(&code, query.from, query.to)?;

    if query.addresses {
        enrich_with_addresses(&mut analysis, &state.geocoder).await;
    }

    Ok(Json(analysis))
}

/// Region density statistics
///
/// GET /api/regions/:code/density?from=YYYY-MM-DD&to=YYYY-MM-DD
async fn density_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<DensityStats>, ApiError> {
    Ok(Json(state.engine.density(&code, query.from, query.to)?))
}

/// Nearby search request body
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lng: f64,
    pub region_code: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub radius_km: Option<f64>,
    pub max_results: Option<usize>,
}

/// Price points near a coordinate
///
/// POST /api/nearby
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NearbyRequest>,
) -> Result<Json<Vec<NearbyPoint<GpsPoint>>>, ApiError> {
    let origin = Coordinate::new(req.lat, req.lng);
    origin.validate()?;

    let radius_km = req.radius_km.unwrap_or(state.config.analysis.nearby_radius_km);
    if radius_km.is_nan() || radius_km <= 0.0 {
        return Err(Error::InvalidRadius(format!("Radius must be positive, got {}", radius_km)).into());
    }
    let max_results = req.max_results.unwrap_or(state.config.analysis.nearby_max_results);

    Ok(Json(state.engine.nearby(
        &req.region_code,
        req.from,
        req.to,
        origin,
        radius_km,
        max_results,
    )?))
}
