//! OpenAQ Data API Client
//!
//! Retrieves the latest pollutant measurements from every monitoring
//! location within a radius of a point.
//!
//! API Documentation: https://docs.openaq.org/
//! Latest values: https://api.openaq.org/v2/latest

use crate::config::OpenAqSettings;
use crate::logging::{self, Component};
use crate::model::{OpenAqError, RawMeasurement};
use serde::Deserialize;
use std::time::Duration;

pub const OPENAQ_BASE_URL: &str = "https://api.openaq.org";

/// 25 km around the requested point.
pub const DEFAULT_RADIUS_M: u32 = 25_000;

pub const DEFAULT_LIMIT: u32 = 100;

// ============================================================================
// OpenAQ API Response Structures
// ============================================================================

/// `/v2/latest` response. Error payloads from proxies carry an empty or
/// missing `results` array.
#[derive(Debug, Deserialize)]
pub struct LatestResponse {
    #[serde(default)]
    pub results: Vec<LatestLocation>,
}

/// One monitoring location and its most recent value per parameter.
#[derive(Debug, Deserialize)]
pub struct LatestLocation {
    pub location: Option<String>,
    #[serde(default)]
    pub measurements: Vec<LatestMeasurement>,
}

#[derive(Debug, Deserialize)]
pub struct LatestMeasurement {
    pub parameter: String,
    /// Null when the monitor reported no value.
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

// ============================================================================
// Request construction
// ============================================================================

/// Builds the `latest` URL for all locations within `radius_m` of a point.
pub fn build_latest_url(base_url: &str, lat: f64, lng: f64, radius_m: u32, limit: u32) -> String {
    format!(
        "{}/v2/latest?coordinates={},{}&radius={}&limit={}",
        base_url.trim_end_matches('/'),
        lat,
        lng,
        radius_m,
        limit
    )
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), OpenAqError> {
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    if valid {
        Ok(())
    } else {
        Err(OpenAqError::InvalidCoordinates { lat, lng })
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Flattens a `latest` payload into raw measurements, one per
/// location/parameter pair. Null values are skipped; everything else is
/// passed through unfiltered for the normalizer to judge.
pub fn parse_latest_response(body: &str) -> Result<Vec<RawMeasurement>, OpenAqError> {
    let response: LatestResponse =
        serde_json::from_str(body).map_err(|e| OpenAqError::ParseError(e.to_string()))?;

    Ok(response
        .results
        .into_iter()
        .flat_map(|location| location.measurements)
        .filter_map(|m| {
            let value = m.value?;
            Some(RawMeasurement {
                species: m.parameter,
                value,
                unit: m.unit,
                observed_at: m.last_updated,
            })
        })
        .collect())
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch the latest measurements around a point
///
/// # Parameters
/// - `client`: HTTP client
/// - `settings`: endpoint, radius, limit, timeout and API key
/// - `lat`, `lng`: WGS84 coordinates
pub fn fetch_latest(
    client: &reqwest::blocking::Client,
    settings: &OpenAqSettings,
    lat: f64,
    lng: f64,
) -> Result<Vec<RawMeasurement>, OpenAqError> {
    validate_coordinates(lat, lng)?;

    let url = build_latest_url(&settings.base_url, lat, lng, settings.radius_m, settings.limit);

    let mut request = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(settings.timeout_secs));
    if let Some(key) = &settings.api_key {
        request = request.header("X-API-Key", key);
    }

    let response = request
        .send()
        .map_err(|e| OpenAqError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(OpenAqError::HttpError(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| OpenAqError::RequestFailed(e.to_string()))?;
    parse_latest_response(&body)
}

/// As [`fetch_latest`], but any failure is logged and becomes an empty
/// batch. `label` names the location in log output.
pub fn fetch_or_empty(
    client: &reqwest::blocking::Client,
    settings: &OpenAqSettings,
    label: &str,
    lat: f64,
    lng: f64,
) -> Vec<RawMeasurement> {
    match fetch_latest(client, settings, lat, lng) {
        Ok(measurements) => {
            logging::debug(
                Component::OpenAq,
                Some(label),
                &format!("Fetched {} measurements", measurements.len()),
            );
            measurements
        }
        Err(e) => {
            logging::log_fetch_failure(Component::OpenAq, label, "Fetch latest", &e);
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
