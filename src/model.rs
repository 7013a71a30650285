//! Core data types for the air-quality monitoring service.
//!
//! Shared domain model imported by all other modules: measurements,
//! severity levels, breakpoint tables and the error types. No I/O here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Measurement types
// ---------------------------------------------------------------------------

/// One observation of a pollutant at a location, as handed over by a data
/// source. Used once per batch and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub species: String,
    pub value: f64,
    pub unit: String,
    /// ISO 8601, e.g. "2024-05-01T12:00:00+00:00". OpenAQ reports this as
    /// `lastUpdated`; hand-supplied batches usually leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
}

impl RawMeasurement {
    pub fn new(species: &str, value: f64, unit: &str) -> Self {
        Self {
            species: species.to_string(),
            value,
            unit: unit.to_string(),
            observed_at: None,
        }
    }

    pub fn observed_at(mut self, datetime: &str) -> Self {
        self.observed_at = Some(datetime.to_string());
        self
    }
}

/// All valid observations of one species averaged together.
///
/// Produced by `analysis::normalize`. `species` is the canonical
/// (lower-cased) key; `unit` comes from the first valid observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReading {
    pub species: String,
    pub averaged_value: f64,
    pub unit: String,
    pub sample_count: usize,
}

/// A normalized reading with its health level attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReading {
    pub species: String,
    pub display_name: String,
    pub icon: String,
    pub averaged_value: f64,
    pub level: Level,
    pub unit: String,
}

impl ClassifiedReading {
    /// Averaged value rounded to one decimal place for display.
    /// Classification always uses the unrounded `averaged_value`.
    pub fn display_value(&self) -> f64 {
        (self.averaged_value * 10.0).round() / 10.0
    }
}

// ---------------------------------------------------------------------------
// Severity levels
// ---------------------------------------------------------------------------

/// Health level categories, in ascending order of severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Good,
    Moderate,
    Unhealthy,
    Hazardous,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Good,
        Level::Moderate,
        Level::Unhealthy,
        Level::Hazardous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Good => "good",
            Level::Moderate => "moderate",
            Level::Unhealthy => "unhealthy",
            Level::Hazardous => "hazardous",
        }
    }

    /// Representative AQI score for the level.
    pub fn aqi_score(self) -> u32 {
        match self {
            Level::Good => 25,
            Level::Moderate => 60,
            Level::Unhealthy => 120,
            Level::Hazardous => 180,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// Concentration breakpoints for one pollutant species, in the species'
/// reporting unit.
///
/// Ascending order:
///   good_max <= moderate_max <= unhealthy_max <= hazardous_ref
///
/// `hazardous_ref` is kept with the table but is not a decision boundary:
/// anything above `unhealthy_max` is hazardous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    pub good_max: f64,
    pub moderate_max: f64,
    pub unhealthy_max: f64,
    pub hazardous_ref: f64,
}

impl Breakpoints {
    pub const fn new(table: [f64; 4]) -> Self {
        Self {
            good_max: table[0],
            moderate_max: table[1],
            unhealthy_max: table[2],
            hazardous_ref: table[3],
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.good_max,
            self.moderate_max,
            self.unhealthy_max,
            self.hazardous_ref,
        ]
    }

    /// Checks that all four values are finite, non-negative and ascending.
    pub fn validate(&self) -> Result<(), String> {
        let table = self.as_array();
        if table.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(format!(
                "breakpoints must be finite and non-negative, got {:?}",
                table
            ));
        }
        if table.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!("breakpoints must be ascending, got {:?}", table));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the classification pipeline itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AirQualityError {
    /// Negative or non-finite concentration. Recovered by excluding the
    /// entry from its batch.
    #[error("Invalid measurement for {species}: {value}")]
    InvalidMeasurement { species: String, value: f64 },
    /// No valid readings left to aggregate.
    #[error("No valid readings in batch")]
    EmptyBatch,
}

/// Errors that can arise when fetching or parsing OpenAQ data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpenAqError {
    /// Non-2xx HTTP response from the OpenAQ API.
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The request never produced a response (timeout, DNS, TLS...).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}
