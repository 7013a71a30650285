//! Overall severity for a batch of classified readings.

use crate::model::{AirQualityError, ClassifiedReading, Level};
use serde::Serialize;

/// Level assumed when a batch has no valid readings at all.
pub const DEFAULT_SEVERITY: Level = Level::Moderate;

/// Worst level among `readings`.
///
/// A plain maximum, so input order and duplicates do not matter. An empty
/// batch has no severity and yields `EmptyBatch`.
pub fn aggregate(readings: &[ClassifiedReading]) -> Result<Level, AirQualityError> {
    readings
        .iter()
        .map(|r| r.level)
        .max()
        .ok_or(AirQualityError::EmptyBatch)
}

/// As [`aggregate`], with `EmptyBatch` resolved to [`DEFAULT_SEVERITY`].
pub fn aggregate_or_default(readings: &[ClassifiedReading]) -> Level {
    aggregate(readings).unwrap_or(DEFAULT_SEVERITY)
}

/// AQI score of the overall level.
pub fn overall_aqi_score(readings: &[ClassifiedReading]) -> Result<u32, AirQualityError> {
    aggregate(readings).map(Level::aqi_score)
}

// ---------------------------------------------------------------------------
// Health advisories
// ---------------------------------------------------------------------------

/// Public-health guidance attached to an overall level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAdvisory {
    pub level: Level,
    pub message: &'static str,
    pub recommendations: &'static [&'static str],
}

pub fn advisory_for(level: Level) -> HealthAdvisory {
    match level {
        Level::Good => HealthAdvisory {
            level,
            message: "Air quality is satisfactory. Enjoy outdoor activities!",
            recommendations: &[
                "Perfect conditions for all outdoor activities",
                "No health concerns for any population groups",
                "Great time for exercise and recreation",
            ],
        },
        Level::Moderate => HealthAdvisory {
            level,
            message: "Air quality is acceptable. Sensitive individuals should limit prolonged outdoor exertion.",
            recommendations: &[
                "Sensitive groups should reduce prolonged outdoor activities",
                "Monitor symptoms if you have respiratory conditions",
                "Generally safe for most people",
            ],
        },
        Level::Unhealthy => HealthAdvisory {
            level,
            message: "Air quality is unhealthy. Everyone should reduce outdoor activities.",
            recommendations: &[
                "Limit outdoor activities, especially for children and elderly",
                "Use N95 masks if going outside",
                "Keep windows closed, use air purifiers indoors",
                "Monitor respiratory symptoms closely",
            ],
        },
        Level::Hazardous => HealthAdvisory {
            level,
            message: "Air quality is hazardous. Avoid all outdoor activities.",
            recommendations: &[
                "Stay indoors and keep windows closed",
                "Use high-efficiency air purifiers",
                "Wear N95/N99 masks if you must go outside",
                "Seek medical attention if experiencing symptoms",
                "Vulnerable groups should relocate if possible",
            ],
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
