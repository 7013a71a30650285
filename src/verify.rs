//! Data Source Verification Module
//!
//! Checks registry locations against the live OpenAQ API to find out which
//! of them actually return measurements, and which priority pollutants
//! are covered there.

use crate::config::OpenAqSettings;
use crate::ingest::openaq;
use crate::locations::Location;
use crate::species::{canonical_key, PRIORITY_SPECIES};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<LocationVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub partial: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationVerification {
    pub name: String,
    pub status: VerificationStatus,
    pub api_responsive: bool,
    pub measurement_count: usize,
    pub species_available: Vec<String>,
    pub priority_missing: Vec<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Location Verification
// ============================================================================

/// Fills in species coverage and status from a fetched batch.
fn assess(result: &mut LocationVerification, species: &[String]) {
    for s in species {
        let key = canonical_key(s);
        if !result.species_available.contains(&key) {
            result.species_available.push(key);
        }
    }

    result.priority_missing = PRIORITY_SPECIES
        .iter()
        .filter(|p| !result.species_available.iter().any(|s| s == *p))
        .map(|p| p.to_string())
        .collect();

    if result.measurement_count > 0 {
        if result.priority_missing.is_empty() {
            result.status = VerificationStatus::Success;
        } else {
            result.status = VerificationStatus::PartialSuccess;
        }
    }
}

pub fn verify_location(
    client: &reqwest::blocking::Client,
    settings: &OpenAqSettings,
    location: &Location,
) -> LocationVerification {
    let mut result = LocationVerification {
        name: location.name.to_string(),
        status: VerificationStatus::Failed,
        api_responsive: false,
        measurement_count: 0,
        species_available: Vec::new(),
        priority_missing: Vec::new(),
        error_message: None,
    };

    match openaq::fetch_latest(client, settings, location.latitude, location.longitude) {
        Ok(measurements) => {
            result.api_responsive = true;
            result.measurement_count = measurements.len();
            let species: Vec<String> = measurements.into_iter().map(|m| m.species).collect();
            assess(&mut result, &species);
            if result.measurement_count == 0 {
                result.error_message = Some("No measurements within search radius".to_string());
            }
        }
        Err(e) => {
            result.error_message = Some(format!("API request failed: {}", e));
        }
    }

    result
}

pub fn summarize(results: &[LocationVerification]) -> VerificationSummary {
    let count = |status: VerificationStatus| results.iter().filter(|r| r.status == status).count();
    VerificationSummary {
        total: results.len(),
        working: count(VerificationStatus::Success),
        partial: count(VerificationStatus::PartialSuccess),
        failed: count(VerificationStatus::Failed),
    }
}

pub fn verify_all(
    client: &reqwest::blocking::Client,
    settings: &OpenAqSettings,
    locations: &[&Location],
) -> VerificationReport {
    let results: Vec<LocationVerification> = locations
        .iter()
        .map(|l| verify_location(client, settings, l))
        .collect();

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        summary: summarize(&results),
        results,
    }
}
