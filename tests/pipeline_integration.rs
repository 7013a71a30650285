//! Offline integration tests for the full classification pipeline
//!
//! These tests verify:
//! 1. Recorded OpenAQ payloads parse into raw measurements
//! 2. Measurements from several monitors are averaged per species
//! 3. Levels and the overall severity follow the breakpoint tables
//! 4. Empty and invalid batches fall back instead of failing
//!
//! No network access is needed. Run with: cargo test --test pipeline_integration

use aqmon_service::alert::severity::{aggregate, DEFAULT_SEVERITY};
use aqmon_service::alert::thresholds::classify;
use aqmon_service::analysis::normalize::normalize;
use aqmon_service::config::Config;
use aqmon_service::dev_mode::DevMode;
use aqmon_service::ingest::openaq::parse_latest_response;
use aqmon_service::model::{AirQualityError, Level, RawMeasurement};
use aqmon_service::pipeline::{fallback_readings, Pipeline};

use approx::assert_relative_eq;
use std::path::Path;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Three monitors around one city, as returned by `/v2/latest`.
const CITY_PAYLOAD: &str = r#"{
    "meta": {"found": 3},
    "results": [
        {"location": "Station A", "measurements": [
            {"parameter": "pm25", "value": 30.0, "unit": "µg/m³", "lastUpdated": "2024-05-01T12:00:00+00:00"},
            {"parameter": "no2", "value": 20.0, "unit": "ppb", "lastUpdated": "2024-05-01T12:00:00+00:00"},
            {"parameter": "so2", "value": 3.0, "unit": "ppb", "lastUpdated": "2024-05-01T12:00:00+00:00"}
        ]},
        {"location": "Station B", "measurements": [
            {"parameter": "pm25", "value": 50.0, "unit": "µg/m³", "lastUpdated": "2024-05-01T12:00:00+00:00"},
            {"parameter": "PM10", "value": 80.0, "unit": "µg/m³", "lastUpdated": "2024-05-01T12:00:00+00:00"},
            {"parameter": "co", "value": 0.4, "unit": "ppm", "lastUpdated": "2024-05-01T12:00:00+00:00"}
        ]},
        {"location": "Station C", "measurements": [
            {"parameter": "pm25", "value": -999.0, "unit": "µg/m³", "lastUpdated": "2024-05-01T12:00:00+00:00"},
            {"parameter": "o3", "value": null, "unit": "ppb"}
        ]}
    ]
}"#;

fn m(species: &str, value: f64, unit: &str) -> RawMeasurement {
    RawMeasurement::new(species, value, unit)
}

// ---------------------------------------------------------------------------
// Payload → report
// ---------------------------------------------------------------------------

#[test]
fn test_city_payload_produces_expected_report() {
    let measurements = parse_latest_response(CITY_PAYLOAD).expect("payload should parse");
    assert_eq!(measurements.len(), 7, "null o3 value should be skipped");

    let report = Pipeline::default().run(&measurements);
    assert!(!report.used_fallback);

    // Priority order no2, pm25, (o3 absent), pm10, then first-seen so2.
    let species: Vec<_> = report.readings.iter().map(|r| r.species.as_str()).collect();
    assert_eq!(species, vec!["no2", "pm25", "pm10", "so2"]);

    // -999 sentinel is excluded, so pm25 averages 30 and 50.
    assert_relative_eq!(report.readings[1].averaged_value, 40.0);
    assert_eq!(report.readings[1].level, Level::Unhealthy);
    assert_eq!(report.readings[1].display_name, "PM2.5");

    assert_eq!(report.overall, Level::Unhealthy);
    assert_eq!(report.aqi_score, 120);
}

#[test]
fn test_replayed_snapshot_matches_parsed_payload() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mexico_city.json"), CITY_PAYLOAD).unwrap();

    let replayed = DevMode::new(dir.path()).fetch_snapshot("Mexico City").unwrap();
    assert_eq!(replayed, parse_latest_response(CITY_PAYLOAD).unwrap());
}

// ---------------------------------------------------------------------------
// Documented scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_pm25_pair_normalizes_to_twelve_and_is_good() {
    let normalized = normalize(&[m("pm25", 10.0, "µg/m³"), m("pm25", 14.0, "µg/m³")]);
    assert_eq!(normalized.len(), 1);
    assert_eq!(normalized[0].species, "pm25");
    assert_relative_eq!(normalized[0].averaged_value, 12.0);
    assert_eq!(normalized[0].unit, "µg/m³");
    assert_eq!(classify("PM25", 12.0), Ok(Level::Good));
    assert_eq!(classify("pm25", normalized[0].averaged_value), Ok(Level::Good));
}

#[test]
fn test_no2_good_and_pm25_unhealthy_aggregate_to_unhealthy() {
    let report = Pipeline::default().run(&[m("no2", 53.0, "ppb"), m("pm25", 40.0, "µg/m³")]);
    assert_eq!(report.readings[0].level, Level::Good);
    assert_eq!(report.readings[1].level, Level::Unhealthy);
    assert_eq!(aggregate(&report.readings), Ok(Level::Unhealthy));
}

#[test]
fn test_negative_value_is_not_treated_as_zero() {
    let normalized = normalize(&[m("no2", 30.0, "ppb"), m("no2", -5.0, "ppb")]);
    assert_relative_eq!(normalized[0].averaged_value, 30.0);
}

#[test]
fn test_empty_aggregate_fails_and_pipeline_falls_back() {
    assert_eq!(aggregate(&[]), Err(AirQualityError::EmptyBatch));

    let report = Pipeline::default().run(&[]);
    assert!(report.used_fallback);
    assert_eq!(report.overall, DEFAULT_SEVERITY);
    assert_eq!(report.readings, fallback_readings());
}

#[test]
fn test_many_species_are_capped_at_four() {
    let input: Vec<_> = ["pm25", "pm10", "no2", "o3", "so2", "co", "bc", "nh3"]
        .iter()
        .map(|s| m(s, 1.0, "ppb"))
        .collect();
    let report = Pipeline::default().run(&input);
    assert_eq!(report.readings.len(), 4);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_overrides_and_freshness_flow_into_pipeline() {
    let config = Config::from_toml_str(
        r#"
        [pipeline]
        max_age_minutes = 60

        [breakpoints]
        pm25 = [9.0, 35.4, 55.4, 125.4]
        "#,
        Path::new("inline.toml"),
    )
    .expect("config should parse");

    let pipeline = Pipeline::from_config(&config).unwrap();
    let now = chrono::DateTime::parse_from_rfc3339("2024-05-01T13:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    let report = pipeline.run_at(
        &[
            m("pm25", 10.0, "µg/m³").observed_at("2024-05-01T12:30:00Z"),
            m("pm25", 300.0, "µg/m³").observed_at("2024-04-01T12:30:00Z"),
        ],
        now,
    );
    assert_eq!(report.readings.len(), 1);
    assert_eq!(report.overall, Level::Moderate, "10 µg/m³ is above the overridden 9.0");
}
