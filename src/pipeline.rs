//! End-to-end classification of one batch of measurements.
//!
//! raw measurements → freshness filter → normalize → classify → aggregate.
//! The pipeline always produces a usable report: when nothing valid is
//! left it substitutes the fallback readings and the default severity.

use crate::alert::severity::{self, HealthAdvisory, DEFAULT_SEVERITY};
use crate::alert::{stalenesses, thresholds};
use crate::analysis::normalize::{self, MAX_READINGS};
use crate::config::Config;
use crate::logging::{self, Component};
use crate::model::{ClassifiedReading, Level, RawMeasurement};
use crate::species::{self, BreakpointTable, PRIORITY_SPECIES};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub readings: Vec<ClassifiedReading>,
    pub overall: Level,
    pub aqi_score: u32,
    pub advisory: HealthAdvisory,
    /// True when `readings` are the static fallback set rather than data.
    pub used_fallback: bool,
}

/// Readings shown when a location has no usable data. Levels are part of
/// the fixture, not recomputed from the values.
pub fn fallback_readings() -> Vec<ClassifiedReading> {
    let fixture = |key: &str, value: f64, unit: &str, level: Level| ClassifiedReading {
        species: key.to_string(),
        display_name: species::display_name(key),
        icon: species::icon_for(key).to_string(),
        averaged_value: value,
        level,
        unit: unit.to_string(),
    };

    vec![
        fixture("no2", 42.0, "ppb", Level::Moderate),
        fixture("pm25", 28.0, "µg/m³", Level::Good),
        fixture("o3", 65.0, "ppb", Level::Moderate),
        fixture("pm10", 45.0, "µg/m³", Level::Good),
    ]
}

pub struct Pipeline {
    table: BreakpointTable,
    max_age_minutes: Option<u64>,
}

impl Pipeline {
    pub fn new(table: BreakpointTable) -> Self {
        Self {
            table,
            max_age_minutes: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, crate::config::ConfigError> {
        Ok(Self::new(config.breakpoint_table()?).with_max_age(config.pipeline.max_age_minutes))
    }

    pub fn with_max_age(mut self, max_age_minutes: Option<u64>) -> Self {
        self.max_age_minutes = max_age_minutes;
        self
    }

    pub fn table(&self) -> &BreakpointTable {
        &self.table
    }

    /// Classifies `measurements` using the current time for freshness.
    pub fn run(&self, measurements: &[RawMeasurement]) -> AirQualityReport {
        self.run_at(measurements, Utc::now())
    }

    /// Classifies `measurements`, judging freshness against `now`.
    pub fn run_at(&self, measurements: &[RawMeasurement], now: DateTime<Utc>) -> AirQualityReport {
        let fresh;
        let batch = match self.max_age_minutes {
            Some(max_age) => {
                fresh = stalenesses::filter_fresh(measurements, max_age, now);
                if fresh.len() < measurements.len() {
                    logging::info(
                        Component::Pipeline,
                        None,
                        &format!(
                            "Dropped {} measurements older than {} minutes",
                            measurements.len() - fresh.len(),
                            max_age
                        ),
                    );
                }
                fresh.as_slice()
            }
            None => measurements,
        };

        let normalized = normalize::normalize_with(batch, PRIORITY_SPECIES, MAX_READINGS);
        let readings = thresholds::classify_all(&self.table, &normalized);
        let excluded = normalize::count_excluded(batch);
        logging::log_batch_summary(None, measurements.len(), readings.len(), excluded);

        match severity::aggregate(&readings) {
            Ok(overall) => Self::report(readings, overall, false),
            Err(e) => {
                logging::warn(
                    Component::Pipeline,
                    None,
                    &format!("{}; using fallback readings and {} severity", e, DEFAULT_SEVERITY),
                );
                Self::report(fallback_readings(), DEFAULT_SEVERITY, true)
            }
        }
    }

    fn report(readings: Vec<ClassifiedReading>, overall: Level, used_fallback: bool) -> AirQualityReport {
        AirQualityReport {
            location: None,
            readings,
            overall,
            aqi_score: overall.aqi_score(),
            advisory: severity::advisory_for(overall),
            used_fallback,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(BreakpointTable::builtin())
    }
}

impl AirQualityReport {
    pub fn for_location(mut self, name: &str) -> Self {
        self.location = Some(name.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
