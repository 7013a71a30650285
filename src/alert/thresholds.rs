//! Pollutant breakpoint checking.
//!
//! Maps an averaged concentration to a health level using the species'
//! breakpoint table. The comparison is inclusive on the upper edge of each
//! band: a value exactly at `good_max` is still good.

use crate::analysis::normalize::is_valid_value;
use crate::logging::{self, Component};
use crate::model::{AirQualityError, Breakpoints, ClassifiedReading, Level, NormalizedReading};
use crate::species::{self, BreakpointTable};

/// Four-way comparison against one breakpoint table.
///
/// `hazardous_ref` is deliberately not consulted.
pub fn level_for(value: f64, breakpoints: &Breakpoints) -> Level {
    if value <= breakpoints.good_max {
        Level::Good
    } else if value <= breakpoints.moderate_max {
        Level::Moderate
    } else if value <= breakpoints.unhealthy_max {
        Level::Unhealthy
    } else {
        Level::Hazardous
    }
}

/// Classifies `value` for `species` against the built-in breakpoint tables.
///
/// Returns `InvalidMeasurement` for negative or non-finite values rather
/// than defaulting to `Good`.
pub fn classify(species: &str, value: f64) -> Result<Level, AirQualityError> {
    classify_with(&BreakpointTable::builtin(), species, value)
}

/// Classifies `value` for `species` against `table`.
pub fn classify_with(
    table: &BreakpointTable,
    species: &str,
    value: f64,
) -> Result<Level, AirQualityError> {
    if !is_valid_value(value) {
        return Err(AirQualityError::InvalidMeasurement {
            species: species.to_string(),
            value,
        });
    }
    Ok(level_for(value, &table.lookup(species)))
}

pub fn classify_reading(
    table: &BreakpointTable,
    reading: &NormalizedReading,
) -> Result<ClassifiedReading, AirQualityError> {
    let level = classify_with(table, &reading.species, reading.averaged_value)?;
    if !table.contains(&reading.species) {
        logging::debug(
            Component::Pipeline,
            None,
            &format!("No breakpoint table for '{}'; using default", reading.species),
        );
    }
    Ok(ClassifiedReading {
        species: reading.species.clone(),
        display_name: species::display_name(&reading.species),
        icon: species::icon_for(&reading.species).to_string(),
        averaged_value: reading.averaged_value,
        level,
        unit: reading.unit.clone(),
    })
}

/// Classifies a whole batch. Readings that fail classification are logged
/// and left out of the result; order of the survivors is preserved.
pub fn classify_all(table: &BreakpointTable, readings: &[NormalizedReading]) -> Vec<ClassifiedReading> {
    readings
        .iter()
        .filter_map(|r| match classify_reading(table, r) {
            Ok(classified) => Some(classified),
            Err(e) => {
                logging::warn(Component::Pipeline, None, &format!("Dropping reading: {}", e));
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
