//! Reading normalization: group raw measurements by species and average them.
//!
//! A location usually has several monitors reporting the same pollutant, so
//! one batch holds many measurements per species. The dashboard shows one
//! value per species, at most `MAX_READINGS` of them.

use crate::logging::{self, Component};
use crate::model::{NormalizedReading, RawMeasurement};
use crate::species::{canonical_key, PRIORITY_SPECIES};
use std::collections::HashMap;

/// Upper bound on readings emitted for one batch.
pub const MAX_READINGS: usize = 4;

/// Values that may take part in an average: finite and non-negative.
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Running mean of one species. Kept incrementally so that large finite
/// values never overflow an intermediate sum.
struct Group {
    key: String,
    mean: f64,
    count: usize,
    unit: String,
}

/// Number of measurements in `measurements` that [`normalize`] leaves out
/// of every average. Species cut by the reading limit are not counted.
pub fn count_excluded(measurements: &[RawMeasurement]) -> usize {
    measurements
        .iter()
        .filter(|m| !is_valid_value(m.value))
        .count()
}

/// Groups `measurements` by species (case-insensitive) and averages each
/// group, using the standard priority order and reading limit.
///
/// Order: `PRIORITY_SPECIES` first, then remaining species in first-seen
/// order, truncated to `MAX_READINGS`.
pub fn normalize(measurements: &[RawMeasurement]) -> Vec<NormalizedReading> {
    normalize_with(measurements, PRIORITY_SPECIES, MAX_READINGS)
}

/// As [`normalize`] with an explicit priority list and limit.
///
/// Invalid values (negative, NaN, infinite) are dropped before grouping, so
/// they neither shift the average nor count towards it. A species whose
/// values are all invalid produces no entry.
pub fn normalize_with(
    measurements: &[RawMeasurement],
    priority: &[&str],
    max_readings: usize,
) -> Vec<NormalizedReading> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in measurements {
        if !is_valid_value(m.value) {
            logging::debug(
                Component::Pipeline,
                None,
                &format!("Excluding {} value {} from average", m.species, m.value),
            );
            continue;
        }

        let key = canonical_key(&m.species);
        match index.get(&key) {
            Some(&i) => {
                let g = &mut groups[i];
                g.count += 1;
                g.mean += (m.value - g.mean) / g.count as f64;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    mean: m.value,
                    count: 1,
                    unit: m.unit.clone(),
                });
            }
        }
    }

    let priority_keys: Vec<String> = priority.iter().map(|p| canonical_key(p)).collect();

    let prioritized = priority_keys
        .iter()
        .filter_map(|p| index.get(p).map(|&i| &groups[i]));
    let remaining = groups.iter().filter(|g| !priority_keys.contains(&g.key));

    prioritized
        .chain(remaining)
        .take(max_readings)
        .map(|g| NormalizedReading {
            species: g.key.clone(),
            averaged_value: g.mean,
            unit: g.unit.clone(),
            sample_count: g.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m(species: &str, value: f64, unit: &str) -> RawMeasurement {
        RawMeasurement::new(species, value, unit)
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_same_species_is_averaged() {
        let out = normalize(&[m("pm25", 10.0, "µg/m³"), m("pm25", 14.0, "µg/m³")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].species, "pm25");
        assert_relative_eq!(out[0].averaged_value, 12.0);
        assert_eq!(out[0].unit, "µg/m³");
        assert_eq!(out[0].sample_count, 2);
    }

    #[test]
    fn test_grouping_ignores_case() {
        let out = normalize(&[m("NO2", 40.0, "ppb"), m("no2", 50.0, "ppb"), m("No2 ", 60.0, "ppb")]);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].averaged_value, 50.0);
    }

    #[test]
    fn test_unit_comes_from_first_valid_observation() {
        let out = normalize(&[
            m("co", -1.0, "mg/m³"),
            m("co", 2.0, "ppm"),
            m("co", 4.0, "ppb"),
        ]);
        assert_eq!(out[0].unit, "ppm");
        assert_relative_eq!(out[0].averaged_value, 3.0);
    }

    #[test]
    fn test_negative_value_is_excluded_not_zeroed() {
        let out = normalize(&[m("o3", 60.0, "ppb"), m("o3", -5.0, "ppb")]);
        assert_relative_eq!(out[0].averaged_value, 60.0);
        assert_eq!(out[0].sample_count, 1);
    }

    #[test]
    fn test_non_finite_values_are_excluded() {
        let out = normalize(&[
            m("pm10", f64::NAN, "µg/m³"),
            m("pm10", f64::INFINITY, "µg/m³"),
            m("pm10", 30.0, "µg/m³"),
        ]);
        assert_relative_eq!(out[0].averaged_value, 30.0);
    }

    #[test]
    fn test_group_with_only_invalid_values_is_dropped() {
        let out = normalize(&[m("so2", -1.0, "ppb"), m("so2", f64::NAN, "ppb"), m("no2", 5.0, "ppb")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].species, "no2");
    }

    #[test]
    fn test_priority_species_come_first_in_fixed_order() {
        let out = normalize(&[
            m("co", 1.0, "ppm"),
            m("pm10", 20.0, "µg/m³"),
            m("no2", 10.0, "ppb"),
            m("pm25", 5.0, "µg/m³"),
        ]);
        let order: Vec<_> = out.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(order, vec!["no2", "pm25", "pm10", "co"]);
    }

    #[test]
    fn test_remaining_species_keep_first_seen_order() {
        let out = normalize(&[
            m("so2", 1.0, "ppb"),
            m("bc", 1.0, "µg/m³"),
            m("co", 1.0, "ppm"),
            m("o3", 1.0, "ppb"),
        ]);
        let order: Vec<_> = out.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(order, vec!["o3", "so2", "bc", "co"]);
    }

    #[test]
    fn test_output_is_truncated_to_four() {
        let input: Vec<_> = ["so2", "co", "bc", "nh3", "no", "pm1", "no2"]
            .iter()
            .map(|s| m(s, 1.0, "ppb"))
            .collect();
        let out = normalize(&input);
        assert_eq!(out.len(), MAX_READINGS);
        assert_eq!(out[0].species, "no2");
        let order: Vec<_> = out.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(order, vec!["no2", "so2", "co", "bc"]);
    }

    #[test]
    fn test_huge_finite_values_average_without_overflow() {
        let out = normalize(&[m("pm25", 1e308, "µg/m³"), m("pm25", 1e308, "µg/m³")]);
        assert_eq!(out.len(), 1);
        assert!(out[0].averaged_value.is_finite());
        assert_relative_eq!(out[0].averaged_value, 1e308);

        let out = normalize(&[m("o3", f64::MAX, "ppb"), m("o3", 0.0, "ppb")]);
        assert_relative_eq!(out[0].averaged_value, f64::MAX / 2.0);
    }

    #[test]
    fn test_running_mean_matches_plain_average() {
        let out = normalize(&[
            m("no2", 12.5, "ppb"),
            m("no2", 40.0, "ppb"),
            m("no2", 3.25, "ppb"),
            m("no2", 80.0, "ppb"),
        ]);
        assert_relative_eq!(out[0].averaged_value, 33.9375, epsilon = 1e-12);
    }

    #[test]
    fn test_excluded_count_ignores_capped_species() {
        let mut input: Vec<_> = ["pm25", "pm10", "no2", "o3", "so2", "co"]
            .iter()
            .map(|s| m(s, 1.0, "ppb"))
            .collect();
        assert_eq!(count_excluded(&input), 0);

        input.push(m("co", -1.0, "ppm"));
        input.push(m("bc", f64::NAN, "µg/m³"));
        assert_eq!(count_excluded(&input), 2);
        assert_eq!(normalize(&input).len(), MAX_READINGS);
    }

    #[test]
    fn test_custom_priority_and_limit() {
        let out = normalize_with(
            &[m("pm25", 1.0, "µg/m³"), m("co", 1.0, "ppm"), m("o3", 1.0, "ppb")],
            &["CO"],
            2,
        );
        let order: Vec<_> = out.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(order, vec!["co", "pm25"]);
    }
}
