//! Pollutant species registry.
//!
//! Canonical list of pollutant species this service knows how to classify,
//! with display metadata and AQI breakpoint tables. All other modules look
//! species up from here rather than hardcoding thresholds.

use crate::model::Breakpoints;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Species metadata
// ---------------------------------------------------------------------------

/// Metadata for a single pollutant species.
pub struct PollutantSpecies {
    /// Lower-case key as reported by OpenAQ (`parameter`).
    pub key: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub breakpoints: Breakpoints,
}

/// Breakpoints used for any species missing from the registry.
pub const DEFAULT_BREAKPOINTS: Breakpoints = Breakpoints::new([50.0, 100.0, 150.0, 200.0]);

/// Icon used for any species missing from the registry.
pub const DEFAULT_ICON: &str = "🌡️";

/// Species shown first, in this order, when present in a batch.
pub const PRIORITY_SPECIES: &[&str] = &["no2", "pm25", "o3", "pm10"];

/// Sources:
///   - Breakpoints: US EPA AQI concentration breakpoints
///     (PM in µg/m³, O3/NO2/SO2 in ppb, CO in ppm)
pub static SPECIES_REGISTRY: &[PollutantSpecies] = &[
    PollutantSpecies {
        key: "pm25",
        display_name: "PM2.5",
        icon: "💨",
        breakpoints: Breakpoints::new([12.0, 35.4, 55.4, 150.4]),
    },
    PollutantSpecies {
        key: "pm10",
        display_name: "PM10",
        icon: "🌪️",
        breakpoints: Breakpoints::new([54.0, 154.0, 254.0, 354.0]),
    },
    PollutantSpecies {
        key: "o3",
        display_name: "O3",
        icon: "☁️",
        breakpoints: Breakpoints::new([54.0, 70.0, 85.0, 105.0]),
    },
    PollutantSpecies {
        key: "no2",
        display_name: "NO2",
        icon: "🌫️",
        breakpoints: Breakpoints::new([53.0, 100.0, 360.0, 649.0]),
    },
    PollutantSpecies {
        key: "so2",
        display_name: "SO2",
        icon: "🌡️",
        breakpoints: Breakpoints::new([35.0, 75.0, 185.0, 304.0]),
    },
    PollutantSpecies {
        key: "co",
        display_name: "CO",
        icon: "⚗️",
        breakpoints: Breakpoints::new([4.4, 9.4, 12.4, 15.4]),
    },
];

/// Normalizes a species name for lookups and grouping: surrounding
/// whitespace trimmed, lower-cased.
pub fn canonical_key(species: &str) -> String {
    species.trim().to_lowercase()
}

/// Looks up a species by name, case-insensitively. Returns `None` if not
/// found.
pub fn find_species(species: &str) -> Option<&'static PollutantSpecies> {
    let key = canonical_key(species);
    SPECIES_REGISTRY.iter().find(|s| s.key == key)
}

/// Display name for a species; unknown species are shown upper-cased.
pub fn display_name(species: &str) -> String {
    find_species(species)
        .map(|s| s.display_name.to_string())
        .unwrap_or_else(|| canonical_key(species).to_uppercase())
}

pub fn icon_for(species: &str) -> &'static str {
    find_species(species).map(|s| s.icon).unwrap_or(DEFAULT_ICON)
}

pub fn all_species_keys() -> Vec<&'static str> {
    SPECIES_REGISTRY.iter().map(|s| s.key).collect()
}

// ---------------------------------------------------------------------------
// Breakpoint table
// ---------------------------------------------------------------------------

/// Immutable species → breakpoints mapping, built once at startup.
///
/// Starts from `SPECIES_REGISTRY`; config overrides replace or add entries.
/// Unknown species resolve to `DEFAULT_BREAKPOINTS`.
#[derive(Debug, Clone)]
pub struct BreakpointTable {
    tables: HashMap<String, Breakpoints>,
}

impl BreakpointTable {
    pub fn builtin() -> Self {
        let tables = SPECIES_REGISTRY
            .iter()
            .map(|s| (s.key.to_string(), s.breakpoints))
            .collect();
        Self { tables }
    }

    /// Built-in tables with `overrides` applied on top. Every override is
    /// validated; the first invalid one is reported with its species.
    pub fn with_overrides<'a, I>(overrides: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a String, &'a [f64; 4])>,
    {
        let mut table = Self::builtin();
        for (species, values) in overrides {
            let breakpoints = Breakpoints::new(*values);
            breakpoints
                .validate()
                .map_err(|e| format!("{}: {}", species, e))?;
            table.tables.insert(canonical_key(species), breakpoints);
        }
        Ok(table)
    }

    pub fn lookup(&self, species: &str) -> Breakpoints {
        self.tables
            .get(&canonical_key(species))
            .copied()
            .unwrap_or(DEFAULT_BREAKPOINTS)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.tables.contains_key(&canonical_key(species))
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
