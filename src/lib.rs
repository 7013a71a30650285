//! Air-quality monitoring service.
//!
//! Turns raw pollutant measurements for a location into at most four
//! classified readings plus one overall health level.
//!
//! - `model`      — shared data types and errors
//! - `species`    — pollutant registry and breakpoint tables
//! - `analysis`   — grouping and averaging of raw measurements
//! - `alert`      — level classification, overall severity, freshness
//! - `pipeline`   — the above wired together, with fallback handling
//! - `ingest`     — OpenAQ client
//! - `locations`  — named cities to fetch around
//! - `dev_mode`   — replay of recorded payloads
//! - `verify`     — live data-source coverage checks
//! - `config`, `logging`

pub mod alert;
pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod locations;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod species;
pub mod verify;
