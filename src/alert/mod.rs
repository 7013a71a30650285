//! Health-level classification for averaged pollutant readings.
//!
//! Submodules:
//! - `thresholds`  — per-species breakpoint comparison (reading → level).
//! - `severity`    — overall level for a batch, AQI score, health advisories.
//! - `stalenesses` — drops measurements older than the configured age.

pub mod severity;
pub mod stalenesses;
pub mod thresholds;
