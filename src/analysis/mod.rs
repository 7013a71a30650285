//! Batch organization for the air-quality pipeline.
//!
//! Turns flat ingest output into one averaged reading per species.
//! Classification lives in `alert`.
//!
//! Submodules:
//! - `normalize` — groups raw measurements by species and averages them.

pub mod normalize;
