//! Measurement staleness detection.
//!
//! OpenAQ's `latest` endpoint returns the most recent value per monitor,
//! which for an offline monitor can be days old. Mixing those into an
//! average would report yesterday's air as today's, so the pipeline can
//! drop measurements older than a configured age.
//!
//! # Clock injection
//! All functions accept a `now: DateTime<Utc>` parameter rather than calling
//! `Utc::now()` internally, so tests stay deterministic.

use crate::model::RawMeasurement;
use chrono::{DateTime, Utc};

/// Returns `true` if the measurement's timestamp is older than
/// `max_age_minutes` relative to `now`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
///
/// Returns an error if the timestamp cannot be parsed. A measurement with
/// no timestamp is never stale.
pub fn is_stale_at(
    measurement: &RawMeasurement,
    max_age_minutes: u64,
    now: DateTime<Utc>,
) -> Result<bool, String> {
    let Some(datetime) = measurement.observed_at.as_deref() else {
        return Ok(false);
    };

    let observed = DateTime::parse_from_rfc3339(datetime)
        .map_err(|e| format!("cannot parse timestamp '{}': {}", datetime, e))?
        .with_timezone(&Utc);

    // Future timestamps (clock skew) count as zero age.
    let age_minutes = (now - observed).num_minutes().max(0) as u64;
    Ok(age_minutes > max_age_minutes)
}

/// Keeps the measurements that are not stale at `now`. Unparseable
/// timestamps are treated as stale.
pub fn filter_fresh(
    measurements: &[RawMeasurement],
    max_age_minutes: u64,
    now: DateTime<Utc>,
) -> Vec<RawMeasurement> {
    measurements
        .iter()
        .filter(|m| matches!(is_stale_at(m, max_age_minutes, now), Ok(false)))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
