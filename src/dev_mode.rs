//! Development mode utilities for working with recorded data
//!
//! When the live OpenAQ API is unavailable (offline, rate-limited, no key),
//! use this module to replay recorded `latest` responses from disk. Files
//! are named after the location slug, e.g. `snapshots/new_delhi.json`.

use crate::ingest::openaq::parse_latest_response;
use crate::logging::{self, Component};
use crate::model::{OpenAqError, RawMeasurement};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration for development mode data replay
pub struct DevMode {
    /// Directory holding recorded `<slug>.json` payloads
    pub snapshot_dir: PathBuf,
}

/// File-name slug for a location: lower-cased, every run of
/// non-alphanumeric characters collapsed to `_`.
pub fn location_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

impl DevMode {
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    pub fn snapshot_path(&self, location: &str) -> PathBuf {
        self.snapshot_dir
            .join(format!("{}.json", location_slug(location)))
    }

    /// Replays the recorded payload for `location` as if it had just been
    /// fetched.
    pub fn fetch_snapshot(&self, location: &str) -> Result<Vec<RawMeasurement>, OpenAqError> {
        let path = self.snapshot_path(location);
        let body = fs::read_to_string(&path).map_err(|e| {
            OpenAqError::RequestFailed(format!("cannot read snapshot {}: {}", path.display(), e))
        })?;

        let measurements = parse_latest_response(&body)?;
        logging::debug(
            Component::Replay,
            Some(location),
            &format!("Replayed {} measurements from {}", measurements.len(), path.display()),
        );
        Ok(measurements)
    }

    /// As [`DevMode::fetch_snapshot`], with failures logged and turned into
    /// an empty batch.
    pub fn fetch_snapshot_or_empty(&self, location: &str) -> Vec<RawMeasurement> {
        self.fetch_snapshot(location).unwrap_or_else(|e| {
            logging::log_fetch_failure(Component::Replay, location, "Replay snapshot", &e);
            Vec::new()
        })
    }

    /// Slugs of all recorded snapshots, sorted.
    pub fn available_snapshots(&self) -> io::Result<Vec<String>> {
        let mut slugs = Vec::new();
        for entry in fs::read_dir(&self.snapshot_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}
