//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use power_station::station::PowerStation;

/// Reference station: 2000 Wh, 500 W in, 800 W out.
pub fn reference_station() -> PowerStation {
    PowerStation::new(2000.0, 500.0, 800.0)
}

/// Path to a file under the crate root.
pub fn crate_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Unique scratch path in the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("power-station-{}-{name}", std::process::id()))
}
