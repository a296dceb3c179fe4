//! Instantaneous power-state model for a battery-backed power station.

pub mod cli;
pub mod config;
pub mod error;
/// Snapshot export (CSV, JSON).
pub mod io;
pub mod runner;
pub mod snapshot;
pub mod station;
pub mod trace;
