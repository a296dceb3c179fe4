//! Point-in-time view of a station's derived values.

use std::fmt;

use serde::Serialize;

use crate::station::{PowerStation, Status};

/// Derived station values captured after one measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    /// Index of the measurement that produced this snapshot.
    pub step: usize,
    /// Operating status.
    pub status: Status,
    /// Charge level, percent with one decimal.
    pub battery_percentage: f64,
    /// Rounded sum of device outputs.
    pub total_output_power: f64,
    /// `HH:MM` estimate to full or empty.
    pub time_remaining: String,
    /// Input power as last reported.
    pub input_power: f64,
    /// Aggregate output power (unrounded).
    pub output_power: f64,
    /// Number of connected devices.
    pub device_count: usize,
}

impl StationSnapshot {
    /// Reads every derived value from the station.
    pub fn capture(step: usize, station: &PowerStation) -> Self {
        Self {
            step,
            status: station.status(),
            battery_percentage: station.battery_percentage(),
            total_output_power: station.total_output_power(),
            time_remaining: station.time_remaining(),
            input_power: station.current_input(),
            output_power: station.current_output(),
            device_count: station.connected_devices().len(),
        }
    }
}

impl fmt::Display for StationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:>4} | {:<11} | {:>5.1}% | in={:>7.1} W  out={:>5} W | {} left | devices={}",
            self.step,
            self.status,
            self.battery_percentage,
            self.input_power,
            self.total_output_power,
            self.time_remaining,
            self.device_count,
        )
    }
}
