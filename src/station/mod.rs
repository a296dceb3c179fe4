//! Battery-backed power station state model.

mod status;
mod time;

use log::{debug, trace};
use serde::Serialize;

use crate::error::StationError;

pub use status::Status;
use time::{format_charge_time, round_half_up};

/// An output device plugged into the station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedDevice {
    /// Caller-supplied identifier.
    pub device_id: String,
    /// Last reported output power (voltage x current).
    pub output: f64,
}

/// Instantaneous power state of a battery-backed power station.
///
/// `PowerStation` holds the latest measurements pushed by a caller and
/// derives status, charge percentage, aggregate output, and time remaining
/// on every query. It performs no validation: negative or out-of-range
/// values are stored as given and flow through the derived values.
///
/// # Units
///
/// Capacity and stored energy share one energy unit (e.g. Wh); power limits
/// and measurements share the matching power unit (e.g. W).
///
/// # Examples
///
/// ```
/// use power_station::station::{PowerStation, Status};
///
/// let mut station = PowerStation::new(500.0, 200.0, 150.0);
/// station.connect_output("lamp_1");
/// station.update_output("lamp_1", 12.0, 5.0);
/// station.update_battery_level(496.0);
///
/// assert_eq!(station.battery_percentage(), 99.2);
/// assert_eq!(station.status(), Status::Discharging);
/// assert_eq!(station.time_remaining(), "08:16");
/// ```
#[derive(Debug, Clone)]
pub struct PowerStation {
    battery_capacity: f64,
    maximum_input: f64,
    maximum_output: f64,

    current_capacity: f64,
    current_input: f64,
    /// Running sum of device outputs, adjusted on every device change.
    current_output: f64,
    connected_devices: Vec<ConnectedDevice>,
}

impl PowerStation {
    /// Creates a fully charged station with no input and no devices.
    ///
    /// # Arguments
    ///
    /// * `battery_capacity` - Nominal stored energy when full
    /// * `maximum_input` - Rated input power limit
    /// * `maximum_output` - Rated output power limit
    pub fn new(battery_capacity: f64, maximum_input: f64, maximum_output: f64) -> Self {
        Self {
            battery_capacity,
            maximum_input,
            maximum_output,
            current_capacity: battery_capacity,
            current_input: 0.0,
            current_output: 0.0,
            connected_devices: Vec::new(),
        }
    }

    /// Sets input power to `voltage * current`.
    pub fn update_input(&mut self, voltage: f64, current: f64) {
        self.current_input = voltage * current;
        trace!("input power set to {}", self.current_input);
    }

    /// Appends a device with zero output.
    ///
    /// Identifiers are not checked for uniqueness; connecting the same id
    /// twice produces two entries, and later lookups hit the first one.
    pub fn connect_output(&mut self, device_id: impl Into<String>) {
        let device_id = device_id.into();
        debug!("connecting output device \"{device_id}\"");
        self.connected_devices.push(ConnectedDevice {
            device_id,
            output: 0.0,
        });
    }

    /// Sets a device's output to `voltage * current`.
    ///
    /// Unknown identifiers are ignored. Use [`Self::try_update_output`] to
    /// observe the lookup result.
    pub fn update_output(&mut self, device_id: &str, voltage: f64, current: f64) {
        if let Err(err) = self.try_update_output(device_id, voltage, current) {
            debug!("output update ignored: {err}");
        }
    }

    /// Sets a device's output to `voltage * current`, returning its previous
    /// output.
    ///
    /// The aggregate output is adjusted by the difference rather than
    /// re-summed.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::DeviceNotFound`] if no device has this id.
    pub fn try_update_output(
        &mut self,
        device_id: &str,
        voltage: f64,
        current: f64,
    ) -> Result<f64, StationError> {
        let index = self.require_device(device_id)?;
        let device = &mut self.connected_devices[index];

        let previous = device.output;
        self.current_output -= previous;
        device.output = voltage * current;
        self.current_output += device.output;

        trace!(
            "device \"{device_id}\" output {previous} -> {}",
            device.output
        );
        Ok(previous)
    }

    /// Removes the first device with this id.
    ///
    /// Unknown identifiers are ignored. Use [`Self::try_disconnect_output`]
    /// to observe the lookup result.
    pub fn disconnect_output(&mut self, device_id: &str) {
        if let Err(err) = self.try_disconnect_output(device_id) {
            debug!("disconnect ignored: {err}");
        }
    }

    /// Removes the first device with this id and returns its record.
    ///
    /// Remaining devices keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::DeviceNotFound`] if no device has this id.
    pub fn try_disconnect_output(
        &mut self,
        device_id: &str,
    ) -> Result<ConnectedDevice, StationError> {
        let index = self.require_device(device_id)?;
        let removed = self.connected_devices.remove(index);
        self.current_output -= removed.output;

        debug!("disconnected output device \"{device_id}\"");
        Ok(removed)
    }

    /// Sets the stored energy directly. The value is not clamped.
    pub fn update_battery_level(&mut self, capacity_left: f64) {
        self.current_capacity = capacity_left;
        trace!("stored energy set to {capacity_left}");
    }

    /// Stored energy as a percentage of capacity, rounded to one decimal.
    ///
    /// Not clamped: stored energy outside `[0, capacity]` yields a value
    /// outside `[0, 100]`.
    pub fn battery_percentage(&self) -> f64 {
        round_half_up(self.current_capacity / self.battery_capacity * 100.0 * 10.0) / 10.0
    }

    /// Sum of all device outputs, rounded to the nearest integer.
    ///
    /// Re-summed from the device list on each call.
    pub fn total_output_power(&self) -> f64 {
        let sum = self
            .connected_devices
            .iter()
            .fold(0.0, |sum, device| device.output + sum);
        round_half_up(sum)
    }

    /// Current operating status.
    pub fn status(&self) -> Status {
        Status::classify(
            self.current_input,
            self.current_output,
            self.maximum_input,
            self.maximum_output,
        )
    }

    /// Estimated time until full (charging) or empty (discharging) as `HH:MM`.
    ///
    /// Returns `"99:59"` when there is no net power flow, when the estimate
    /// exceeds the display range, and when the station is idle or overloaded.
    pub fn time_remaining(&self) -> String {
        let net_power = (self.current_output - self.current_input).abs();
        if net_power == 0.0 {
            return time::NO_ESTIMATE.to_string();
        }

        let hours = match self.status() {
            Status::Discharging => self.current_capacity / net_power,
            Status::Charging => (self.battery_capacity - self.current_capacity) / net_power,
            Status::Idle | Status::Overload => f64::INFINITY,
        };
        format_charge_time(hours)
    }

    /// Nominal stored energy when full.
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    /// Rated input power limit.
    pub fn maximum_input(&self) -> f64 {
        self.maximum_input
    }

    /// Rated output power limit.
    pub fn maximum_output(&self) -> f64 {
        self.maximum_output
    }

    /// Stored energy as last reported.
    pub fn current_capacity(&self) -> f64 {
        self.current_capacity
    }

    /// Input power as last reported.
    pub fn current_input(&self) -> f64 {
        self.current_input
    }

    /// Incrementally maintained aggregate output power (unrounded).
    pub fn current_output(&self) -> f64 {
        self.current_output
    }

    /// Connected devices in connection order.
    pub fn connected_devices(&self) -> &[ConnectedDevice] {
        &self.connected_devices
    }

    fn find_device(&self, device_id: &str) -> Option<usize> {
        self.connected_devices
            .iter()
            .position(|d| d.device_id == device_id)
    }

    fn require_device(&self, device_id: &str) -> Result<usize, StationError> {
        self.find_device(device_id)
            .ok_or_else(|| StationError::DeviceNotFound {
                device_id: device_id.to_string(),
            })
    }
}
