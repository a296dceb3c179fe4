//! End-to-end behaviour of the station model through its public API.

mod common;

use power_station::station::{ConnectedDevice, Status};

#[test]
fn charge_then_discharge_time_estimates() {
    let mut station = common::reference_station();

    station.update_input(150.0, 2.0);
    station.update_battery_level(1850.0);
    assert_eq!(station.status(), Status::Charging);
    assert_eq!(station.time_remaining(), "00:30");

    station.connect_output("device");
    station.update_output("device", 50.0, 2.0);
    assert_eq!(station.time_remaining(), "00:45");

    station.update_input(0.0, 0.0);
    assert_eq!(station.status(), Status::Discharging);
    assert_eq!(station.time_remaining(), "18:30");
}

#[test]
fn aggregate_output_tracks_device_changes() {
    let mut station = common::reference_station();
    for id in ["a", "b", "c"] {
        station.connect_output(id);
    }
    station.update_output("a", 12.0, 2.0);
    station.update_output("b", 5.0, 3.0);
    station.update_output("c", 230.0, 1.0);
    assert_eq!(station.current_output(), 269.0);

    // delta applied only for the updated device
    station.update_output("b", 5.0, 1.0);
    assert_eq!(station.current_output(), 259.0);

    station.disconnect_output("c");
    assert_eq!(station.current_output(), 29.0);
    assert_eq!(station.total_output_power(), 29.0);
    assert_eq!(
        station.connected_devices(),
        &[
            ConnectedDevice {
                device_id: "a".to_string(),
                output: 24.0
            },
            ConnectedDevice {
                device_id: "b".to_string(),
                output: 5.0
            },
        ]
    );
}

#[test]
fn unknown_devices_never_disturb_state() {
    let mut station = common::reference_station();
    station.connect_output("usb_1");
    station.update_output("usb_1", 5.0, 2.0);

    station.update_output("ghost", 100.0, 100.0);
    station.disconnect_output("ghost");

    assert_eq!(station.connected_devices().len(), 1);
    assert_eq!(station.current_output(), 10.0);
    assert!(station.try_disconnect_output("ghost").is_err());
}

#[test]
fn overload_on_output_limit() {
    let mut station = common::reference_station();
    station.update_input(400.0, 1.0);
    station.connect_output("kettle");
    station.update_output("kettle", 230.0, 3.5);
    assert_eq!(station.status(), Status::Overload);
    assert_eq!(station.time_remaining(), "99:59");

    station.update_output("kettle", 230.0, 3.0);
    assert_eq!(station.status(), Status::Discharging);
}
