//! Replays a measurement trace through a station.

use log::{debug, info};

use crate::snapshot::StationSnapshot;
use crate::station::{PowerStation, Status};
use crate::trace::Measurement;

/// Applies each measurement in order and captures a snapshot after each one.
///
/// Returns one snapshot per measurement; an empty trace yields no snapshots.
pub fn replay(station: &mut PowerStation, trace: &[Measurement]) -> Vec<StationSnapshot> {
    let mut snapshots = Vec::with_capacity(trace.len());

    for (step, measurement) in trace.iter().enumerate() {
        measurement.apply(station);
        debug!("step {step}: applied {}", measurement.op());
        snapshots.push(StationSnapshot::capture(step, station));
    }

    let overloads = snapshots
        .iter()
        .filter(|s| s.status == Status::Overload)
        .count();
    info!(
        "replayed {} measurements ({overloads} overload), final charge {:.1}%",
        snapshots.len(),
        station.battery_percentage()
    );

    snapshots
}
