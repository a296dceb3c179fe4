//! CSV and JSON export for station snapshots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::snapshot::StationSnapshot;

/// Column header for CSV snapshot export.
const HEADER: &str = "step,status,battery_percentage,total_output_power,time_remaining,\
                      input_power,output_power,device_count";

/// Exports snapshots to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(snapshots: &[StationSnapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(snapshots, io::BufWriter::new(file))
}

/// Writes snapshots as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(snapshots: &[StationSnapshot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for s in snapshots {
        wtr.write_record(&[
            s.step.to_string(),
            s.status.to_string(),
            format!("{:.1}", s.battery_percentage),
            format!("{:.0}", s.total_output_power),
            s.time_remaining.clone(),
            format!("{:.4}", s.input_power),
            format!("{:.4}", s.output_power),
            s.device_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports snapshots to a pretty-printed JSON file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_json(snapshots: &[StationSnapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut buf = io::BufWriter::new(file);
    write_json(snapshots, &mut buf)?;
    buf.flush()
}

/// Writes snapshots as a pretty-printed JSON array to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(snapshots: &[StationSnapshot], writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, snapshots).map_err(io::Error::from)
}
