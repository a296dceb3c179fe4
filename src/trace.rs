//! Measurement traces: the sequence of samples a measurement source pushes
//! into a station, read from CSV or generated synthetically.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::config::{StationParams, SyntheticConfig};
use crate::error::TraceError;
use crate::station::PowerStation;

/// One sample or event reported by a measurement source.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Charger input sample.
    Input { voltage: f64, current: f64 },
    /// A device was plugged in.
    Connect { device_id: String },
    /// Output sample for one device.
    Output {
        device_id: String,
        voltage: f64,
        current: f64,
    },
    /// A device was unplugged.
    Disconnect { device_id: String },
    /// Stored energy reading.
    BatteryLevel { capacity_left: f64 },
}

impl Measurement {
    /// Pushes this measurement into the station.
    pub fn apply(&self, station: &mut PowerStation) {
        match self {
            Self::Input { voltage, current } => station.update_input(*voltage, *current),
            Self::Connect { device_id } => station.connect_output(device_id.as_str()),
            Self::Output {
                device_id,
                voltage,
                current,
            } => station.update_output(device_id, *voltage, *current),
            Self::Disconnect { device_id } => station.disconnect_output(device_id),
            Self::BatteryLevel { capacity_left } => station.update_battery_level(*capacity_left),
        }
    }

    /// Short operation name, matching the CSV `op` column.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Connect { .. } => "connect",
            Self::Output { .. } => "output",
            Self::Disconnect { .. } => "disconnect",
            Self::BatteryLevel { .. } => "level",
        }
    }
}

/// Raw CSV row; columns not used by an operation may be empty.
#[derive(Debug, Deserialize)]
struct TraceRecord {
    op: String,
    device: Option<String>,
    voltage: Option<f64>,
    current: Option<f64>,
    level: Option<f64>,
}

impl TraceRecord {
    fn into_measurement(self) -> Result<Measurement, String> {
        let device = |d: Option<String>| d.ok_or_else(|| format!("`{}` requires `device`", self.op));
        let number = |v: Option<f64>, column: &str| {
            v.ok_or_else(|| format!("`{}` requires `{column}`", self.op))
        };

        match self.op.as_str() {
            "input" => Ok(Measurement::Input {
                voltage: number(self.voltage, "voltage")?,
                current: number(self.current, "current")?,
            }),
            "connect" => Ok(Measurement::Connect {
                device_id: device(self.device.clone())?,
            }),
            "output" => Ok(Measurement::Output {
                device_id: device(self.device.clone())?,
                voltage: number(self.voltage, "voltage")?,
                current: number(self.current, "current")?,
            }),
            "disconnect" => Ok(Measurement::Disconnect {
                device_id: device(self.device.clone())?,
            }),
            "level" => Ok(Measurement::BatteryLevel {
                capacity_left: number(self.level, "level")?,
            }),
            other => Err(format!(
                "unknown op \"{other}\", expected input, connect, output, disconnect or level"
            )),
        }
    }
}

/// Parses a CSV trace with header `op,device,voltage,current,level`.
///
/// # Errors
///
/// Returns a `TraceError` carrying the line number for malformed rows,
/// unknown operations, or missing required columns.
pub fn parse_trace(reader: impl Read) -> Result<Vec<Measurement>, TraceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut measurements = Vec::new();
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map(csv::Position::line);
        let row: TraceRecord = record.deserialize(Some(&headers))?;
        let measurement = row
            .into_measurement()
            .map_err(|message| TraceError { line, message })?;
        measurements.push(measurement);
    }

    Ok(measurements)
}

/// Reads and parses a CSV trace file.
///
/// # Errors
///
/// Returns a `TraceError` if the file cannot be opened or parsed.
pub fn read_trace_file(path: &Path) -> Result<Vec<Measurement>, TraceError> {
    let file = File::open(path).map_err(|e| TraceError {
        line: None,
        message: format!("cannot read \"{}\": {e}", path.display()),
    })?;
    parse_trace(io::BufReader::new(file))
}

/// Generates a seeded synthetic trace.
///
/// Connects `cfg.devices` outputs (`out_1`, `out_2`, ...), then for each step
/// emits one noisy input sample, one noisy output sample per device, and a
/// battery level obtained by integrating net power over `cfg.interval_hours`.
/// Generated levels stay within `[0, battery_capacity]`. Identical inputs
/// produce identical traces.
pub fn synthetic_trace(params: &StationParams, cfg: &SyntheticConfig) -> Vec<Measurement> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let device_ids: Vec<String> = (1..=cfg.devices).map(|i| format!("out_{i}")).collect();

    let mut trace = Vec::with_capacity(cfg.devices + cfg.steps * (cfg.devices + 2));
    trace.extend(device_ids.iter().map(|id| Measurement::Connect {
        device_id: id.clone(),
    }));

    let mut level = params.initial_level.unwrap_or(params.battery_capacity);
    for _ in 0..cfg.steps {
        let input_current = noisy_current(&mut rng, cfg.input_current_mean, cfg.noise_std);
        trace.push(Measurement::Input {
            voltage: cfg.input_voltage,
            current: input_current,
        });

        let mut output_power = 0.0;
        for id in &device_ids {
            let current = noisy_current(&mut rng, cfg.output_current_mean, cfg.noise_std);
            output_power += cfg.output_voltage * current;
            trace.push(Measurement::Output {
                device_id: id.clone(),
                voltage: cfg.output_voltage,
                current,
            });
        }

        let net_power = cfg.input_voltage * input_current - output_power;
        level = (level + net_power * cfg.interval_hours)
            .min(params.battery_capacity)
            .max(0.0);
        trace.push(Measurement::BatteryLevel {
            capacity_left: level,
        });
    }

    trace
}

/// Mean plus Gaussian noise, floored at zero.
fn noisy_current(rng: &mut StdRng, mean: f64, noise_std: f64) -> f64 {
    (mean + gaussian_noise(rng, noise_std)).max(0.0)
}

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
