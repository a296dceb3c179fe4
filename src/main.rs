//! Power station replay harness: config loading, trace replay, export.

use std::path::Path;
use std::process;

use log::{info, warn};

use power_station::cli::{self, CliOptions};
use power_station::config::StationConfig;
use power_station::io::export::{export_csv, export_json};
use power_station::runner::replay;
use power_station::trace::{read_trace_file, synthetic_trace};

fn load_config(opts: &CliOptions) -> StationConfig {
    let loaded = if let Some(ref path) = opts.config {
        StationConfig::from_toml_file(path)
    } else if let Some(ref name) = opts.preset {
        StationConfig::from_preset(name)
    } else {
        Ok(StationConfig::default_preset())
    };

    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if opts.help {
        cli::print_usage();
        return;
    }

    let mut config = load_config(&opts);

    if let Some(seed) = opts.seed {
        config.synthetic.seed = seed;
    }
    if let Some(steps) = opts.steps {
        config.synthetic.steps = steps;
    }
    if let Some(ref level) = opts.log_level {
        config.logging.level = level.clone();
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if let Ok(level) = config.logging.level_filter() {
        if let Err(e) = env_logger::Builder::new().filter_level(level).try_init() {
            eprintln!("warning: logger already installed: {e}");
        }
    }

    let trace = match opts.trace {
        Some(ref path) => match read_trace_file(path) {
            Ok(trace) => trace,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => {
            info!(
                "generating synthetic trace: {} steps, {} devices, seed {}",
                config.synthetic.steps, config.synthetic.devices, config.synthetic.seed
            );
            synthetic_trace(&config.station, &config.synthetic)
        }
    };
    if trace.is_empty() {
        warn!("trace contains no measurements");
    }

    let mut station = config.build_station();
    let snapshots = replay(&mut station, &trace);

    for s in &snapshots {
        println!("{s}");
    }

    println!("\n--- Final State ---");
    println!("Status:          {}", station.status());
    println!("Battery:         {:.1}%", station.battery_percentage());
    println!("Output power:    {:.0} W", station.total_output_power());
    println!("Time remaining:  {}", station.time_remaining());
    println!("Devices:         {}", station.connected_devices().len());

    if let Some(ref path) = opts.csv_out {
        if let Err(e) = export_csv(&snapshots, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Snapshots written to {}", path.display());
    }

    if let Some(ref path) = opts.json_out {
        if let Err(e) = export_json(&snapshots, Path::new(path)) {
            eprintln!("error: failed to write JSON: {e}");
            process::exit(1);
        }
        eprintln!("Snapshots written to {}", path.display());
    }
}
