//! Command-line option parsing for the station replay harness.

use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub trace: Option<PathBuf>,
    pub seed: Option<u64>,
    pub steps: Option<usize>,
    pub csv_out: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
    pub log_level: Option<String>,
    pub help: bool,
}

/// Parses options from the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid or conflicting argument.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses options from an explicit argument list (program name excluded).
///
/// # Errors
///
/// Returns a message describing the first invalid or conflicting argument.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                set_once(&mut opts.config, PathBuf::from(path), "--config")?;
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--trace" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --trace (expected a CSV file path)")?;
                set_once(&mut opts.trace, PathBuf::from(path), "--trace")?;
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                set_once(&mut opts.seed, seed, "--seed")?;
            }
            "--steps" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --steps (expected a count)")?;
                let steps = raw
                    .parse::<usize>()
                    .map_err(|_| format!("--steps value \"{raw}\" is not a valid count"))?;
                set_once(&mut opts.steps, steps, "--steps")?;
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                set_once(&mut opts.csv_out, PathBuf::from(path), "--out")?;
            }
            "--json" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --json (expected a file path)")?;
                set_once(&mut opts.json_out, PathBuf::from(path), "--json")?;
            }
            "--log-level" => {
                i += 1;
                let level = args.next_or_err(i, "missing value for --log-level")?;
                set_once(&mut opts.log_level, level.to_string(), "--log-level")?;
            }
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("power-station: replay measurements through a power station model");
    eprintln!();
    eprintln!("Usage: power-station [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>       Load station config from a TOML file");
    eprintln!("  --preset <name>       Use a built-in preset (default, lamp, overload)");
    eprintln!("  --trace <path>        Replay measurements from a CSV trace");
    eprintln!("  --seed <u64>          Override the synthetic source seed");
    eprintln!("  --steps <n>           Override the synthetic source step count");
    eprintln!("  --out <path>          Export snapshots to CSV");
    eprintln!("  --json <path>         Export snapshots to JSON");
    eprintln!("  --log-level <level>   off, error, warn, info, debug or trace");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("Without --trace, a seeded synthetic measurement trace is generated.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_args_use_defaults() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert!(opts.config.is_none());
        assert!(opts.preset.is_none());
        assert!(!opts.help);
    }

    #[test]
    fn supports_config_and_outputs() {
        let opts = parse_args_from(&args(&[
            "--config",
            "station.toml",
            "--out",
            "snaps.csv",
            "--json",
            "snaps.json",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("station.toml")
        );
        assert_eq!(
            opts.csv_out.as_deref().and_then(|p| p.to_str()),
            Some("snaps.csv")
        );
        assert_eq!(
            opts.json_out.as_deref().and_then(|p| p.to_str()),
            Some("snaps.json")
        );
    }

    #[test]
    fn parses_numeric_overrides() {
        let opts = parse_args_from(&args(&["--seed", "7", "--steps", "12"]))
            .expect("parse should succeed");
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.steps, Some(12));
    }

    #[test]
    fn rejects_bad_seed() {
        let err = parse_args_from(&args(&["--seed", "abc"])).unwrap_err();
        assert!(err.contains("not a valid u64"));
    }

    #[test]
    fn rejects_config_with_preset() {
        let err =
            parse_args_from(&args(&["--config", "a.toml", "--preset", "lamp"])).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn rejects_repeated_flag() {
        let err = parse_args_from(&args(&["--preset", "lamp", "--preset", "default"]))
            .unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn rejects_missing_value_and_unknown_flag() {
        assert!(parse_args_from(&args(&["--trace"])).is_err());
        let err = parse_args_from(&args(&["--bogus"])).unwrap_err();
        assert_eq!(err, "unknown argument: --bogus");
    }

    #[test]
    fn help_flag_is_recorded() {
        let opts = parse_args_from(&args(&["-h"])).expect("parse should succeed");
        assert!(opts.help);
    }
}
