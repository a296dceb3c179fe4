//! TOML-based station configuration and preset definitions.

use std::fs;
use std::path::Path;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::station::PowerStation;

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults matching the `default` preset. Load from TOML
/// with [`StationConfig::from_toml_file`] or pick a preset with
/// [`StationConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    /// Station capacity and rated limits.
    #[serde(default)]
    pub station: StationParams,
    /// Synthetic measurement source parameters.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Station capacity and rated limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationParams {
    /// Nominal battery energy (Wh, must be > 0).
    pub battery_capacity: f64,
    /// Rated input power (W, must be > 0).
    pub maximum_input: f64,
    /// Rated output power (W, must be > 0).
    pub maximum_output: f64,
    /// Stored energy at start (Wh); full when absent.
    pub initial_level: Option<f64>,
}

impl Default for StationParams {
    fn default() -> Self {
        Self {
            battery_capacity: 2000.0,
            maximum_input: 500.0,
            maximum_output: 800.0,
            initial_level: None,
        }
    }
}

/// Synthetic measurement source parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Number of sampling rounds (must be > 0).
    pub steps: usize,
    /// Random seed.
    pub seed: u64,
    /// Number of output devices to connect.
    pub devices: usize,
    /// Charger voltage (V).
    pub input_voltage: f64,
    /// Mean charger current (A).
    pub input_current_mean: f64,
    /// Output voltage per device (V).
    pub output_voltage: f64,
    /// Mean output current per device (A).
    pub output_current_mean: f64,
    /// Gaussian noise standard deviation applied to every current sample (A).
    pub noise_std: f64,
    /// Time between sampling rounds (hours, must be > 0).
    pub interval_hours: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            steps: 24,
            seed: 42,
            devices: 2,
            input_voltage: 150.0,
            input_current_mean: 1.0,
            output_voltage: 12.0,
            output_current_mean: 8.0,
            noise_std: 0.5,
            interval_hours: 0.25,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parses the configured level.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the level name is not recognised.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.level.parse::<LevelFilter>().map_err(|_| {
            ConfigError::new(
                "logging.level",
                format!(
                    "must be one of off, error, warn, info, debug, trace; got \"{}\"",
                    self.level
                ),
            )
        })
    }
}

impl StationConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "lamp", "overload"];

    /// Portable station matching the default parameters.
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// Small station powering a single 60 W lamp from a partly drained battery.
    pub fn lamp() -> Self {
        Self {
            station: StationParams {
                battery_capacity: 500.0,
                maximum_input: 200.0,
                maximum_output: 150.0,
                initial_level: Some(496.0),
            },
            synthetic: SyntheticConfig {
                devices: 1,
                input_current_mean: 0.0,
                output_current_mean: 5.0,
                noise_std: 0.1,
                ..SyntheticConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Tight limits with heavy loads, so samples regularly trip overload.
    pub fn overload() -> Self {
        Self {
            station: StationParams {
                battery_capacity: 1000.0,
                maximum_input: 200.0,
                maximum_output: 300.0,
                initial_level: Some(800.0),
            },
            synthetic: SyntheticConfig {
                devices: 3,
                input_voltage: 100.0,
                input_current_mean: 1.8,
                output_current_mean: 9.0,
                noise_std: 1.5,
                ..SyntheticConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "lamp" => Ok(Self::lamp()),
            "overload" => Ok(Self::overload()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns every violation found.
    ///
    /// Returns an empty vector if the configuration is valid. The station
    /// model accepts any values; this is where nonsense is rejected.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let st = &self.station;
        for (field, value) in [
            ("station.battery_capacity", st.battery_capacity),
            ("station.maximum_input", st.maximum_input),
            ("station.maximum_output", st.maximum_output),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                errors.push(ConfigError::new(field, "must be a finite value > 0"));
            }
        }
        if let Some(level) = st.initial_level {
            if !(0.0..=st.battery_capacity).contains(&level) {
                errors.push(ConfigError::new(
                    "station.initial_level",
                    "must be in [0, station.battery_capacity]",
                ));
            }
        }

        let syn = &self.synthetic;
        if syn.steps == 0 {
            errors.push(ConfigError::new("synthetic.steps", "must be > 0"));
        }
        // negated comparisons so NaN fails too
        if !(syn.noise_std >= 0.0) {
            errors.push(ConfigError::new("synthetic.noise_std", "must be >= 0"));
        }
        if !(syn.interval_hours > 0.0) {
            errors.push(ConfigError::new("synthetic.interval_hours", "must be > 0"));
        }
        if !(syn.input_current_mean >= 0.0) {
            errors.push(ConfigError::new("synthetic.input_current_mean", "must be >= 0"));
        }
        if !(syn.output_current_mean >= 0.0) {
            errors.push(ConfigError::new("synthetic.output_current_mean", "must be >= 0"));
        }

        if let Err(e) = self.logging.level_filter() {
            errors.push(e);
        }

        errors
    }

    /// Builds a station from the configured parameters.
    ///
    /// Applies `initial_level` when set; otherwise the station starts full.
    pub fn build_station(&self) -> PowerStation {
        let st = &self.station;
        let mut station =
            PowerStation::new(st.battery_capacity, st.maximum_input, st.maximum_output);
        if let Some(level) = st.initial_level {
            station.update_battery_level(level);
        }
        station
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_valid() {
        let cfg = StationConfig::default_preset();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = StationConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in StationConfig::PRESETS {
            let cfg = StationConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[station]
battery_capacity = 1500.0
maximum_input = 300.0
maximum_output = 600.0
initial_level = 750.0

[synthetic]
steps = 48
seed = 7
devices = 4
input_voltage = 48.0
input_current_mean = 5.0
output_voltage = 5.0
output_current_mean = 2.0
noise_std = 0.2
interval_hours = 0.5

[logging]
level = "debug"
"#;
        let cfg = StationConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(
            cfg.as_ref().map(|c| c.station.battery_capacity),
            Some(1500.0)
        );
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.devices), Some(4));
        assert_eq!(cfg.as_ref().map(|c| &*c.logging.level), Some("debug"));
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
[station]
battery_capacity = 1000.0
voltage = 12.0
"#;
        assert!(StationConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[synthetic]
seed = 99
"#;
        let cfg = StationConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.steps), Some(24));
        assert_eq!(
            cfg.as_ref().map(|c| c.station.maximum_output),
            Some(800.0)
        );
        assert_eq!(cfg.as_ref().and_then(|c| c.station.initial_level), None);
    }

    #[test]
    fn validation_catches_non_positive_limits() {
        let mut cfg = StationConfig::default();
        cfg.station.battery_capacity = 0.0;
        cfg.station.maximum_input = -5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "station.battery_capacity"));
        assert!(errors.iter().any(|e| e.field == "station.maximum_input"));
        assert!(!errors.iter().any(|e| e.field == "station.maximum_output"));
    }

    #[test]
    fn validation_catches_initial_level_above_capacity() {
        let mut cfg = StationConfig::default();
        cfg.station.initial_level = Some(2500.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "station.initial_level"));
    }

    #[test]
    fn validation_catches_bad_log_level() {
        let mut cfg = StationConfig::default();
        cfg.logging.level = "chatty".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validation_catches_zero_steps() {
        let mut cfg = StationConfig::default();
        cfg.synthetic.steps = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.steps"));
    }

    #[test]
    fn validation_names_each_current_mean() {
        let mut cfg = StationConfig::default();
        cfg.synthetic.output_current_mean = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.output_current_mean"));
        assert!(!errors.iter().any(|e| e.field == "synthetic.input_current_mean"));
    }

    #[test]
    fn validation_rejects_nan_from_toml() {
        let toml = r#"
[synthetic]
noise_std = nan
interval_hours = nan
"#;
        let cfg = StationConfig::from_toml_str(toml).expect("nan is valid TOML");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.noise_std"));
        assert!(errors.iter().any(|e| e.field == "synthetic.interval_hours"));
    }

    #[test]
    fn level_filter_parses_case_insensitively() {
        let logging = LoggingConfig {
            level: "WARN".to_string(),
        };
        assert_eq!(logging.level_filter().ok(), Some(LevelFilter::Warn));
    }

    #[test]
    fn build_station_applies_initial_level() {
        let station = StationConfig::lamp().build_station();
        assert_eq!(station.battery_capacity(), 500.0);
        assert_eq!(station.current_capacity(), 496.0);
        assert_eq!(station.battery_percentage(), 99.2);

        let full = StationConfig::default().build_station();
        assert_eq!(full.battery_percentage(), 100.0);
    }
}
