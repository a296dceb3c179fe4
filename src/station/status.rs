use std::fmt;

use serde::Serialize;

/// Operating status of a power station, derived from its power flows.
///
/// Overload takes priority over every other classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Input or output power exceeds the station's rated limit.
    Overload,
    /// Input power exceeds output power.
    Charging,
    /// Output power exceeds input power.
    Discharging,
    /// Input and output power are equal (including both zero).
    Idle,
}

impl Status {
    /// Classifies the given power flows against the station limits.
    pub(crate) fn classify(
        input: f64,
        output: f64,
        maximum_input: f64,
        maximum_output: f64,
    ) -> Self {
        if input > maximum_input || output > maximum_output {
            Self::Overload
        } else if input > output {
            Self::Charging
        } else if input < output {
            Self::Discharging
        } else {
            Self::Idle
        }
    }

    /// Returns the lowercase label used in displays and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overload => "overload",
            Self::Charging => "charging",
            Self::Discharging => "discharging",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
