//! Rounding and duration formatting shared by the station's derived values.

/// Displayed when no meaningful estimate exists.
pub(crate) const NO_ESTIMATE: &str = "99:59";

/// Longest duration, in hours, that still fits the `HH:MM` display.
const MAX_DISPLAY_HOURS: f64 = 99.983;

/// Rounds to the nearest integer with ties going towards positive infinity.
///
/// `f64::round` sends ties away from zero, which differs for negative halves
/// (`-2.5` becomes `-3.0` there, `-2.0` here).
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    // `value - floor` is exact; adding 0.5 first would round again
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Formats a duration in hours as a zero-padded `HH:MM` string.
///
/// Non-finite durations and anything beyond `99:59` collapse to
/// [`NO_ESTIMATE`].
pub(crate) fn format_charge_time(hours: f64) -> String {
    if !hours.is_finite() || hours > MAX_DISPLAY_HOURS {
        return NO_ESTIMATE.to_string();
    }

    // Kept in f64: negative durations are unbounded below and must not
    // saturate through an integer cast. `+ 0.0` turns `-0.0` into `0.0`.
    let total_minutes = round_half_up(hours * 60.0);
    let hh = (total_minutes / 60.0).floor() + 0.0;
    let mm = total_minutes % 60.0 + 0.0;
    format!("{hh:02}:{mm:02}")
}
