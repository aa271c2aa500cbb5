//! Conversion between decimal-hours text, integer seconds and whole-hour display.
//!
//! Rounding policy for both directions is round-half-up (toward positive
//! infinity on ties): `0.5 -> 1`, `-0.5 -> 0`, `-1.5 -> -1`.

use crate::error::{ReportError, Result};

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Parse a decimal-hours field such as `"1,5"` or `"2.25"` into seconds.
///
/// Absent or blank input is zero. The first decimal comma is read as a point.
pub fn parse_decimal_hours_to_seconds(text: Option<&str>) -> Result<i64> {
    let raw = match text.map(str::trim) {
        None | Some("") => return Ok(0),
        Some(raw) => raw,
    };
    let normalized = raw.replacen(',', ".", 1);
    let hours: f64 = normalized.parse().map_err(|_| ReportError::InvalidHours {
        value: raw.to_string(),
    })?;
    let seconds = round_half_up(hours * SECONDS_PER_HOUR as f64);
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if !seconds.is_finite() || seconds < i64::MIN as f64 || seconds >= i64::MAX as f64 {
        return Err(ReportError::InvalidHours {
            value: raw.to_string(),
        });
    }
    Ok(seconds as i64)
}

/// Whole hours for display, sign preserved.
pub fn format_seconds_to_hours(seconds: i64) -> String {
    // floor((s + 1800) / 3600), widened so 2 * s cannot overflow
    let per_hour = i128::from(SECONDS_PER_HOUR);
    let hours = (2 * i128::from(seconds) + per_hour).div_euclid(2 * per_hour);
    hours.to_string()
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
