//! Label formatting capabilities.
//!
//! The pipeline never formats on its own: axis labels go through a
//! [`TimeFormatter`] and range labels through a [`NumberFormatter`], so callers
//! decide on time zones and number layout.

use chrono::{Local, TimeZone, Utc};

use crate::models::time::to_datetime;
use crate::models::Timestamp;

/// Largest significant digit count accepted for range labels.
pub const MAX_PRECISION: u32 = 21;

/// Turns a timestamp into an axis label.
pub trait TimeFormatter: Send + Sync {
    fn format(&self, t: Timestamp) -> String;
}

/// Turns a value into a range label, optionally rounded to significant digits.
pub trait NumberFormatter: Send + Sync {
    fn format(&self, value: f64, precision: Option<u32>) -> String;
}

/// `2024-01-31 12:00:00 UTC`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcTimeFormatter;

impl TimeFormatter for UtcTimeFormatter {
    fn format(&self, t: Timestamp) -> String {
        match to_datetime(t) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => t.to_string(),
        }
    }
}

/// Host local time, `2024-01-31 13:00:00 +01:00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeFormatter;

impl TimeFormatter for LocalTimeFormatter {
    fn format(&self, t: Timestamp) -> String {
        match Utc.timestamp_millis_opt(t).single() {
            Some(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %:z")
                .to_string(),
            None => t.to_string(),
        }
    }
}

/// Significant-digit layout in the style of `Number.prototype.toPrecision`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignificantDigits;

impl NumberFormatter for SignificantDigits {
    fn format(&self, value: f64, precision: Option<u32>) -> String {
        match precision {
            Some(digits) => to_precision(value, digits),
            None => format_raw(value),
        }
    }
}

fn format_raw(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

/// `x * 10^k` without overflowing the intermediate power for large `k`.
fn scale_pow10(x: f64, k: i32) -> f64 {
    if k > 300 {
        x * 1e300 * 10f64.powi(k - 300)
    } else if k >= 0 {
        x * 10f64.powi(k)
    } else if k < -300 {
        x / 1e300 / 10f64.powi(-k - 300)
    } else {
        x / 10f64.powi(-k)
    }
}

/// Decimal digits of `magnitude` rounded half away from zero to `digits`
/// significant places, with the decimal exponent of the first digit.
fn significant_parts(magnitude: f64, digits: u32) -> (String, i32) {
    let p = digits as i32;
    let mut exponent = magnitude.log10().floor() as i32;
    let mut mantissa = scale_pow10(magnitude, p - 1 - exponent).round();

    // Rounding can carry into a new leading digit (9.99 -> 10.0), and log10
    // can land one below an exact power of ten.
    if mantissa >= 10f64.powi(p) {
        exponent += 1;
        mantissa = scale_pow10(magnitude, p - 1 - exponent).round();
    } else if mantissa < 10f64.powi(p - 1) {
        exponent -= 1;
        mantissa = scale_pow10(magnitude, p - 1 - exponent).round();
    }

    let mut text = format!("{:.0}", mantissa);
    text.truncate(digits as usize);
    while text.len() < digits as usize {
        text.push('0');
    }
    (text, exponent)
}

/// Format `value` with `digits` significant digits.
///
/// Fixed notation is used unless the exponent is below -6 or at least
/// `digits`, in which case the result looks like `1.2e+5`. `digits` is
/// clamped to `1..=MAX_PRECISION`.
pub fn to_precision(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return format_raw(value);
    }
    let digits = digits.clamp(1, MAX_PRECISION);

    if value == 0.0 {
        return if digits == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(digits as usize - 1))
        };
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (text, exponent) = significant_parts(value.abs(), digits);
    let p = digits as i32;

    if exponent < -6 || exponent >= p {
        let (lead, rest) = text.split_at(1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}{}e{}{}", sign, lead, exp_sign, exponent.abs())
        } else {
            format!("{}{}.{}e{}{}", sign, lead, rest, exp_sign, exponent.abs())
        }
    } else if exponent >= 0 {
        let (int_part, frac_part) = text.split_at(exponent as usize + 1);
        if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{}0.{}{}", sign, zeros, text)
    }
}

/// Round `value` to `digits` significant digits, half away from zero.
pub fn round_significant(value: f64, digits: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    to_precision(value, digits).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_precision_fixed() {
        assert_eq!(to_precision(12.5, 5), "12.500");
        assert_eq!(to_precision(12.6, 3), "12.6");
        assert_eq!(to_precision(123.456, 4), "123.5");
        assert_eq!(to_precision(-0.5, 2), "-0.50");
        assert_eq!(to_precision(0.000123, 2), "0.00012");
    }

    #[test]
    fn test_to_precision_exponential() {
        assert_eq!(to_precision(123456.0, 2), "1.2e+5");
        assert_eq!(to_precision(100.0, 1), "1e+2");
        assert_eq!(to_precision(0.00000012, 2), "1.2e-7");
    }

    #[test]
    fn test_to_precision_rounds_half_away_from_zero() {
        assert_eq!(to_precision(1.25, 2), "1.3");
        assert_eq!(to_precision(-1.25, 2), "-1.3");
        assert_eq!(to_precision(2.5, 1), "3");
    }

    #[test]
    fn test_to_precision_carry() {
        assert_eq!(to_precision(9.99, 2), "10");
        assert_eq!(to_precision(99.96, 3), "100");
        assert_eq!(to_precision(999.6, 3), "1.00e+3");
    }

    #[test]
    fn test_to_precision_zero_and_non_finite() {
        assert_eq!(to_precision(0.0, 1), "0");
        assert_eq!(to_precision(0.0, 3), "0.00");
        assert_eq!(to_precision(f64::NAN, 3), "NaN");
        assert_eq!(to_precision(f64::NEG_INFINITY, 3), "-Infinity");
    }

    #[test]
    fn test_round_significant() {
        assert_eq!(round_significant(12.3456, 3), 12.3);
        assert_eq!(round_significant(-273.149, 4), -273.1);
        assert_eq!(round_significant(123456.0, 2), 120000.0);
        assert!(round_significant(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_number_formatter_without_precision() {
        let fmt = SignificantDigits;
        assert_eq!(fmt.format(12.6, None), "12.6");
        assert_eq!(fmt.format(12600.0, None), "12600");
        assert_eq!(fmt.format(12.6, Some(5)), "12.600");
    }

    #[test]
    fn test_utc_time_formatter() {
        assert_eq!(UtcTimeFormatter.format(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(UtcTimeFormatter.format(86_400_000), "1970-01-02 00:00:00 UTC");
        assert_eq!(UtcTimeFormatter.format(i64::MAX), i64::MAX.to_string());
    }
}
