//! Percentage formatting and parsing.
//!
//! Percentages are stored as whole numbers (`30`) but the grid's number
//! cells carry fractions (`0.3`) with a percent display format, the way a
//! spreadsheet stores `30%`.

use serde::{Deserialize, Serialize};

/// Display format of a percentage number cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentFormat {
    pub max_fraction_digits: u8,
}

impl Default for PercentFormat {
    /// Whole percent, as the zh-CN locale renders `style: "percent"`.
    fn default() -> Self {
        Self {
            max_fraction_digits: 0,
        }
    }
}

impl PercentFormat {
    /// Format a fraction: `0.3` → `"30%"`, `12.5` → `"1,250%"`.
    ///
    /// Halves round away from zero (`0.005` → `"1%"`). Trailing zero
    /// fraction digits are dropped. Non-finite input renders as `0%`.
    pub fn format(self, fraction: f64) -> String {
        let digits = self.max_fraction_digits.min(10);
        let scale = 10f64.powi(i32::from(digits));
        let pct = if fraction.is_finite() {
            let rounded = (fraction * 100.0 * scale).round() / scale;
            if rounded.is_finite() {
                rounded
            } else {
                fraction * 100.0
            }
        } else {
            0.0
        };
        let digits = usize::from(digits);
        let formatted = format_with_thousands(pct, digits);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };
        if trimmed == "-0" {
            return "0%".to_string();
        }
        format!("{trimmed}%")
    }
}

/// Format a whole percentage (`120` → `"120%"`).
pub fn format_whole_percent(percent: u32) -> String {
    PercentFormat::default().format(f64::from(percent) / 100.0)
}

/// Convert a fraction to the nearest whole percent.
///
/// `nan_to_zero` mirrors the number cell flag: NaN reads as 0 instead of
/// being rejected. Returns `None` for non-finite values otherwise, and for
/// values too large to represent.
#[allow(clippy::cast_possible_truncation)]
pub fn fraction_to_percent(fraction: f64, nan_to_zero: bool) -> Option<i64> {
    if fraction.is_nan() && nan_to_zero {
        return Some(0);
    }
    if !fraction.is_finite() {
        return None;
    }
    let rounded = (fraction * 100.0).round();
    if rounded.abs() > 1e15 {
        return None;
    }
    Some(rounded as i64)
}

/// Parse a percentage option value (`"40"`, `" 40 "`, `"40%"`).
pub fn parse_percent_value(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    digits.parse().ok()
}

/// Narrow a parsed percentage to the stored range `0..=100`.
pub fn checked_percentage(value: i64) -> Option<u8> {
    u8::try_from(value).ok().filter(|p| *p <= 100)
}

fn format_with_thousands(value: f64, decimals: usize) -> String {
    let is_negative = value < 0.0;
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let mut with_sep = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_sep.push(',');
        }
        with_sep.push(c);
    }
    let int_with_sep: String = with_sep.chars().rev().collect();

    let result = match dec_part {
        Some(dec) => format!("{int_with_sep}.{dec}"),
        None => int_with_sep,
    };

    if is_negative {
        format!("-{result}")
    } else {
        result
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.3, "30%")]
    #[test_case(1.0, "100%")]
    #[test_case(1.2, "120%")]
    #[test_case(0.0, "0%")]
    #[test_case(0.004, "0%")]
    #[test_case(0.555, "56%")]
    #[test_case(0.005, "1%")]
    #[test_case(0.025, "3%")]
    #[test_case(-0.004, "0%")]
    #[test_case(12.5, "1,250%")]
    #[test_case(f64::NAN, "0%")]
    fn test_format_whole_percent(fraction: f64, expected: &str) {
        assert_eq!(PercentFormat::default().format(fraction), expected);
    }

    #[test]
    fn test_format_with_fraction_digits() {
        let fmt = PercentFormat {
            max_fraction_digits: 2,
        };
        assert_eq!(fmt.format(0.12346), "12.35%");
        assert_eq!(fmt.format(0.5), "50%");
    }

    #[test]
    fn test_format_whole_percent_from_integer() {
        assert_eq!(format_whole_percent(100), "100%");
        assert_eq!(format_whole_percent(120), "120%");
    }

    #[test_case(0.3, Some(30))]
    #[test_case(0.505, Some(51))]
    #[test_case(0.294, Some(29))]
    #[test_case(1.5, Some(150))]
    #[test_case(-0.1, Some(-10))]
    #[test_case(f64::INFINITY, None)]
    fn test_fraction_to_percent(fraction: f64, expected: Option<i64>) {
        assert_eq!(fraction_to_percent(fraction, true), expected);
    }

    #[test]
    fn test_fraction_to_percent_nan() {
        assert_eq!(fraction_to_percent(f64::NAN, true), Some(0));
        assert_eq!(fraction_to_percent(f64::NAN, false), None);
    }

    #[test]
    fn test_parse_percent_value() {
        assert_eq!(parse_percent_value("40"), Some(40));
        assert_eq!(parse_percent_value(" 40% "), Some(40));
        assert_eq!(parse_percent_value("-5"), Some(-5));
        assert_eq!(parse_percent_value("forty"), None);
        assert_eq!(parse_percent_value(""), None);
    }

    #[test]
    fn test_checked_percentage() {
        assert_eq!(checked_percentage(0), Some(0));
        assert_eq!(checked_percentage(100), Some(100));
        assert_eq!(checked_percentage(101), None);
        assert_eq!(checked_percentage(-1), None);
    }
}
