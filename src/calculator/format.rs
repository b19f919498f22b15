//! Number formatting for display and clipboard.

use super::separators::{Separator, SeparatorConfig};

/// Significant digits an f64 reliably carries.
const SIGNIFICANT_DIGITS: usize = 15;

/// Upper bound on fractional digits kept before trailing zeros are trimmed.
const MAX_FRACTION_DIGITS: usize = 10;

/// Format a number for display: integer part grouped by the thousand
/// separator, fraction after the decimal point. The fraction is omitted when
/// the value has none or the decimal point is disabled.
pub fn format_display(value: f64, config: &SeparatorConfig) -> String {
    let (int_part, mut frac_part) = split_trimmed(value);
    let point = config.decimal_point.as_char();
    if point.is_none() {
        frac_part.clear();
    }

    let mut out = String::new();
    if is_negative(value, &int_part, &frac_part) {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, config.thousand_separator));

    if let Some(point) = point
        && !frac_part.is_empty()
    {
        out.push(point);
        out.push_str(&frac_part);
    }

    out
}

/// Format a number for the clipboard (raw number, no separators).
pub fn format_clipboard(value: f64) -> String {
    let (int_part, frac_part) = split_trimmed(value);
    let sign = if is_negative(value, &int_part, &frac_part) {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// A minus sign is printed unless the rendered digits are all zero.
fn is_negative(value: f64, int_part: &str, frac_part: &str) -> bool {
    value.is_sign_negative() && !(int_part == "0" && frac_part.is_empty())
}

/// Absolute value as (integer digits, fraction digits without trailing zeros),
/// rounded to [`SIGNIFICANT_DIGITS`] so representation noise never shows.
fn split_trimmed(value: f64) -> (String, String) {
    let abs = value.abs();
    let int_digits = format!("{:.0}", abs.trunc()).len();
    let precision = SIGNIFICANT_DIGITS
        .saturating_sub(int_digits)
        .min(MAX_FRACTION_DIGITS);

    let formatted = format!("{:.*}", precision, abs);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Insert `separator` between every group of three digits, counting from the right.
fn group_digits(digits: &str, separator: Separator) -> String {
    let Some(sep) = separator.as_char() else {
        return digits.to_string();
    };

    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
