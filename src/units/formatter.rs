/// Truncate `value` toward zero at `digits` fractional digits and drop
/// trailing zeros, working on the decimal string so that `1024.999` becomes
/// `"1024.99"` instead of rounding up to `"1025.00"`.
pub fn truncate_fraction(value: f64, digits: usize) -> String {
    // f64 Display never switches to exponent notation
    let text = value.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let kept = &frac_part[..frac_part.len().min(digits)];
    let kept = kept.trim_end_matches('0');

    let formatted = if kept.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, kept)
    };

    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

/// Round `value` to `digits` fractional digits, zero padded.
pub fn round_fraction(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value)
}

pub fn format_fraction(value: f64, digits: usize, rounding: bool) -> String {
    if rounding {
        round_fraction(value, digits)
    } else {
        truncate_fraction(value, digits)
    }
}

/// Percentage of `total` taken by `used`, truncated to `digits` and clamped
/// to `0..=100`. `None` when the ratio is undefined.
pub fn usage_percent(used: f64, total: f64, digits: usize) -> Option<String> {
    if !used.is_finite() || !total.is_finite() || total <= 0.0 {
        return None;
    }
    let percent = (used / total * 100.0).clamp(0.0, 100.0);
    Some(truncate_fraction(percent, digits))
}
