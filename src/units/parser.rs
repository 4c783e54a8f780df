use crate::units::error::UnitError;
use crate::units::types::{Quantity, SizeUnit};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    /// Decimal number followed by an optional alphabetic suffix.
    /// Examples: "4g", "1.5T", "512", "1024B"
    static ref QUANTITY_PATTERN: Regex = Regex::new(r"^(\d+(?:\.\d+)?)([a-zA-Z]*)$").unwrap();
}

/// Parse a size string such as `"4g"` or `"1.5T"` into a [`Quantity`].
///
/// Strings that do not have the `<number><suffix>` shape are read as a plain
/// number of bytes (`"-5"`, `"1e3"`). A recognised shape with an unknown
/// suffix fails with [`UnitError::InvalidFormat`].
pub fn parse_quantity(text: &str) -> Result<Quantity, UnitError> {
    let Some(caps) = QUANTITY_PATTERN.captures(text) else {
        return parse_plain_bytes(text);
    };

    let magnitude: f64 = caps[1]
        .parse()
        .map_err(|_| UnitError::invalid_format(text))?;
    if !magnitude.is_finite() {
        return Err(UnitError::non_finite(text));
    }

    let suffix = &caps[2];
    let unit = if suffix.is_empty() {
        SizeUnit::B
    } else {
        suffix
            .parse::<SizeUnit>()
            .map_err(|_| UnitError::invalid_format(text))?
    };

    Ok(Quantity::new(magnitude, unit))
}

fn parse_plain_bytes(text: &str) -> Result<Quantity, UnitError> {
    let trimmed = text.trim();
    // f64::from_str accepts "inf" and "NaN"; only digits-bearing input counts
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(UnitError::invalid_format(text));
    }
    let magnitude: f64 = trimmed
        .parse()
        .map_err(|_| UnitError::invalid_format(text))?;
    if !magnitude.is_finite() {
        return Err(UnitError::non_finite(text));
    }
    debug!("'{}' has no unit suffix, reading as {} bytes", text, magnitude);
    Ok(Quantity::bytes(magnitude))
}

/// Check if a string has the `<number><unit letter>` shape without parsing it.
pub fn looks_like_quantity(s: &str) -> bool {
    match QUANTITY_PATTERN.captures(s.trim()) {
        Some(caps) => {
            let suffix = &caps[2];
            suffix.is_empty() || suffix.parse::<SizeUnit>().is_ok()
        }
        None => false,
    }
}
