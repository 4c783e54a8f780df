use crate::units::error::UnitError;
use crate::units::parser::parse_quantity;
use crate::units::types::{Quantity, SizeBase, SizeUnit};
use std::cmp::Ordering;

/// Unit both sides are brought to when their suffixes differ.
const COMMON_UNIT: SizeUnit = SizeUnit::G;

/// Compare two size strings by magnitude, e.g. `"256m" < "1g"`.
///
/// Quantities written in the same unit are compared directly, skipping the
/// floating point conversion. Fails with `NonFinite` when a side overflows
/// in the common unit.
pub fn compare_quantities(a: &str, b: &str) -> Result<Ordering, UnitError> {
    let left = parse_quantity(a)?;
    let right = parse_quantity(b)?;

    if left.unit == right.unit {
        return Ok(total_order(left.magnitude, right.magnitude));
    }
    if left.magnitude == 0.0 && right.magnitude == 0.0 {
        return Ok(Ordering::Equal);
    }

    let left = left.try_in_unit(COMMON_UNIT, SizeBase::Binary)?.magnitude;
    let right = right.try_in_unit(COMMON_UNIT, SizeBase::Binary)?.magnitude;
    Ok(total_order(left, right))
}

// Both sides are finite by now
fn total_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// `a + b`, expressed in `target`.
pub fn add_quantities(a: &str, b: &str, target: SizeUnit) -> Result<Quantity, UnitError> {
    combine(a, b, target, |x, y| x + y)
}

/// `a - b`, expressed in `target`. The result may be negative.
pub fn sub_quantities(a: &str, b: &str, target: SizeUnit) -> Result<Quantity, UnitError> {
    combine(a, b, target, |x, y| x - y)
}

fn combine<F>(a: &str, b: &str, target: SizeUnit, op: F) -> Result<Quantity, UnitError>
where
    F: FnOnce(f64, f64) -> f64,
{
    let left = parse_quantity(a)?.try_in_unit(target, SizeBase::Binary)?;
    let right = parse_quantity(b)?.try_in_unit(target, SizeBase::Binary)?;
    let result = Quantity::new(op(left.magnitude, right.magnitude), target);
    if !result.magnitude.is_finite() {
        return Err(UnitError::non_finite(result.to_string()));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_unit_fast_path() {
        assert_eq!(compare_quantities("4g", "8G").unwrap(), Ordering::Less);
        assert_eq!(compare_quantities("8g", "8G").unwrap(), Ordering::Equal);
        assert_eq!(compare_quantities("1.5t", "1t").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_mixed_units() {
        assert_eq!(compare_quantities("1024m", "1g").unwrap(), Ordering::Equal);
        assert_eq!(compare_quantities("1025m", "1g").unwrap(), Ordering::Greater);
        assert_eq!(compare_quantities("512k", "1m").unwrap(), Ordering::Less);
    }

    #[test]
    fn test_memory_string_below_raw_byte_count() {
        assert_eq!(
            compare_quantities("256m", "9007199254740991").unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_zero_in_any_unit_is_equal() {
        assert_eq!(compare_quantities("0g", "0").unwrap(), Ordering::Equal);
        assert_eq!(compare_quantities("0E", "0k").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_comparison_is_antisymmetric() {
        let samples = ["0", "1", "1k", "1023", "256m", "1g", "1.5g", "2T", "9007199254740991", "1e"];
        for a in samples {
            for b in samples {
                let forward = compare_quantities(a, b).unwrap();
                let backward = compare_quantities(b, a).unwrap();
                assert_eq!(forward, backward.reverse(), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_invalid_input_fails() {
        assert!(compare_quantities("4x", "1g").is_err());
        assert!(compare_quantities("1g", "abc").is_err());
    }

    #[test]
    fn test_overflow_in_common_unit_fails() {
        let huge = format!("1{}E", "0".repeat(300));
        let huger = format!("2{}E", "0".repeat(300));
        assert!(matches!(
            compare_quantities(&huge, "1k"),
            Err(UnitError::NonFinite { .. })
        ));
        assert!(matches!(
            compare_quantities(&huge, &format!("2{}P", "0".repeat(302))),
            Err(UnitError::NonFinite { .. })
        ));

        // Same unit on both sides never leaves the parsed magnitudes
        assert_eq!(compare_quantities(&huge, &huger).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_add_overflow_fails() {
        let near_max = format!("{}g", f64::MAX);
        assert!(matches!(
            add_quantities(&near_max, &near_max, SizeUnit::G),
            Err(UnitError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_add_and_sub() {
        let sum = add_quantities("512m", "1g", SizeUnit::G).unwrap();
        assert_eq!(sum, Quantity::new(1.5, SizeUnit::G));

        let remaining = sub_quantities("4g", "1024m", SizeUnit::M).unwrap();
        assert_eq!(remaining, Quantity::new(3072.0, SizeUnit::M));

        let negative = sub_quantities("1g", "2g", SizeUnit::G).unwrap();
        assert_eq!(negative.magnitude, -1.0);
    }
}
