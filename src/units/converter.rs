use crate::units::error::UnitError;
use crate::units::formatter::format_fraction;
use crate::units::parser::parse_quantity;
use crate::units::types::{ConvertOptions, ConvertedQuantity, Quantity, SizeBase, SizeUnit, TargetUnit};
use serde::{Deserialize, Serialize};

/// Decides which unit an `auto` conversion lands in.
pub trait AutoUnitPolicy {
    fn resolve(&self, quantity: &Quantity, base: SizeBase) -> SizeUnit;
}

impl<F> AutoUnitPolicy for F
where
    F: Fn(&Quantity, SizeBase) -> SizeUnit,
{
    fn resolve(&self, quantity: &Quantity, base: SizeBase) -> SizeUnit {
        self(quantity, base)
    }
}

/// Keeps the source unit, so `auto` performs no conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameUnit;

impl AutoUnitPolicy for SameUnit {
    fn resolve(&self, quantity: &Quantity, _base: SizeBase) -> SizeUnit {
        quantity.unit
    }
}

/// Picks the largest unit in which the magnitude is at least 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestWhole;

impl AutoUnitPolicy for LargestWhole {
    fn resolve(&self, quantity: &Quantity, base: SizeBase) -> SizeUnit {
        let bytes = quantity.to_bytes(base).abs();
        SizeUnit::ALL
            .iter()
            .rev()
            .copied()
            .find(|unit| bytes >= unit.factor(base))
            .unwrap_or(SizeUnit::B)
    }
}

/// Named auto policies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoUnit {
    #[default]
    Same,
    Largest,
}

impl AutoUnitPolicy for AutoUnit {
    fn resolve(&self, quantity: &Quantity, base: SizeBase) -> SizeUnit {
        match self {
            AutoUnit::Same => SameUnit.resolve(quantity, base),
            AutoUnit::Largest => LargestWhole.resolve(quantity, base),
        }
    }
}

/// Convert an already parsed quantity. `auto` is resolved with `policy`.
/// Fails with `NonFinite` when the converted magnitude overflows.
pub fn convert_with_policy(
    quantity: &Quantity,
    target: TargetUnit,
    options: &ConvertOptions,
    policy: &dyn AutoUnitPolicy,
) -> Result<ConvertedQuantity, UnitError> {
    let unit = match target {
        TargetUnit::Unit(unit) => unit,
        TargetUnit::Auto => policy.resolve(quantity, options.base),
    };

    let number = quantity.try_in_unit(unit, options.base)?.magnitude;
    let number_fixed = format_fraction(number, options.fraction_digits, options.rounding);
    let number_unit = format!("{}{}", number_fixed, unit);

    Ok(ConvertedQuantity {
        number,
        number_fixed,
        unit,
        number_unit,
    })
}

/// Convert a quantity, treating `auto` as "keep the source unit".
pub fn convert_quantity(
    quantity: &Quantity,
    target: TargetUnit,
    options: &ConvertOptions,
) -> Result<ConvertedQuantity, UnitError> {
    convert_with_policy(quantity, target, options, &SameUnit)
}

/// Parse and convert a size string. Absent input yields `Ok(None)` so call
/// sites can chain on the display value without checking first.
pub fn convert(
    text: Option<&str>,
    target: TargetUnit,
    options: &ConvertOptions,
) -> Result<Option<ConvertedQuantity>, UnitError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let quantity = parse_quantity(text)?;
    convert_quantity(&quantity, target, options).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilobyte_to_bytes_without_fraction() {
        let converted = convert_quantity(
            &Quantity::new(1.0, SizeUnit::K),
            SizeUnit::B.into(),
            &ConvertOptions::with_digits(0),
        )
        .unwrap();
        assert_eq!(converted.number, 1024.0);
        assert_eq!(converted.number_fixed, "1024");
        assert_eq!(converted.unit, SizeUnit::B);
        assert_eq!(converted.number_unit, "1024B");
    }

    #[test]
    fn test_truncation_versus_rounding() {
        let truncated = convert(Some("1025B"), SizeUnit::K.into(), &ConvertOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(truncated.number_fixed, "1");

        let rounded = convert(
            Some("1025B"),
            SizeUnit::K.into(),
            &ConvertOptions::default().rounded(),
        )
        .unwrap()
        .unwrap();
        assert!(rounded.number_fixed.starts_with("1.0"));
        assert_eq!(rounded.number_fixed, "1.00");

        let truncated = convert(Some("1048575B"), SizeUnit::K.into(), &ConvertOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(truncated.number_fixed, "1023.99");
    }

    #[test]
    fn test_none_passes_through() {
        assert_eq!(
            convert(None, SizeUnit::G.into(), &ConvertOptions::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_invalid_suffix_propagates() {
        assert!(matches!(
            convert(Some("12q"), SizeUnit::G.into(), &ConvertOptions::default()),
            Err(UnitError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_overflowing_conversion_fails() {
        let huge = format!("1{}E", "0".repeat(300));
        assert!(matches!(
            convert(Some(&huge), SizeUnit::B.into(), &ConvertOptions::default()),
            Err(UnitError::NonFinite { .. })
        ));

        // Staying in the source unit needs no arithmetic
        let same = convert(Some(&huge), TargetUnit::Auto, &ConvertOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(same.unit, SizeUnit::E);
        assert!(same.number.is_finite());
    }

    #[test]
    fn test_auto_keeps_source_unit_by_default() {
        let converted = convert(Some("2048m"), TargetUnit::Auto, &ConvertOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(converted.unit, SizeUnit::M);
        assert_eq!(converted.number_unit, "2048M");
    }

    #[test]
    fn test_auto_largest_whole_unit() {
        let q = parse_quantity("2048m").unwrap();
        let converted =
            convert_with_policy(&q, TargetUnit::Auto, &ConvertOptions::default(), &LargestWhole)
                .unwrap();
        assert_eq!(converted.number_unit, "2G");

        let q = parse_quantity("1023").unwrap();
        assert_eq!(LargestWhole.resolve(&q, SizeBase::Binary), SizeUnit::B);
        assert_eq!(LargestWhole.resolve(&Quantity::bytes(0.0), SizeBase::Binary), SizeUnit::B);
    }

    #[test]
    fn test_auto_with_closure_policy() {
        let always_giga = |_: &Quantity, _: SizeBase| SizeUnit::G;
        let converted = convert_with_policy(
            &Quantity::new(512.0, SizeUnit::M),
            TargetUnit::Auto,
            &ConvertOptions::default(),
            &always_giga,
        )
        .unwrap();
        assert_eq!(converted.number_unit, "0.5G");
    }

    #[test]
    fn test_decimal_base() {
        let options = ConvertOptions {
            base: SizeBase::Decimal,
            ..ConvertOptions::default()
        };
        let converted = convert(Some("1500k"), SizeUnit::M.into(), &options)
            .unwrap()
            .unwrap();
        assert_eq!(converted.number_unit, "1.5M");
    }

    #[test]
    fn test_round_trip_all_unit_pairs() {
        let options = ConvertOptions::default();
        for magnitude in [0.0, 1.0, 3.75, 1000.0, 123456.789] {
            for from in SizeUnit::ALL {
                for to in SizeUnit::ALL {
                    let there =
                        convert_quantity(&Quantity::new(magnitude, from), to.into(), &options)
                            .unwrap();
                    let back = convert_quantity(
                        &Quantity::new(there.number, to),
                        from.into(),
                        &options,
                    )
                    .unwrap();
                    let tolerance = magnitude.abs() * 1e-12;
                    assert!(
                        (back.number - magnitude).abs() <= tolerance,
                        "{}{} -> {} -> {} gave {}",
                        magnitude,
                        from,
                        to,
                        from,
                        back.number
                    );
                }
            }
        }
    }
}
