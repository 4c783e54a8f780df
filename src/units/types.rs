use crate::units::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magnitude prefix of a byte quantity, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    B,
    K,
    M,
    G,
    T,
    P,
    E,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 7] = [
        SizeUnit::B,
        SizeUnit::K,
        SizeUnit::M,
        SizeUnit::G,
        SizeUnit::T,
        SizeUnit::P,
        SizeUnit::E,
    ];

    /// Power of the base this unit represents (B = 0, K = 1, ...).
    pub fn index(self) -> i32 {
        match self {
            SizeUnit::B => 0,
            SizeUnit::K => 1,
            SizeUnit::M => 2,
            SizeUnit::G => 3,
            SizeUnit::T => 4,
            SizeUnit::P => 5,
            SizeUnit::E => 6,
        }
    }

    pub fn letter(self) -> char {
        match self {
            SizeUnit::B => 'B',
            SizeUnit::K => 'K',
            SizeUnit::M => 'M',
            SizeUnit::G => 'G',
            SizeUnit::T => 'T',
            SizeUnit::P => 'P',
            SizeUnit::E => 'E',
        }
    }

    /// Case-insensitive lookup of a single unit letter.
    pub fn from_letter(c: char) -> Option<SizeUnit> {
        match c.to_ascii_uppercase() {
            'B' => Some(SizeUnit::B),
            'K' => Some(SizeUnit::K),
            'M' => Some(SizeUnit::M),
            'G' => Some(SizeUnit::G),
            'T' => Some(SizeUnit::T),
            'P' => Some(SizeUnit::P),
            'E' => Some(SizeUnit::E),
            _ => None,
        }
    }

    /// Scale factor from this unit down to bytes.
    pub fn factor(self, base: SizeBase) -> f64 {
        base.multiplier().powi(self.index())
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for SizeUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => SizeUnit::from_letter(c).ok_or_else(|| UnitError::invalid_format(s)),
            _ => Err(UnitError::invalid_format(s)),
        }
    }
}

/// Multiplier between adjacent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBase {
    #[default]
    Binary,
    Decimal,
}

impl SizeBase {
    pub fn multiplier(self) -> f64 {
        match self {
            SizeBase::Binary => 1024.0,
            SizeBase::Decimal => 1000.0,
        }
    }
}

/// A measured amount in one of the [`SizeUnit`] scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: SizeUnit,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: SizeUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn bytes(magnitude: f64) -> Self {
        Self::new(magnitude, SizeUnit::B)
    }

    pub fn to_bytes(&self, base: SizeBase) -> f64 {
        self.magnitude * self.unit.factor(base)
    }

    /// Re-expresses this quantity in `unit` without any rounding.
    pub fn in_unit(&self, unit: SizeUnit, base: SizeBase) -> Quantity {
        if unit == self.unit {
            return *self;
        }
        Quantity::new(self.to_bytes(base) / unit.factor(base), unit)
    }

    /// `in_unit`, failing when the result overflows an f64.
    pub fn try_in_unit(&self, unit: SizeUnit, base: SizeBase) -> Result<Quantity, UnitError> {
        let converted = self.in_unit(unit, base);
        if converted.magnitude.is_finite() {
            Ok(converted)
        } else {
            Err(UnitError::non_finite(self.to_string()))
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// Unit requested from a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetUnit {
    Unit(SizeUnit),
    /// Resolved by an [`AutoUnitPolicy`](crate::units::AutoUnitPolicy).
    Auto,
}

impl From<SizeUnit> for TargetUnit {
    fn from(unit: SizeUnit) -> Self {
        TargetUnit::Unit(unit)
    }
}

impl FromStr for TargetUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(TargetUnit::Auto)
        } else {
            s.parse().map(TargetUnit::Unit)
        }
    }
}

/// Result of a conversion, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedQuantity {
    /// Value in the target unit, unrounded
    pub number: f64,
    /// Value in the target unit, truncated or rounded to the requested digits
    pub number_fixed: String,
    pub unit: SizeUnit,
    /// `number_fixed` followed by the unit letter, e.g. "4G"
    pub number_unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub fraction_digits: usize,
    /// `false` truncates toward zero, `true` rounds to nearest
    pub rounding: bool,
    pub base: SizeBase,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fraction_digits: 2,
            rounding: false,
            base: SizeBase::Binary,
        }
    }
}

impl ConvertOptions {
    pub fn with_digits(fraction_digits: usize) -> Self {
        Self {
            fraction_digits,
            ..Self::default()
        }
    }

    pub fn rounded(mut self) -> Self {
        self.rounding = true;
        self
    }
}
