// Size parsing and unit conversion for resource displays (memory, disk,
// shared memory). All values are byte quantities with B..E prefixes.

pub mod compare;
pub mod converter;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod types;

pub use compare::{add_quantities, compare_quantities, sub_quantities};
pub use converter::{
    convert, convert_quantity, convert_with_policy, AutoUnit, AutoUnitPolicy, LargestWhole,
    SameUnit,
};
pub use error::UnitError;
pub use formatter::{round_fraction, truncate_fraction, usage_percent};
pub use parser::{looks_like_quantity, parse_quantity};
pub use types::{ConvertOptions, ConvertedQuantity, Quantity, SizeBase, SizeUnit, TargetUnit};
