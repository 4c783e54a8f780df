pub mod error;
pub mod expression;
pub mod lexer;
pub mod merge;
pub mod operator;
pub mod parser;

#[cfg(test)]
mod tests;

pub use error::FilterValidationError;
pub use expression::{predicate_key, FilterExpression, FilterPredicate};
pub use merge::{merge_filter_values, merge_filter_values_with, LogicalOperator};
pub use operator::FilterOperator;
pub use parser::{parse_filter, parse_filter_with_registry};
