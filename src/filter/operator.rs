use crate::schema::registry::PropertyType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparator token of a filter clause.
///
/// Unknown tokens are kept verbatim so that parsing never fails on a
/// comparator the backend grammar knows and this crate does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Like,
    ILike,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Other(String),
}

impl FilterOperator {
    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Equals => "==",
            FilterOperator::NotEquals => "!=",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
            FilterOperator::LessThan => "<",
            FilterOperator::LessThanOrEqual => "<=",
            FilterOperator::GreaterThan => ">",
            FilterOperator::GreaterThanOrEqual => ">=",
            FilterOperator::In => "in",
            FilterOperator::Other(token) => token,
        }
    }

    /// Operator used when a property does not override it.
    pub fn default_for(property_type: PropertyType) -> Self {
        match property_type {
            PropertyType::String => FilterOperator::ILike,
            PropertyType::Boolean | PropertyType::Number => FilterOperator::Equals,
        }
    }

    /// `like` and `ilike` take `%...%` wrapped values.
    pub fn is_pattern_match(&self) -> bool {
        matches!(self, FilterOperator::Like | FilterOperator::ILike)
    }
}

impl From<&str> for FilterOperator {
    fn from(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "==" => FilterOperator::Equals,
            "!=" => FilterOperator::NotEquals,
            "like" => FilterOperator::Like,
            "ilike" => FilterOperator::ILike,
            "<" => FilterOperator::LessThan,
            "<=" => FilterOperator::LessThanOrEqual,
            ">" => FilterOperator::GreaterThan,
            ">=" => FilterOperator::GreaterThanOrEqual,
            "in" => FilterOperator::In,
            _ => FilterOperator::Other(token.to_string()),
        }
    }
}

impl From<String> for FilterOperator {
    fn from(token: String) -> Self {
        FilterOperator::from(token.as_str())
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
