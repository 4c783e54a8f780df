use thiserror::Error;

/// Why a value could not be added to a filter expression.
///
/// The expression itself is never touched when one of these is returned;
/// callers decide whether to surface it as an inline form error or ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterValidationError {
    #[error("Unknown filter property '{0}'")]
    UnknownProperty(String),
    #[error("Empty value for filter property '{property}'")]
    EmptyValue { property: String },
    #[error("'{value}' is not one of the options for '{property}'")]
    NotAnOption { property: String, value: String },
    #[error("'{value}' is not a number for '{property}'")]
    NotANumber { property: String, value: String },
    #[error("{message}")]
    RuleRejected {
        property: String,
        value: String,
        message: String,
    },
}
