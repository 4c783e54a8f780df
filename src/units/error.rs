use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// A size suffix was present but is not one of B, K, M, G, T, P, E.
    #[error("Invalid size format: '{input}'")]
    InvalidFormat { input: String },
    #[error("Size is not a finite number: '{input}'")]
    NonFinite { input: String },
}

impl UnitError {
    pub fn invalid_format(input: impl Into<String>) -> Self {
        UnitError::InvalidFormat {
            input: input.into(),
        }
    }

    pub fn non_finite(input: impl Into<String>) -> Self {
        UnitError::NonFinite {
            input: input.into(),
        }
    }
}
