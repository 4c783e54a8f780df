use crate::filter::error::FilterValidationError;
use crate::schema::registry::{PropertyDefinition, PropertyRegistry, PropertyType};

impl PropertyRegistry {
    /// Check whether `value` may be used as a filter on `key`. Surrounding
    /// whitespace is ignored, as it is when the predicate is added.
    pub fn validate_value(&self, key: &str, value: &str) -> Result<(), FilterValidationError> {
        let definition = self
            .get(key)
            .ok_or_else(|| FilterValidationError::UnknownProperty(key.to_string()))?;
        validate_against(definition, value)
    }

    /// Boolean form of [`validate_value`](Self::validate_value) for inline
    /// form feedback.
    pub fn is_valid_value(&self, key: &str, value: &str) -> bool {
        self.validate_value(key, value).is_ok()
    }
}

/// Number values are serialized unquoted and must parse as a finite number.
pub fn validate_against(
    definition: &PropertyDefinition,
    value: &str,
) -> Result<(), FilterValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FilterValidationError::EmptyValue {
            property: definition.key.clone(),
        });
    }

    if definition.is_strict() && !definition.allowed_values().contains(&value) {
        return Err(FilterValidationError::NotAnOption {
            property: definition.key.clone(),
            value: value.to_string(),
        });
    }

    if definition.property_type == PropertyType::Number && !is_finite_number(value) {
        return Err(FilterValidationError::NotANumber {
            property: definition.key.clone(),
            value: value.to_string(),
        });
    }

    if let Some(rule) = &definition.rule {
        if !rule.accepts(value) {
            return Err(FilterValidationError::RuleRejected {
                property: definition.key.clone(),
                value: value.to_string(),
                message: rule.message.clone(),
            });
        }
    }

    Ok(())
}

fn is_finite_number(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
