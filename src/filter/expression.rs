use crate::filter::error::FilterValidationError;
use crate::filter::operator::FilterOperator;
use crate::schema::registry::{PropertyRegistry, PropertyType};
use log::warn;
use serde::Serialize;

/// One `property operator value` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPredicate {
    pub property: String,
    pub operator: FilterOperator,
    /// Stored as sent to the backend, including `%` wildcards
    pub value: String,
    /// Human readable property name for chips
    pub label: String,
    /// Decides whether the value is quoted when serialized
    pub property_type: PropertyType,
}

impl FilterPredicate {
    pub fn new(
        property: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
        property_type: PropertyType,
    ) -> Self {
        let property = property.into();
        Self {
            label: property.clone(),
            property,
            operator,
            value: value.into(),
            property_type,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Value without the `%...%` wildcards added for `like`/`ilike`.
    pub fn display_value(&self) -> &str {
        if self.operator.is_pattern_match() {
            let inner = self.value.strip_prefix('%').unwrap_or(&self.value);
            inner.strip_suffix('%').unwrap_or(inner)
        } else {
            &self.value
        }
    }

    /// `property operator value`, with the value quoted for string properties.
    pub fn render(&self) -> String {
        if self.property_type == PropertyType::String {
            if self.value.contains('"') {
                warn!(
                    "filter value for '{}' contains a double quote and will not parse back: {}",
                    self.property, self.value
                );
            }
            format!("{} {} \"{}\"", self.property, self.operator, self.value)
        } else {
            format!("{} {} {}", self.property, self.operator, self.value)
        }
    }
}

/// Opaque identifier a UI uses to remove a predicate.
pub fn predicate_key(index: usize, predicate: &FilterPredicate) -> String {
    format!("{}:{}", index, predicate.value)
}

/// Ordered list of predicates, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterExpression {
    predicates: Vec<FilterPredicate>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_predicates(predicates: Vec<FilterPredicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[FilterPredicate] {
        &self.predicates
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterPredicate> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.predicates
            .iter()
            .enumerate()
            .map(|(i, p)| predicate_key(i, p))
            .collect()
    }

    /// Returns a new expression with `key = raw_value` appended.
    ///
    /// The value is trimmed and validated against the registry entry for
    /// `key`. On error the current expression is left as it was. Adding the
    /// same clause twice yields two clauses.
    pub fn add_predicate(
        &self,
        registry: &PropertyRegistry,
        key: &str,
        raw_value: &str,
    ) -> Result<FilterExpression, FilterValidationError> {
        let value = raw_value.trim();
        registry.validate_value(key, value)?;
        let definition = registry
            .get(key)
            .ok_or_else(|| FilterValidationError::UnknownProperty(key.to_string()))?;

        let operator = definition.operator();
        let value = if operator.is_pattern_match() {
            format!("%{}%", value)
        } else {
            value.to_string()
        };

        let predicate = FilterPredicate::new(key, operator, value, definition.property_type)
            .with_label(definition.label());

        let mut predicates = self.predicates.clone();
        predicates.push(predicate);
        Ok(FilterExpression { predicates })
    }

    /// Returns a new expression without the predicate identified by `key`
    /// (see [`predicate_key`]). Unknown keys leave it unchanged.
    pub fn remove_predicate(&self, key: &str) -> FilterExpression {
        let predicates = self
            .predicates
            .iter()
            .enumerate()
            .filter(|(i, p)| predicate_key(*i, p) != key)
            .map(|(_, p)| p.clone())
            .collect();
        FilterExpression { predicates }
    }

    /// Backend filter string, or `None` for an empty expression so the
    /// caller can omit the variable entirely.
    ///
    /// A single clause is rendered bare; two or more are each wrapped in
    /// parentheses and joined with ` & `.
    pub fn serialize(&self) -> Option<String> {
        match self.predicates.as_slice() {
            [] => None,
            [only] => Some(only.render()),
            many => Some(
                many.iter()
                    .map(|p| format!("({})", p.render()))
                    .collect::<Vec<_>>()
                    .join(" & "),
            ),
        }
    }
}

impl<'a> IntoIterator for &'a FilterExpression {
    type Item = &'a FilterPredicate;
    type IntoIter = std::slice::Iter<'a, FilterPredicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}
