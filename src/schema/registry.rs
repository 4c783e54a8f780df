// Filterable property definitions supplied by the caller. Each list page
// (agents, users, keypairs, ...) builds its own registry and hands it to
// the filter functions; nothing here is global.

use crate::filter::operator::FilterOperator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Boolean,
    Number,
}

/// A selectable value offered for a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: Option<String>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }
}

type CustomCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum RuleCheck {
    Pattern(Regex),
    Custom(CustomCheck),
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            RuleCheck::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Extra check a value must pass, with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub message: String,
    pub check: RuleCheck,
}

impl ValidationRule {
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            message: message.into(),
            check: RuleCheck::Pattern(Regex::new(pattern)?),
        })
    }

    pub fn custom<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            check: RuleCheck::Custom(Arc::new(check)),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match &self.check {
            RuleCheck::Pattern(re) => re.is_match(value),
            RuleCheck::Custom(check) => check(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    pub key: String,
    pub label: Option<String>,
    pub property_type: PropertyType,
    pub options: Vec<FilterOption>,
    /// Only declared option values may be used
    pub strict_selection: bool,
    pub default_operator: Option<FilterOperator>,
    pub rule: Option<ValidationRule>,
}

impl PropertyDefinition {
    pub fn new(key: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            key: key.into(),
            label: None,
            property_type,
            options: Vec::new(),
            strict_selection: false,
            default_operator: None,
            rule: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values.into_iter().map(FilterOption::new).collect();
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_selection = true;
        self
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.default_operator = Some(operator);
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Booleans always require picking from the list.
    pub fn is_strict(&self) -> bool {
        self.strict_selection || self.property_type == PropertyType::Boolean
    }

    /// Values a strict property accepts. Booleans without declared options
    /// accept `true` and `false`.
    pub fn allowed_values(&self) -> Vec<&str> {
        if self.options.is_empty() && self.property_type == PropertyType::Boolean {
            return vec!["true", "false"];
        }
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    pub fn operator(&self) -> FilterOperator {
        self.default_operator
            .clone()
            .unwrap_or_else(|| FilterOperator::default_for(self.property_type))
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid validation pattern for '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
    #[error("Duplicate filter property '{0}'")]
    DuplicateKey(String),
    #[error("Failed to parse property registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered set of filterable properties for one list page.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    properties: Vec<PropertyDefinition>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = PropertyDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.insert(definition)?;
        }
        Ok(registry)
    }

    pub fn from_configs(configs: Vec<PropertyConfig>) -> Result<Self, RegistryError> {
        let definitions = configs
            .into_iter()
            .map(PropertyDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(definitions)
    }

    /// Load from a JSON array of property entries, as handed over by the
    /// browser bindings.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let configs: Vec<PropertyConfig> = serde_json::from_str(json)?;
        Self::from_configs(configs)
    }

    pub fn insert(&mut self, definition: PropertyDefinition) -> Result<(), RegistryError> {
        if self.get(&definition.key).is_some() {
            return Err(RegistryError::DuplicateKey(definition.key));
        }
        self.properties.push(definition);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Display name for `key`, falling back to the key itself.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|p| p.label()).unwrap_or(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// Serialized form of a property (TOML config or JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    #[serde(default, alias = "strictSelection")]
    pub strict_selection: bool,
    #[serde(default, alias = "defaultOperator")]
    pub default_operator: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Option values may be written as plain scalars (`true`, `3`, `"gpu"`) or
/// as `{ value, label }` tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionConfig {
    Labeled {
        value: ScalarValue,
        #[serde(default)]
        label: Option<String>,
    },
    Plain(ScalarValue),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<OptionConfig> for FilterOption {
    fn from(config: OptionConfig) -> Self {
        match config {
            OptionConfig::Labeled { value, label } => FilterOption {
                value: value.to_string(),
                label,
            },
            OptionConfig::Plain(value) => FilterOption::new(value.to_string()),
        }
    }
}

impl TryFrom<PropertyConfig> for PropertyDefinition {
    type Error = RegistryError;

    fn try_from(config: PropertyConfig) -> Result<Self, Self::Error> {
        let rule = match config.pattern {
            Some(pattern) => {
                let message = config
                    .message
                    .unwrap_or_else(|| format!("Value must match {}", pattern));
                Some(ValidationRule::pattern(&pattern, message).map_err(|source| {
                    RegistryError::InvalidPattern {
                        key: config.key.clone(),
                        source,
                    }
                })?)
            }
            None => None,
        };

        Ok(Self {
            key: config.key,
            label: config.label,
            property_type: config.property_type,
            options: config.options.into_iter().map(FilterOption::from).collect(),
            strict_selection: config.strict_selection,
            default_operator: config.default_operator.map(FilterOperator::from),
            rule,
        })
    }
}
