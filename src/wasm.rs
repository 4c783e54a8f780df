// WebAssembly bindings used by the web console tables and filter bars
use crate::config::EngineConfig;
use crate::filter::{self, FilterExpression, LogicalOperator};
use crate::schema::registry::PropertyRegistry;
use crate::units::{self, ConvertOptions, TargetUnit};
use std::cmp::Ordering;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct BaiEngine {
    config: EngineConfig,
    registry: PropertyRegistry,
}

impl Default for BaiEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

#[wasm_bindgen]
impl BaiEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: EngineConfig::empty(),
            registry: PropertyRegistry::new(),
        }
    }

    /// Replace display settings and properties from TOML config content
    #[wasm_bindgen]
    pub fn load_config(&mut self, config_content: &str) -> Result<(), JsValue> {
        let config = EngineConfig::load_from_str(config_content)
            .map_err(|e| js_error("Failed to load config", e))?;
        self.registry = config
            .registry()
            .map_err(|e| js_error("Failed to load properties", e))?;
        self.config = config;
        Ok(())
    }

    /// Replace the filterable properties from a JSON array
    #[wasm_bindgen]
    pub fn load_properties(&mut self, properties_json: &str) -> Result<(), JsValue> {
        self.registry = PropertyRegistry::from_json(properties_json)
            .map_err(|e| js_error("Failed to load properties", e))?;
        Ok(())
    }

    /// Convert a size string. Returns JSON `{number, numberFixed, unit,
    /// numberUnit}`, or undefined when `size` is undefined.
    #[wasm_bindgen]
    pub fn convert(
        &self,
        size: Option<String>,
        target_unit: &str,
        fraction_digits: Option<usize>,
        rounding: Option<bool>,
    ) -> Result<Option<String>, JsValue> {
        let Some(size) = size else {
            return Ok(None);
        };

        let defaults = self.config.display.convert_options();
        let options = ConvertOptions {
            fraction_digits: fraction_digits.unwrap_or(defaults.fraction_digits),
            rounding: rounding.unwrap_or(defaults.rounding),
            base: defaults.base,
        };
        let target: TargetUnit = target_unit
            .parse()
            .map_err(|e| js_error("Invalid target unit", e))?;
        let quantity = units::parse_quantity(&size).map_err(|e| js_error("Invalid size", e))?;
        let converted =
            units::convert_with_policy(&quantity, target, &options, &self.config.display.auto_unit)
                .map_err(|e| js_error("Invalid size", e))?;

        let json = serde_json::to_string(&converted)
            .map_err(|e| js_error("Failed to serialize result", e))?;
        Ok(Some(json))
    }

    /// Returns -1, 0 or 1
    #[wasm_bindgen]
    pub fn compare(&self, a: &str, b: &str) -> Result<i32, JsValue> {
        let ordering =
            units::compare_quantities(a, b).map_err(|e| js_error("Invalid size", e))?;
        Ok(match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    #[wasm_bindgen]
    pub fn usage_percent(&self, used: f64, total: f64, fraction_digits: usize) -> Option<String> {
        units::usage_percent(used, total, fraction_digits)
    }

    #[wasm_bindgen]
    pub fn is_valid_value(&self, key: &str, value: &str) -> bool {
        self.registry.is_valid_value(key, value)
    }

    /// Add a predicate to the current filter string.
    /// Returns JSON `{"filter": string|null, "valid": bool, "error": string|null}`;
    /// when `valid` is false `filter` is the unchanged input.
    #[wasm_bindgen]
    pub fn add_predicate(
        &self,
        current: Option<String>,
        key: &str,
        value: &str,
    ) -> Result<String, JsValue> {
        let expr = self.expression(current.as_deref());
        let result = match expr.add_predicate(&self.registry, key, value) {
            Ok(next) => serde_json::json!({
                "filter": next.serialize(),
                "valid": true,
                "error": null,
            }),
            Err(e) => serde_json::json!({
                "filter": expr.serialize(),
                "valid": false,
                "error": e.to_string(),
            }),
        };

        serde_json::to_string(&result).map_err(|e| js_error("Failed to serialize result", e))
    }

    /// Remove the predicate with the given key (see `parse_filter` output)
    #[wasm_bindgen]
    pub fn remove_predicate(&self, current: Option<String>, predicate_key: &str) -> Option<String> {
        self.expression(current.as_deref())
            .remove_predicate(predicate_key)
            .serialize()
    }

    /// Returns JSON array of `{key, property, operator, value, label, propertyType}`
    #[wasm_bindgen]
    pub fn parse_filter(&self, filter_string: &str) -> Result<String, JsValue> {
        let expr = self.expression(Some(filter_string));
        let chips: Vec<_> = expr
            .iter()
            .enumerate()
            .map(|(i, p)| {
                serde_json::json!({
                    "key": filter::predicate_key(i, p),
                    "property": p.property,
                    "operator": p.operator,
                    "value": p.display_value(),
                    "label": p.label,
                    "propertyType": p.property_type,
                })
            })
            .collect();

        serde_json::to_string(&chips).map_err(|e| js_error("Failed to serialize filter", e))
    }

    /// Combine fragments (strings, null or undefined) with `&` or `|`
    #[wasm_bindgen]
    pub fn merge_filter_values(
        &self,
        fragments: js_sys::Array,
        operator: Option<String>,
    ) -> Result<Option<String>, JsValue> {
        let operator = match operator {
            Some(token) => LogicalOperator::from_token(&token)
                .ok_or_else(|| JsValue::from_str(&format!("Unknown operator: {}", token)))?,
            None => LogicalOperator::And,
        };
        let fragments = fragments.iter().map(|v| v.as_string());
        Ok(filter::merge_filter_values_with(fragments, operator))
    }

    fn expression(&self, filter_string: Option<&str>) -> FilterExpression {
        match filter_string {
            Some(s) => filter::parse_filter_with_registry(s, &self.registry),
            None => FilterExpression::new(),
        }
    }
}
