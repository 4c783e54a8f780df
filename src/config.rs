use crate::schema::registry::{PropertyConfig, PropertyRegistry, RegistryError};
use crate::units::converter::AutoUnit;
use crate::units::types::{ConvertOptions, SizeBase};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    // Filterable properties, in the order they are offered
    #[serde(default)]
    pub properties: Vec<PropertyConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: usize,
    #[serde(default)]
    pub rounding: bool,
    #[serde(default)]
    pub auto_unit: AutoUnit,
    #[serde(default)]
    pub base: SizeBase,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fraction_digits: default_fraction_digits(),
            rounding: false,
            auto_unit: AutoUnit::default(),
            base: SizeBase::default(),
        }
    }
}

fn default_fraction_digits() -> usize {
    2
}

impl DisplayConfig {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            fraction_digits: self.fraction_digits,
            rounding: self.rounding,
            base: self.base,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> Result<PropertyRegistry, ConfigError> {
        Ok(PropertyRegistry::from_configs(self.properties.clone())?)
    }
}
