//! Engine configuration
//!
//! An `EngineConfig` is usually read from TOML:
//!
//! ```toml
//! default_format = "0,0.00"
//! zero_format = "N/A"
//! locale = "fr-ca"
//! cache = true
//! fallback = "echo"
//!
//! [locales.de]
//! decimal = ","
//! group = "."
//! currency = "€"
//! ordinal = { suffix = "." }
//! ```
//!
//! Extra locale tables use the same schema as the built-in locale data and
//! start from the English defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::{DEFAULT_FORMAT, DEFAULT_LOCALE, Engine};
use crate::error::ConfigError;
use crate::locale::settings_from_value;
use crate::parser::{FallbackMode, TokenRegistry};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Format used for empty format strings
    pub default_format: String,
    /// Text returned for zero values
    pub zero_format: Option<String>,
    /// Locale selected at start
    pub locale: String,
    /// Whether compiled formats are cached
    pub cache: bool,
    /// Treatment of characters no handler claims
    pub fallback: FallbackMode,
    /// Additional locale tables
    pub locales: BTreeMap<String, toml::Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_format: DEFAULT_FORMAT.to_string(),
            zero_format: None,
            locale: DEFAULT_LOCALE.to_string(),
            cache: true,
            fallback: FallbackMode::default(),
            locales: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }
}

impl Engine {
    /// Build an engine from configuration
    ///
    /// # Examples
    /// ```
    /// use numeral_format::{Engine, EngineConfig};
    ///
    /// let config = EngineConfig::from_toml_str(r#"
    ///     locale = "xx"
    ///     zero_format = "nil"
    ///
    ///     [locales.xx]
    ///     group = "'"
    /// "#).unwrap();
    /// let engine = Engine::from_config(&config).unwrap();
    /// assert_eq!(engine.format(1234567.0, "0,0").unwrap(), "1'234'567");
    /// assert_eq!(engine.format(0.0, "0,0").unwrap(), "nil");
    /// ```
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut engine = Engine::with_registry(TokenRegistry::with_builtins(config.fallback));

        for (key, value) in &config.locales {
            engine.load_locale(key, settings_from_value(value)?);
        }
        engine.set_locale(&config.locale)?;
        engine.set_default_format(Some(&config.default_format));
        engine.set_zero_format(config.zero_format.as_deref());
        engine.set_cache_enabled(config.cache);
        Ok(engine)
    }
}
