//! Locale support for number formatting
//!
//! This module loads and manages the locale tables consulted at run time:
//! delimiters, abbreviation words, the ordinal rule and the currency symbol.
//! Built-in tables are embedded TOML data; every table inherits the `[base]`
//! table and overrides what differs.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::warn;

use crate::types::{Abbreviations, LocaleSettings, OrdinalRule};

/// Error type for locale operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The specified locale was not found
    #[error("locale not found: {0}")]
    NotFound(String),
    /// An error occurred while parsing locale data
    #[error("error parsing locale data: {0}")]
    Parse(String),
}

type Result<T> = std::result::Result<T, LocaleError>;

/// Locale tables keyed by lowercased locale code
#[derive(Debug, Clone, Default)]
pub struct LocaleManager {
    settings: HashMap<String, LocaleSettings>,
}

static BUILTIN: OnceLock<LocaleManager> = OnceLock::new();

impl LocaleManager {
    /// An empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in locale tables, parsed once per process
    pub fn builtin() -> &'static LocaleManager {
        BUILTIN.get_or_init(|| {
            Self::from_toml_str(include_str!("locale/locales.toml")).unwrap_or_else(|e| {
                warn!(error = %e, "failed to load embedded locale data");
                let mut manager = Self::new();
                manager.insert("en", LocaleSettings::default());
                manager
            })
        })
    }

    /// Parse locale tables from TOML, applying `[base]` under every other table
    ///
    /// # Arguments
    /// * `toml_str` - TOML text with one table per locale code
    ///
    /// # Returns
    /// * `Result<LocaleManager>` - The parsed tables, or a parse error
    ///
    /// # Examples
    /// ```
    /// use numeral_format::locale::LocaleManager;
    ///
    /// let manager = LocaleManager::from_toml_str(r#"
    ///     [base]
    ///     group = " "
    ///
    ///     [xx]
    ///     decimal = ","
    /// "#).unwrap();
    /// let xx = manager.get("XX").unwrap();
    /// assert_eq!(xx.thousands_separator, " ");
    /// assert_eq!(xx.decimal_point, ",");
    /// ```
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let parsed: toml::Value =
            toml::from_str(toml_str).map_err(|e| LocaleError::Parse(e.to_string()))?;
        let table = parsed
            .as_table()
            .ok_or_else(|| LocaleError::Parse("root is not a table".to_string()))?;

        let mut base = LocaleSettings::default();
        if let Some(value) = table.get("base") {
            apply_settings(&mut base, value)?;
        }

        let mut manager = Self::new();
        for (key, value) in table {
            if key == "base" {
                continue;
            }
            let mut settings = base.clone();
            apply_settings(&mut settings, value).map_err(|e| match e {
                LocaleError::Parse(msg) => LocaleError::Parse(format!("[{key}] {msg}")),
                other => other,
            })?;
            manager.insert(key, settings);
        }
        Ok(manager)
    }

    /// Add or replace the table for `key`
    pub fn insert(&mut self, key: &str, settings: LocaleSettings) {
        self.settings.insert(key.to_lowercase(), settings);
    }

    /// Look up a table by case-insensitive key
    pub fn get(&self, key: &str) -> Result<&LocaleSettings> {
        self.settings
            .get(&key.to_lowercase())
            .ok_or_else(|| LocaleError::NotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(&key.to_lowercase())
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.settings.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Build a locale table from one TOML table, starting from the English defaults
pub fn settings_from_value(value: &toml::Value) -> Result<LocaleSettings> {
    let mut settings = LocaleSettings::default();
    apply_settings(&mut settings, value)?;
    Ok(settings)
}

/// Apply locale-specific settings from TOML over `settings`
fn apply_settings(settings: &mut LocaleSettings, value: &toml::Value) -> Result<()> {
    let table = value
        .as_table()
        .ok_or_else(|| LocaleError::Parse("locale setting is not a table".to_string()))?;

    if let Some(decimal) = str_field(table, "decimal")? {
        settings.decimal_point = decimal.to_string();
    }
    if let Some(group) = str_field(table, "group")? {
        settings.thousands_separator = group.to_string();
    }
    if let Some(currency) = str_field(table, "currency")? {
        settings.currency_symbol = currency.to_string();
    }
    if let Some(abbreviations) = table.get("abbreviations") {
        apply_abbreviations(&mut settings.abbreviations, abbreviations)?;
    }
    if let Some(ordinal) = table.get("ordinal") {
        settings.ordinal = parse_ordinal(ordinal)?;
    }
    Ok(())
}

fn apply_abbreviations(abbreviations: &mut Abbreviations, value: &toml::Value) -> Result<()> {
    let table = value
        .as_table()
        .ok_or_else(|| LocaleError::Parse("abbreviations is not a table".to_string()))?;

    let words = [
        ("thousand", &mut abbreviations.thousand),
        ("million", &mut abbreviations.million),
        ("billion", &mut abbreviations.billion),
        ("trillion", &mut abbreviations.trillion),
    ];
    for (key, word) in words {
        if let Some(text) = str_field(table, key)? {
            *word = text.to_string();
        }
    }
    Ok(())
}

fn parse_ordinal(value: &toml::Value) -> Result<OrdinalRule> {
    if let Some(table) = value.as_table() {
        return str_field(table, "suffix")?
            .map(|suffix| OrdinalRule::Fixed(suffix.to_string()))
            .ok_or_else(|| LocaleError::Parse("ordinal table needs a suffix".to_string()));
    }

    match value.as_str() {
        Some("english") => Ok(OrdinalRule::English),
        Some("french") => Ok(OrdinalRule::French),
        Some("spanish") => Ok(OrdinalRule::Spanish),
        Some("belgian-dutch") => Ok(OrdinalRule::BelgianDutch),
        Some("turkish") => Ok(OrdinalRule::Turkish),
        Some(other) => Err(LocaleError::Parse(format!("unknown ordinal rule '{other}'"))),
        None => Err(LocaleError::Parse(
            "ordinal must be a rule name or a suffix table".to_string(),
        )),
    }
}

fn str_field<'t>(table: &'t toml::value::Table, key: &str) -> Result<Option<&'t str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| LocaleError::Parse(format!("{key} must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_loaded() {
        let manager = LocaleManager::builtin();
        assert_eq!(
            manager.keys(),
            vec!["be-nl", "en", "es", "fr-ca", "hu", "ja", "pl", "pt-br", "tr"]
        );
    }

    #[test]
    fn base_table_is_inherited() {
        let manager = LocaleManager::builtin();
        let en = manager.get("en").unwrap();
        assert_eq!(en, &LocaleSettings::default());

        let ja = manager.get("ja").unwrap();
        assert_eq!(ja.decimal_point, ".");
        assert_eq!(ja.thousands_separator, ",");
        assert_eq!(ja.currency_symbol, "¥");
        assert_eq!(ja.abbreviations.million, "百万");
    }

    #[test]
    fn lookup_ignores_case() {
        let manager = LocaleManager::builtin();
        assert!(manager.get("FR-CA").is_ok());
        assert!(manager.contains("Pt-Br"));
        assert_eq!(
            manager.get("xx").unwrap_err(),
            LocaleError::NotFound("xx".to_string())
        );
    }

    #[test]
    fn ordinal_forms() {
        let manager = LocaleManager::builtin();
        assert_eq!(manager.get("pt-br").unwrap().ordinal, OrdinalRule::Fixed("º".to_string()));
        assert_eq!(manager.get("tr").unwrap().ordinal, OrdinalRule::Turkish);

        let err = LocaleManager::from_toml_str("[xx]\nordinal = \"klingon\"").unwrap_err();
        assert!(matches!(err, LocaleError::Parse(msg) if msg.contains("klingon")));
    }

    #[test]
    fn wrong_types_are_reported() {
        assert!(LocaleManager::from_toml_str("[xx]\ndecimal = 1").is_err());
        assert!(LocaleManager::from_toml_str("[xx]\nabbreviations = \"k\"").is_err());
        assert!(LocaleManager::from_toml_str("xx = 1").is_err());
    }

    #[test]
    fn partial_abbreviations_keep_the_rest() {
        let value: toml::Value = toml::from_str("abbreviations = { million = \"M\" }").unwrap();
        let settings = settings_from_value(&value).unwrap();
        assert_eq!(settings.abbreviations.thousand, "k");
        assert_eq!(settings.abbreviations.million, "M");
    }
}
