//! The formatting engine
//!
//! An `Engine` owns everything a format call depends on: the token registry,
//! the locale tables, the compiled-format cache, the zero-format override,
//! the default format and the default locale. Nothing is global, so two
//! engines never observe each other's configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::FormatError;
use crate::formatter::{RoundingFn, round_half_up};
use crate::locale::LocaleManager;
use crate::parser::{FallbackMode, TokenHandler, TokenRegistry, compile};
use crate::types::{CompiledFormat, HandlerId, LocaleSettings};

/// Format used when an empty format string is given
pub const DEFAULT_FORMAT: &str = "0.0";

/// Locale selected by a new engine
pub const DEFAULT_LOCALE: &str = "en";

/// Compiles, caches and runs formats
pub struct Engine {
    registry: TokenRegistry,
    locales: LocaleManager,
    locale: String,
    default_format: String,
    zero_format: Option<String>,
    cache_enabled: bool,
    cache: RwLock<HashMap<String, Arc<CompiledFormat>>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("locale", &self.locale)
            .field("default_format", &self.default_format)
            .field("zero_format", &self.zero_format)
            .field("cache_enabled", &self.cache_enabled)
            .field("cached_formats", &self.cache.read().len())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the built-in handlers and locale tables
    pub fn new() -> Self {
        Self::with_registry(TokenRegistry::default())
    }

    /// An engine compiling with `registry`
    pub fn with_registry(registry: TokenRegistry) -> Self {
        Self {
            registry,
            locales: LocaleManager::builtin().clone(),
            locale: DEFAULT_LOCALE.to_string(),
            default_format: DEFAULT_FORMAT.to_string(),
            zero_format: None,
            cache_enabled: true,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Compile a format string, reusing the cached result when caching is enabled
    ///
    /// # Arguments
    /// * `format` - The format string to compile
    ///
    /// # Returns
    /// * `Result<Arc<CompiledFormat>, FormatError>` - The compiled format, or
    ///   the malformed-format error. Failed compilations are never cached.
    pub fn compile(&self, format: &str) -> Result<Arc<CompiledFormat>, FormatError> {
        if self.cache_enabled {
            if let Some(compiled) = self.cache.read().get(format) {
                trace!(format, "format cache hit");
                return Ok(Arc::clone(compiled));
            }
        }

        let compiled = Arc::new(compile(&self.registry, format)?);
        if self.cache_enabled {
            // Another thread may have compiled the same string meanwhile; keep the first.
            let mut cache = self.cache.write();
            let entry = cache
                .entry(format.to_string())
                .or_insert_with(|| Arc::clone(&compiled));
            return Ok(Arc::clone(entry));
        }
        Ok(compiled)
    }

    /// Run a compiled format against `value` with the table of `locale`
    ///
    /// The locale is checked before anything else, then a zero value returns
    /// the zero-format override verbatim when one is set.
    pub fn run(
        &self,
        compiled: &CompiledFormat,
        value: f64,
        round: RoundingFn,
        locale: &str,
    ) -> Result<String, FormatError> {
        let settings = self.locale_settings(locale)?;
        if let Some(zero) = self.zero_override(value) {
            return Ok(zero);
        }
        Ok(compiled.run(value, round, settings))
    }

    fn zero_override(&self, value: f64) -> Option<String> {
        self.zero_format.clone().filter(|_| value == 0.0)
    }

    /// Format `value` with the default rounding and the engine's locale
    ///
    /// # Examples
    /// ```
    /// use numeral_format::Engine;
    ///
    /// let engine = Engine::new();
    /// assert_eq!(engine.format(-1000.234, "($0,0.00)").unwrap(), "($1,000.23)");
    /// assert_eq!(engine.format(1230974.0, "0.0a").unwrap(), "1.2m");
    /// assert_eq!(engine.format(1.5, "").unwrap(), "1.5");
    /// ```
    pub fn format(&self, value: f64, format: &str) -> Result<String, FormatError> {
        self.format_with(value, format, round_half_up, &self.locale)
    }

    /// Format `value` with an explicit rounding function and locale.
    ///
    /// An empty format falls back to the default format. A zero value with a
    /// zero-format override set returns the override without compiling.
    pub fn format_with(
        &self,
        value: f64,
        format: &str,
        round: RoundingFn,
        locale: &str,
    ) -> Result<String, FormatError> {
        let settings = self.locale_settings(locale)?;
        if let Some(zero) = self.zero_override(value) {
            return Ok(zero);
        }

        let format = if format.is_empty() {
            self.default_format.as_str()
        } else {
            format
        };
        let compiled = self.compile(format)?;
        Ok(compiled.run(value, round, settings))
    }

    /// Wrap a value for repeated formatting
    pub fn numeral(&self, value: f64) -> Numeral<'_> {
        Numeral {
            engine: self,
            value,
            locale: None,
        }
    }

    /// Text returned verbatim for zero values; `None` removes the override
    pub fn set_zero_format(&mut self, text: Option<&str>) {
        self.zero_format = text.map(str::to_string);
    }

    pub fn zero_format(&self) -> Option<&str> {
        self.zero_format.as_deref()
    }

    /// Format used for empty format strings; `None` restores `0.0`
    pub fn set_default_format(&mut self, format: Option<&str>) {
        self.default_format = format.unwrap_or(DEFAULT_FORMAT).to_string();
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Add or replace a locale table; keys are case-insensitive
    pub fn load_locale(&mut self, key: &str, settings: LocaleSettings) {
        debug!(locale = key, "loading locale");
        self.locales.insert(key, settings);
    }

    /// Select the locale used by `format` and by numerals without their own
    pub fn set_locale(&mut self, key: &str) -> Result<(), FormatError> {
        let key = key.to_lowercase();
        if !self.locales.contains(&key) {
            return Err(FormatError::UnknownLocale(key));
        }
        self.locale = key;
        Ok(())
    }

    /// The selected locale key
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Every registered locale key, sorted
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys()
    }

    pub fn locale_settings(&self, key: &str) -> Result<&LocaleSettings, FormatError> {
        self.locales
            .get(key)
            .map_err(|_| FormatError::UnknownLocale(key.to_string()))
    }

    /// Register a token handler. Compiled formats are dropped since the new
    /// handler may claim characters they were compiled without.
    pub fn register_handler(&mut self, handler: Arc<dyn TokenHandler>) -> HandlerId {
        let id = self.registry.register(handler);
        self.clear_cache();
        id
    }

    /// Choose what happens to characters no handler claims
    pub fn set_fallback_mode(&mut self, mode: FallbackMode) {
        self.registry.set_fallback_mode(mode);
        self.clear_cache();
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Enable or disable the compiled-format cache; disabling empties it
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
        if !enabled {
            self.clear_cache();
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Number of cached compiled formats
    pub fn cached_formats(&self) -> usize {
        self.cache.read().len()
    }
}

/// A value bound to an engine, with an optional locale of its own
#[derive(Debug, Clone)]
pub struct Numeral<'e> {
    engine: &'e Engine,
    value: f64,
    locale: Option<String>,
}

impl Numeral<'_> {
    /// Use `key` instead of the engine's locale
    pub fn with_locale(mut self, key: &str) -> Self {
        self.locale = Some(key.to_string());
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    /// Format with the default rounding
    pub fn format(&self, format: &str) -> Result<String, FormatError> {
        self.format_rounded(format, round_half_up)
    }

    pub fn format_rounded(&self, format: &str, round: RoundingFn) -> Result<String, FormatError> {
        let locale = self.locale.as_deref().unwrap_or(&self.engine.locale);
        self.engine.format_with(self.value, format, round, locale)
    }
}
