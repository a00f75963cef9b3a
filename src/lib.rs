//! Numeral-style number formatting
//!
//! Format strings such as `0,0.00`, `($0,0a)` or `00:00:00` are compiled once
//! into weighted step programs and then run against numbers. See [`Engine`]
//! for the usual entry point.

pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod locale;
pub mod parser;
pub mod types;

// Main API
pub use config::EngineConfig;
pub use engine::{Engine, Numeral};
pub use error::{ConfigError, FormatError};
pub use formatter::{CustomStep, Output, RoundingFn, RunState, round_half_up};
pub use locale::{LocaleError, LocaleManager};
pub use parser::{CompileState, FallbackMode, TokenHandler, TokenRegistry, compile};
pub use types::*;

#[cfg(test)]
mod tests;
