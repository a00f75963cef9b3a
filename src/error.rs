//! Error types for compiling and running formats.

use thiserror::Error;

use crate::locale::LocaleError;

/// An error raised while compiling or running a format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A handler's lookahead expected a closing bracket or sequence and found none.
    #[error("malformed format '{format}' at byte {position}: {reason}")]
    Malformed {
        format: String,
        position: usize,
        reason: String,
    },

    /// The requested locale key has no registered table.
    #[error("unknown locale: '{0}'")]
    UnknownLocale(String),
}

impl FormatError {
    pub fn malformed(format: &str, position: usize, reason: impl Into<String>) -> Self {
        FormatError::Malformed {
            format: format.to_string(),
            position,
            reason: reason.into(),
        }
    }
}

/// Errors that occur while building an engine from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
