//! Structured errors for quantity parsing and formatting
//!
//! Every failure here is caller-side: the text was malformed or the unit
//! registry does not know the symbol. Nothing is retried internally.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NUMERIC_FORMAT: &str = "NUMERIC_FORMAT";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const MALFORMED_FORMAT: &str = "MALFORMED_FORMAT";
    pub const UNKNOWN_KIND: &str = "UNKNOWN_KIND";
    pub const INCOMPATIBLE_DIMENSIONS: &str = "INCOMPATIBLE_DIMENSIONS";
    pub const UNKNOWN_CULTURE: &str = "UNKNOWN_CULTURE";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Error type for parse, format and registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The numeric part of the input could not be read under the active culture.
    #[error("invalid number '{text}' in '{input}'")]
    NumericFormat { input: String, text: String },

    /// The unit part of the input matched no symbol registered for the kind.
    #[error("unit '{unit}' not recognized for {kind} in '{input}'")]
    UnknownUnit {
        input: String,
        unit: String,
        kind: String,
    },

    /// Unterminated or structurally invalid `[...]` directive.
    #[error("malformed format string '{format}': {reason}")]
    MalformedFormatString { format: String, reason: &'static str },

    #[error("unknown quantity kind: {0}")]
    UnknownKind(String),

    #[error("incompatible dimensions: {left} and {right}")]
    IncompatibleDimensions { left: String, right: String },

    #[error("unknown culture: {0}")]
    UnknownCulture(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias used across the Gauge crates
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn numeric_format(input: impl Into<String>, text: impl Into<String>) -> Self {
        Self::NumericFormat {
            input: input.into(),
            text: text.into(),
        }
    }

    pub fn unknown_unit(
        input: impl Into<String>,
        unit: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::UnknownUnit {
            input: input.into(),
            unit: unit.into(),
            kind: kind.into(),
        }
    }

    pub fn malformed(format: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedFormatString {
            format: format.into(),
            reason,
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NumericFormat { .. } => codes::NUMERIC_FORMAT,
            Self::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            Self::MalformedFormatString { .. } => codes::MALFORMED_FORMAT,
            Self::UnknownKind(_) => codes::UNKNOWN_KIND,
            Self::IncompatibleDimensions { .. } => codes::INCOMPATIBLE_DIMENSIONS,
            Self::UnknownCulture(_) => codes::UNKNOWN_CULTURE,
            Self::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Suggestion for fixing the input, when one is obvious
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NumericFormat { .. } => {
                Some("Check the decimal and group separators of the active culture".to_string())
            }
            Self::UnknownUnit { kind, .. } => {
                Some(format!("Register the unit for {} or check its symbol", kind))
            }
            Self::MalformedFormatString { .. } => {
                Some("Use a single [unit] or [!unit] directive".to_string())
            }
            Self::UnknownKind(name) => Some(format!("Register '{}' before using it", name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Error::numeric_format("1x m", "1x").code(), codes::NUMERIC_FORMAT);
        assert_eq!(
            Error::unknown_unit("100 Metre", "Metre", "Length").code(),
            codes::UNKNOWN_UNIT
        );
        assert_eq!(Error::malformed("0[km", "unterminated").code(), codes::MALFORMED_FORMAT);
    }

    #[test]
    fn test_display_carries_input_and_unit() {
        let err = Error::unknown_unit("100 Metre", "Metre", "Length");
        let msg = err.to_string();
        assert!(msg.contains("Metre"));
        assert!(msg.contains("100 Metre"));
        assert!(err.suggestion().is_some_and(|s| s.contains("Length")));
    }
}
