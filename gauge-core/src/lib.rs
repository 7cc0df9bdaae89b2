//! Gauge Core - Fundamental types
//!
//! This crate provides the pieces every other Gauge crate builds on:
//! - `Error`: the parse/format error taxonomy with machine-readable codes
//! - `Culture`: decimal and group separators, plus the thread's current culture
//! - `parse_number`: culture-aware numeric text parsing
//! - `format_number`: standard (`G`, `F`, `N`, `E`, `R`) and custom
//!   (`0.00`, `# ###`, `0.0E-0`) numeric formats

mod culture;
mod error;
mod format;
mod number;

pub use culture::{
    Culture, CultureGuard, NAN_SYMBOL, NEGATIVE_INFINITY_SYMBOL, POSITIVE_INFINITY_SYMBOL,
};
pub use error::{codes, Error, Result};
pub use format::{format_number, special_literal};
pub use number::parse_number;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{format_number, parse_number, Culture, Error, Result};
}
