//! Number format information per culture
//!
//! The current culture is per thread. `Culture::scoped` swaps it for the
//! lifetime of a guard and puts the old one back on every exit path.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::marker::PhantomData;

/// Literal used for NaN, independent of culture
pub const NAN_SYMBOL: &str = "NaN";
/// Literal used for positive infinity, independent of culture
pub const POSITIVE_INFINITY_SYMBOL: &str = "Infinity";
/// Literal used for negative infinity, independent of culture
pub const NEGATIVE_INFINITY_SYMBOL: &str = "-Infinity";

const NO_BREAK_SPACE: char = '\u{a0}';
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';

thread_local! {
    static CURRENT: RefCell<Culture> = RefCell::new(Culture::invariant());
}

/// Separators and signs used to read and write numbers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Culture {
    /// Culture name (e.g. "en-US", "sv-SE"), "invariant" for the invariant culture
    pub name: String,
    pub decimal_separator: char,
    pub group_separator: char,
    pub negative_sign: char,
    pub positive_sign: char,
}

impl Culture {
    pub fn new(name: impl Into<String>, decimal_separator: char, group_separator: char) -> Self {
        Culture {
            name: name.into(),
            decimal_separator,
            group_separator,
            negative_sign: '-',
            positive_sign: '+',
        }
    }

    /// Culture-neutral formatting: '.' decimal, ',' group
    pub fn invariant() -> Self {
        Self::new("invariant", '.', ',')
    }

    /// All cultures known by name
    pub fn builtin() -> Vec<Culture> {
        vec![
            Self::invariant(),
            Self::new("en-US", '.', ','),
            Self::new("en-GB", '.', ','),
            Self::new("de-DE", ',', '.'),
            Self::new("fr-FR", ',', NARROW_NO_BREAK_SPACE),
            Self::new("sv-SE", ',', NO_BREAK_SPACE),
            Self::new("nb-NO", ',', NO_BREAK_SPACE),
        ]
    }

    /// Look up a builtin culture by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Culture> {
        let name = name.trim();
        Self::builtin()
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// True for the culture's group separator and, when that separator is a
    /// space of any kind, for every whitespace character.
    pub fn is_group_separator(&self, c: char) -> bool {
        c == self.group_separator || (self.group_separator.is_whitespace() && c.is_whitespace())
    }

    /// The current culture of this thread
    pub fn current() -> Culture {
        CURRENT.with(|c| c.borrow().clone())
    }

    /// Replace the current culture of this thread, returning the previous one
    pub fn set_current(culture: Culture) -> Culture {
        CURRENT.with(|c| c.replace(culture))
    }

    /// Make `culture` current until the returned guard is dropped
    pub fn scoped(culture: Culture) -> CultureGuard {
        let previous = Self::set_current(culture);
        CultureGuard {
            previous: Some(previous),
            _thread_bound: PhantomData,
        }
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Restores the previous current culture when dropped
///
/// The guard is tied to the thread that created it.
#[must_use = "the previous culture is restored as soon as the guard is dropped"]
pub struct CultureGuard {
    previous: Option<Culture>,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for CultureGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            Culture::set_current(previous);
        }
    }
}
