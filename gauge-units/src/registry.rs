//! Unit registry: kinds, their units and the current default unit of each kind
//!
//! A process-wide registry holding every built-in kind is available through
//! [`with_default_registry`] and [`with_default_registry_mut`]. Independent
//! registries can be built with [`UnitRegistry::builtin`] or [`UnitRegistry::new`].

use crate::format;
use crate::kinds::{builtin_kinds, Kind, KindDescriptor};
use crate::parse;
use crate::quantity::Quantity;
use crate::{Dimension, Unit};
use gauge_core::{Culture, Error, Result};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{LazyLock, PoisonError, RwLock};
use tracing::{debug, warn};

static DEFAULT_REGISTRY: LazyLock<RwLock<UnitRegistry>> =
    LazyLock::new(|| RwLock::new(UnitRegistry::builtin(Culture::invariant())));

/// Run `f` with shared access to the process-wide registry
///
/// Do not call [`with_default_registry_mut`] from inside `f`.
pub fn with_default_registry<R>(f: impl FnOnce(&UnitRegistry) -> R) -> R {
    let registry = DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}

/// Run `f` with exclusive access to the process-wide registry
pub fn with_default_registry_mut<R>(f: impl FnOnce(&mut UnitRegistry) -> R) -> R {
    let mut registry = DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

/// Change the default unit of `kind` in the process-wide registry until the
/// returned guard is dropped. `None` when the kind or unit is unknown.
pub fn scoped_global_default_unit(kind: &str, symbol: &str) -> Option<GlobalDefaultUnitGuard> {
    with_default_registry_mut(|registry| {
        let previous = registry.entry(kind)?.default_override;
        if !registry.try_set_default_unit(kind, symbol) {
            return None;
        }
        Some(GlobalDefaultUnitGuard {
            kind: kind.to_string(),
            previous,
        })
    })
}

#[derive(Debug, Clone)]
struct KindEntry {
    name: String,
    dimension: Dimension,
    /// Registration order
    units: Vec<Unit>,
    /// Exact symbol -> position in `units`
    index: HashMap<String, usize>,
    /// Unit flagged as default at registration
    flagged_default: Option<usize>,
    /// Unit chosen at runtime, overrides the intrinsic default
    default_override: Option<usize>,
}

impl KindEntry {
    fn new(name: &str, dimension: Dimension) -> Self {
        KindEntry {
            name: name.to_string(),
            dimension,
            units: Vec::new(),
            index: HashMap::new(),
            flagged_default: None,
            default_override: None,
        }
    }

    /// Exact match first, then the earliest case-insensitive match
    fn find(&self, symbol: &str) -> Option<usize> {
        if let Some(&position) = self.index.get(symbol) {
            return Some(position);
        }
        let lower = symbol.to_lowercase();
        self.units
            .iter()
            .position(|unit| unit.symbol.to_lowercase() == lower)
    }

    fn insert(&mut self, symbol: &str, scale: f64, is_default: bool) -> usize {
        let position = match self.index.get(symbol) {
            Some(&position) => {
                let unit = &mut self.units[position];
                if unit.scale != scale {
                    warn!(
                        kind = %self.name,
                        symbol,
                        old = unit.scale,
                        new = scale,
                        "unit re-registered with a different scale"
                    );
                }
                unit.scale = scale;
                position
            }
            None => {
                self.units
                    .push(Unit::new(symbol, self.name.as_str(), self.dimension, scale));
                self.index.insert(symbol.to_string(), self.units.len() - 1);
                self.units.len() - 1
            }
        };
        if is_default {
            self.flagged_default = Some(position);
            self.default_override = None;
        }
        position
    }

    fn intrinsic_default(&self) -> Option<usize> {
        self.flagged_default
            .or_else(|| self.units.iter().position(Unit::is_base))
    }

    fn default_unit(&self) -> Unit {
        self.default_override
            .or_else(|| self.intrinsic_default())
            .map(|position| self.units[position].clone())
            .unwrap_or_else(|| self.base_unit())
    }

    fn base_unit(&self) -> Unit {
        self.units
            .iter()
            .find(|unit| unit.is_base())
            .cloned()
            .unwrap_or_else(|| Unit::base(self.name.as_str(), self.dimension))
    }
}

/// Registry of quantity kinds and their units
///
/// Lookups are exact first, then case-insensitive (earliest registered unit
/// wins). An empty symbol always means the kind's current default unit.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    culture: Culture,
    kinds: Vec<KindEntry>,
    by_name: HashMap<String, usize>,
}

impl UnitRegistry {
    /// Empty registry using `culture` for parsing and formatting
    pub fn new(culture: Culture) -> Self {
        UnitRegistry {
            culture,
            kinds: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry holding every built-in kind
    pub fn builtin(culture: Culture) -> Self {
        let mut registry = Self::new(culture);
        for descriptor in builtin_kinds() {
            registry.push_kind(&descriptor);
        }
        debug!(kinds = registry.kinds.len(), "built-in unit registry ready");
        registry
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn set_culture(&mut self, culture: Culture) {
        self.culture = culture;
    }

    /// Builder form of [`set_culture`](Self::set_culture)
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Register the marker type `K` and its units
    pub fn register<K: Kind>(&mut self) -> Result<&mut Self> {
        self.register_kind(&K::descriptor())
    }

    /// Register a kind and its units
    ///
    /// Re-registering a known kind adds its new units, updates the scale of
    /// existing symbols in place and moves the default if one is flagged.
    pub fn register_kind(&mut self, descriptor: &KindDescriptor) -> Result<&mut Self> {
        self.define_kind(descriptor.name, descriptor.dimension)?;
        self.push_kind(descriptor);
        Ok(self)
    }

    /// Declare a kind without units; its base unit is synthesized from the dimension
    pub fn define_kind(&mut self, name: &str, dimension: Dimension) -> Result<()> {
        if let Some(entry) = self.entry(name) {
            if entry.dimension != dimension {
                return Err(Error::IncompatibleDimensions {
                    left: format!("{} ({})", name, entry.dimension),
                    right: dimension.to_string(),
                });
            }
            return Ok(());
        }
        self.by_name.insert(name.to_string(), self.kinds.len());
        self.kinds.push(KindEntry::new(name, dimension));
        debug!(kind = name, %dimension, "kind defined");
        Ok(())
    }

    /// Add or update one unit of an existing kind
    pub fn register_unit(
        &mut self,
        kind: &str,
        symbol: &str,
        scale: f64,
        is_default: bool,
    ) -> Result<()> {
        let entry = self
            .entry_mut(kind)
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))?;
        entry.insert(symbol.trim(), scale, is_default);
        debug!(kind, symbol, scale, is_default, "unit registered");
        Ok(())
    }

    fn push_kind(&mut self, descriptor: &KindDescriptor) {
        let position = match self.by_name.get(descriptor.name) {
            Some(&position) => position,
            None => {
                self.by_name
                    .insert(descriptor.name.to_string(), self.kinds.len());
                self.kinds
                    .push(KindEntry::new(descriptor.name, descriptor.dimension));
                self.kinds.len() - 1
            }
        };
        let entry = &mut self.kinds[position];
        for unit in descriptor.units {
            entry.insert(unit.symbol, unit.scale, unit.is_default);
        }
        debug!(
            kind = descriptor.name,
            units = descriptor.units.len(),
            "kind registered"
        );
    }

    fn entry(&self, kind: &str) -> Option<&KindEntry> {
        self.by_name.get(kind).map(|&position| &self.kinds[position])
    }

    fn entry_mut(&mut self, kind: &str) -> Option<&mut KindEntry> {
        let position = *self.by_name.get(kind)?;
        Some(&mut self.kinds[position])
    }

    /// Names of the registered kinds, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains_kind(&self, kind: &str) -> bool {
        self.by_name.contains_key(kind)
    }

    pub fn kind_dimension(&self, kind: &str) -> Option<Dimension> {
        self.entry(kind).map(|entry| entry.dimension)
    }

    /// Units of `kind`, in registration order
    pub fn units(&self, kind: &str) -> Option<&[Unit]> {
        self.entry(kind).map(|entry| entry.units.as_slice())
    }

    /// Look up a unit of `kind`; the empty symbol gives the current default
    pub fn try_get_unit(&self, kind: &str, symbol: &str) -> Option<Unit> {
        let entry = self.entry(kind)?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Some(entry.default_unit());
        }
        entry.find(symbol).map(|position| entry.units[position].clone())
    }

    /// Current default unit of `kind`
    pub fn default_unit(&self, kind: &str) -> Option<Unit> {
        self.entry(kind).map(KindEntry::default_unit)
    }

    /// Scale-1 unit of `kind`, synthesized from the dimension if none is registered
    pub fn base_unit(&self, kind: &str) -> Option<Unit> {
        self.entry(kind).map(KindEntry::base_unit)
    }

    /// Make `symbol` the default unit of `kind`
    ///
    /// The empty symbol resets the kind to its intrinsic default. Returns
    /// `false`, leaving the registry unchanged, when the kind or unit is unknown.
    pub fn try_set_default_unit(&mut self, kind: &str, symbol: &str) -> bool {
        let Some(entry) = self.entry_mut(kind) else {
            return false;
        };
        let symbol = symbol.trim();
        if symbol.is_empty() {
            entry.default_override = None;
            debug!(kind, "default unit reset");
            return true;
        }
        match entry.find(symbol) {
            Some(position) => {
                entry.default_override = Some(position);
                debug!(kind, unit = %entry.units[position].symbol, "default unit changed");
                true
            }
            None => false,
        }
    }

    /// Change the default unit of `kind` until the returned guard is dropped
    pub fn scoped_default_unit(
        &mut self,
        kind: &str,
        symbol: &str,
    ) -> Option<DefaultUnitGuard<'_>> {
        let previous = self.entry(kind)?.default_override;
        if !self.try_set_default_unit(kind, symbol) {
            return None;
        }
        Some(DefaultUnitGuard {
            registry: self,
            kind: kind.to_string(),
            previous,
        })
    }

    fn restore_default(&mut self, kind: &str, previous: Option<usize>) {
        if let Some(entry) = self.entry_mut(kind) {
            entry.default_override = previous;
        }
    }

    /// Default unit of the first registered kind with `dimension`
    pub fn try_get_display_unit(&self, dimension: Dimension) -> Option<Unit> {
        self.kinds
            .iter()
            .find(|entry| entry.dimension == dimension)
            .map(KindEntry::default_unit)
    }

    /// Like [`try_get_display_unit`](Self::try_get_display_unit), falling
    /// back to the composite SI unit of the dimension
    pub fn display_unit(&self, dimension: Dimension) -> Unit {
        self.try_get_display_unit(dimension)
            .unwrap_or_else(|| Unit::base("", dimension))
    }

    /// Resolve a symbol against every kind, then as a composite expression
    /// such as "kg*m/s^2"
    pub fn resolve_symbol(&self, symbol: &str) -> Result<Unit> {
        parse::parse_unit(self, symbol)
    }

    /// First kind holding exactly `symbol`, then the first holding it
    /// case-insensitively
    pub(crate) fn find_symbol(&self, symbol: &str) -> Option<Unit> {
        self.kinds
            .iter()
            .find_map(|entry| entry.index.get(symbol).map(|&p| entry.units[p].clone()))
            .or_else(|| {
                self.kinds.iter().find_map(|entry| {
                    entry.find(symbol).map(|p| entry.units[p].clone())
                })
            })
    }

    /// Parse text into a value of `kind` in its base unit
    pub fn parse_value(&self, kind: &str, input: &str, culture: &Culture) -> Result<f64> {
        parse::parse_value(self, kind, input, culture)
    }

    pub fn try_parse_value(&self, kind: &str, input: &str, culture: &Culture) -> Option<f64> {
        self.parse_value(kind, input, culture).ok()
    }

    /// Parse using the registry's culture
    pub fn parse<K: Kind>(&self, input: &str) -> Result<Quantity<K>> {
        self.parse_in(input, &self.culture)
    }

    pub fn parse_in<K: Kind>(&self, input: &str, culture: &Culture) -> Result<Quantity<K>> {
        self.parse_value(K::NAME, input, culture).map(Quantity::new)
    }

    pub fn try_parse<K: Kind>(&self, input: &str) -> Option<Quantity<K>> {
        self.parse(input).ok()
    }

    /// Format a base-unit value of `kind`; see [`format::format_value`]
    pub fn format_value(
        &self,
        kind: &str,
        value: f64,
        format: Option<&str>,
        culture: &Culture,
    ) -> Result<String> {
        format::format_value(self, kind, value, format, culture)
    }

    /// Format using the registry's culture
    pub fn format<K: Kind>(&self, quantity: Quantity<K>, format: Option<&str>) -> Result<String> {
        self.format_in(quantity, format, &self.culture)
    }

    pub fn format_in<K: Kind>(
        &self,
        quantity: Quantity<K>,
        format: Option<&str>,
        culture: &Culture,
    ) -> Result<String> {
        self.format_value(K::NAME, quantity.value(), format, culture)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::builtin(Culture::invariant())
    }
}

/// Restores the previous default unit of a kind when dropped
#[must_use = "the previous default unit is restored as soon as the guard is dropped"]
pub struct DefaultUnitGuard<'a> {
    registry: &'a mut UnitRegistry,
    kind: String,
    previous: Option<usize>,
}

impl Deref for DefaultUnitGuard<'_> {
    type Target = UnitRegistry;

    fn deref(&self) -> &UnitRegistry {
        self.registry
    }
}

impl DerefMut for DefaultUnitGuard<'_> {
    fn deref_mut(&mut self) -> &mut UnitRegistry {
        self.registry
    }
}

impl Drop for DefaultUnitGuard<'_> {
    fn drop(&mut self) {
        self.registry.restore_default(&self.kind, self.previous);
    }
}

/// Restores the previous default unit in the process-wide registry when dropped
#[must_use = "the previous default unit is restored as soon as the guard is dropped"]
pub struct GlobalDefaultUnitGuard {
    kind: String,
    previous: Option<usize>,
}

impl Drop for GlobalDefaultUnitGuard {
    fn drop(&mut self) {
        with_default_registry_mut(|registry| registry.restore_default(&self.kind, self.previous));
    }
}
