//! JSON configuration of unit registries
//!
//! ```json
//! {
//!   "culture": "sv-SE",
//!   "kinds": [
//!     { "name": "Length", "units": [{ "symbol": "mil", "scale": 10000.0 }] },
//!     { "name": "Jerk", "dimension": [1, 0, -3, 0, 0, 0, 0],
//!       "units": [{ "symbol": "m/s^3", "scale": 1.0, "default": true }] }
//!   ],
//!   "defaults": { "Fraction": "%" }
//! }
//! ```

use crate::{Dimension, UnitRegistry};
use gauge_core::{Culture, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV: &str = "GAUGE_UNITS_CONFIG";
/// Environment variable naming the culture, overriding the file
pub const CULTURE_ENV: &str = "GAUGE_CULTURE";

/// Registry customization: culture, extra kinds and units, default units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<KindConfig>,
    /// Kind name -> default unit symbol
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, String>,
}

/// Units added to a kind; `dimension` is required for kinds not yet registered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitConfig {
    pub symbol: String,
    pub scale: f64,
    #[serde(default)]
    pub default: bool,
}

impl UnitsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Configuration from `GAUGE_UNITS_CONFIG` and `GAUGE_CULTURE`
    ///
    /// Both variables are optional; with neither set this is the empty configuration.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!(path = %path, "loading unit configuration");
                Self::from_file(path.trim())?
            }
            _ => Self::default(),
        };
        if let Ok(culture) = std::env::var(CULTURE_ENV) {
            if !culture.trim().is_empty() {
                config.culture = Some(culture.trim().to_string());
            }
        }
        Ok(config)
    }

    /// Apply culture, kinds and defaults to `registry`, in that order
    pub fn apply(&self, registry: &mut UnitRegistry) -> Result<()> {
        if let Some(name) = &self.culture {
            let culture =
                Culture::from_name(name).ok_or_else(|| Error::UnknownCulture(name.clone()))?;
            registry.set_culture(culture);
        }

        for kind in &self.kinds {
            match (registry.kind_dimension(&kind.name), kind.dimension) {
                (_, Some(dimension)) => registry.define_kind(&kind.name, dimension)?,
                (Some(_), None) => {}
                (None, None) => {
                    return Err(Error::Config(format!(
                        "kind '{}' is not registered and has no dimension",
                        kind.name
                    )))
                }
            }
            for unit in &kind.units {
                if !(unit.scale.is_finite() && unit.scale > 0.0) {
                    return Err(Error::Config(format!(
                        "unit '{}' of {} needs a positive finite scale",
                        unit.symbol, kind.name
                    )));
                }
                registry.register_unit(&kind.name, &unit.symbol, unit.scale, unit.default)?;
            }
        }

        for (kind, symbol) in &self.defaults {
            if !registry.contains_kind(kind) {
                return Err(Error::UnknownKind(kind.clone()));
            }
            if !registry.try_set_default_unit(kind, symbol) {
                return Err(Error::unknown_unit(symbol, symbol, kind));
            }
        }

        debug!(
            kinds = self.kinds.len(),
            defaults = self.defaults.len(),
            "unit configuration applied"
        );
        Ok(())
    }

    /// Built-in registry with this configuration applied
    pub fn build(&self) -> Result<UnitRegistry> {
        let mut registry = UnitRegistry::builtin(Culture::invariant());
        self.apply(&mut registry)?;
        Ok(registry)
    }
}
