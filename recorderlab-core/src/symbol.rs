//! Instrument identifiers and contract descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Globally unique instrument key in `symbol.exchange` form, e.g. `rb2401.SHFE`.
///
/// Opaque to the view: it is never validated here, only compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VtSymbol(String);

impl VtSymbol {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VtSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VtSymbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VtSymbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for VtSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A tradable contract as announced by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub vt_symbol: VtSymbol,
    #[serde(default)]
    pub name: String,
}

impl Contract {
    pub fn new(vt_symbol: impl Into<VtSymbol>) -> Self {
        Self {
            vt_symbol: vt_symbol.into(),
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
