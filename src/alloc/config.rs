//! Construction options for an [`Arena`](crate::alloc::Arena).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::alloc::layout::DEFAULT_INITIAL_CAPACITY;

/// Sizes used when building an arena and when it grows.
///
/// Both values are in bytes and are rounded up to a power of two when a slab is
/// actually created.
///
/// ```rust
/// use slabarena::ArenaConfig;
///
/// let config = ArenaConfig::new(4096).with_growth_increment(64 * 1024);
/// assert_eq!(config.growth_increment(), 64 * 1024);
///
/// let parsed = ArenaConfig::from_json(r#"{ "initial_capacity": 4096 }"#).unwrap();
/// assert_eq!(parsed.growth_increment(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Capacity of the first slab.
    pub initial_capacity: usize,
    /// Capacity of each appended slab. `None` reuses `initial_capacity`.
    pub growth_increment: Option<usize>,
}

impl ArenaConfig {
    /// Creates a configuration whose slabs are all `initial_capacity` bytes.
    pub const fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth_increment: None,
        }
    }

    /// Sets the capacity of slabs appended after the first one.
    #[must_use]
    pub const fn with_growth_increment(mut self, growth_increment: usize) -> Self {
        self.growth_increment = Some(growth_increment);
        self
    }

    /// Resolved growth increment.
    pub const fn growth_increment(&self) -> usize {
        match self.growth_increment {
            Some(n) => n,
            None => self.initial_capacity,
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if `json` is not a valid configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY)
    }
}

/// A configuration document could not be parsed.
#[derive(Debug)]
pub struct ConfigError(serde_json::Error);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid arena configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
