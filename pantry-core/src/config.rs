//! # Configuration
//!
//! A minimal configuration system based on a simple string key/value
//! store. Components read typed values out of a [`PantryConfigSnapshot`].
//!
//! ```rust
//! use pantry_core::PantryConfig;
//!
//! let mut config = PantryConfig::new();
//! config.set("inventory.default_price", "3");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_f64("inventory.default_price"), Some(3.0));
//! ```
//!
//! ## Environment overrides
//! [`PantryConfig::load_env`] maps prefixed variables onto dotted keys:
//!
//! ```bash
//! export PANTRY__INVENTORY__DEFAULT_PRICE=3   # inventory.default_price
//! ```

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PantryConfig {
    values: HashMap<String, String>,
}

impl PantryConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Load every environment variable starting with `prefix`.
    ///
    /// `PANTRY__INVENTORY__COLLECTION` with prefix `PANTRY__` becomes
    /// `inventory.collection`.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    /// Same as [`load_env`](Self::load_env) over an explicit set of pairs.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                tracing::debug!(key = %normalized, "config override from environment");
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> PantryConfigSnapshot {
        PantryConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PantryConfigSnapshot {
    map: HashMap<String, String>,
}

impl PantryConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse::<f64>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}
