//! Flat settings sources parsed from TOML.

use std::collections::BTreeMap;
use std::path::Path;

use super::{ConfigError, SettingValue};

/// Keys starting with this prefix are internal and never become settings.
pub const PRIVATE_PREFIX: &str = "__";

/// The maintainer-authored defaults, embedded at compile time.
const DEFAULT_SETTINGS: &str = include_str!("default.toml");

/// Returns `true` for keys reserved for internal use.
pub fn is_private_key(key: &str) -> bool {
    key.starts_with(PRIVATE_PREFIX)
}

/// One flat `name → value` namespace (the defaults or the user's file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSource {
    entries: BTreeMap<String, SettingValue>,
}

impl SettingsSource {
    /// Parses a TOML document, dropping private keys.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = text.parse()?;
        let mut entries = BTreeMap::new();
        for (key, value) in table {
            if is_private_key(&key) {
                continue;
            }
            let value = SettingValue::from_toml(&key, value)?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    /// The built-in defaults.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_SETTINGS).map_err(|e| ConfigError::Defaults(e.to_string()))
    }

    /// Loads a user source from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist; an unreadable or
    /// malformed file is still an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map(Some)
    }

    /// Builds a source from in-memory pairs; private keys are dropped.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<SettingValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !is_private_key(k))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, SettingValue> {
        self.entries
    }
}
