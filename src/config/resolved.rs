//! The merged, read-only configuration.
//!
//! # Merge rule
//!
//! 1. Every default is copied.
//! 2. Every user value overwrites, whether or not the key exists in the
//!    defaults (unknown keys are kept, not rejected).
//!
//! Default keys the user source does not mention are collected as
//! [`ResolvedConfig::missing_keys`].  That set is advisory only: it is
//! printed once at load time and never blocks startup.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{AppPaths, ConfigError, SettingValue, SettingsSource};

// ---------------------------------------------------------------------------
// ResolvedConfig
// ---------------------------------------------------------------------------

/// Defaults merged with the user's overrides.
///
/// Built once at process start and passed by reference to whatever needs it;
/// there is no API to mutate it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    values: BTreeMap<String, SettingValue>,
    missing: BTreeSet<String>,
}

impl ResolvedConfig {
    /// Merges `defaults` with the optional `user` source.
    ///
    /// `user == None` (no file) behaves like an empty source: the result
    /// equals the defaults and every default key is reported missing.
    pub fn merge(defaults: SettingsSource, user: Option<SettingsSource>) -> Self {
        let user = user.unwrap_or_default();

        let missing = defaults
            .keys()
            .filter(|k| !user.contains(k))
            .map(str::to_string)
            .collect();

        let mut values = defaults.into_entries();
        values.extend(user.into_entries());

        Self { values, missing }
    }

    /// Loads the defaults plus the user file at the platform config path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&AppPaths::new().user_config_file)
    }

    /// Loads the defaults plus the user file at `path` and prints the
    /// missing-key advisory to stdout.
    ///
    /// A missing or partial user file is never an error.  Failing to parse
    /// the built-in defaults is ([`ConfigError::Defaults`]).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let defaults = SettingsSource::defaults()?;
        let user = SettingsSource::load_optional(path)?;
        if user.is_none() {
            log::info!("No user config at {}; using defaults", path.display());
        }

        let config = Self::merge(defaults, user);
        config.advisory().emit();
        Ok(config)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(SettingValue::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SettingValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SettingValue::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SettingValue::as_str)
    }

    /// All setting names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Default keys absent from the user source, sorted.
    pub fn missing_keys(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    pub fn advisory(&self) -> MissingKeysAdvisory<'_> {
        MissingKeysAdvisory {
            keys: &self.missing,
        }
    }

    /// Deserializes the resolved mapping into a typed view such as
    /// [`AssistantSettings`](super::AssistantSettings).
    pub fn to_settings<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    // -----------------------------------------------------------------------
    // Rebuild
    // -----------------------------------------------------------------------

    /// Renders every resolved setting as a TOML document.
    pub fn to_toml_string(&self) -> String {
        let mut out = String::from(
            "# Rebuilt by voice-assistant: every setting with its current value.\n\
             # Edit values to override the built-in defaults; `{}` means none.\n\n",
        );
        for (key, value) in &self.values {
            out.push_str(&toml_key(key));
            out.push_str(" = ");
            out.push_str(&value.to_toml_literal());
            out.push('\n');
        }
        out
    }

    /// Writes a user file holding every default plus the user's own values,
    /// creating parent directories as needed.  After this the advisory is
    /// empty on the next load.
    pub fn rebuild_user_file(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml_string()).map_err(io_err)?;
        log::info!("Rebuilt user config at {}", path.display());
        Ok(())
    }
}

/// Bare keys where TOML allows them, quoted otherwise.
fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}

// ---------------------------------------------------------------------------
// MissingKeysAdvisory
// ---------------------------------------------------------------------------

/// Human-readable report of default keys the user file does not set.
#[derive(Debug, Clone, Copy)]
pub struct MissingKeysAdvisory<'a> {
    keys: &'a BTreeSet<String>,
}

impl MissingKeysAdvisory<'_> {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Prints the advisory to stdout when there is anything to report.
    pub fn emit(&self) {
        if self.is_empty() {
            return;
        }
        log::debug!("{} default setting(s) not set in user config", self.len());
        println!("{self}");
    }
}

impl fmt::Display for MissingKeysAdvisory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The following settings are missing from your config.toml and are using \
             default values (run `voice-assistant --rebuild-config` to add them):"
        )?;
        for key in self.keys {
            write!(f, "\n  - {key}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn source(pairs: &[(&str, i64)]) -> SettingsSource {
        SettingsSource::from_entries(pairs.iter().copied())
    }

    #[test]
    fn user_overrides_defaults_and_adds_unknown_keys() {
        let config = ResolvedConfig::merge(
            source(&[("A", 1), ("B", 2)]),
            Some(source(&[("B", 5), ("C", 9)])),
        );

        assert_eq!(config.get_i64("A"), Some(1));
        assert_eq!(config.get_i64("B"), Some(5));
        assert_eq!(config.get_i64("C"), Some(9));
        assert_eq!(config.len(), 3);
        assert_eq!(config.missing_keys().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn absent_user_source_yields_defaults_and_reports_every_key() {
        let defaults = source(&[("A", 1), ("B", 2)]);
        let config = ResolvedConfig::merge(defaults.clone(), None);

        assert_eq!(config.iter().collect::<Vec<_>>(), defaults.iter().collect::<Vec<_>>());
        assert_eq!(config.missing_keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn empty_user_source_matches_absent_one() {
        let defaults = source(&[("A", 1)]);
        assert_eq!(
            ResolvedConfig::merge(defaults.clone(), Some(SettingsSource::default())),
            ResolvedConfig::merge(defaults, None)
        );
    }

    #[test]
    fn same_value_as_default_still_counts_as_present() {
        let config = ResolvedConfig::merge(
            source(&[("A", 1), ("B", 2)]),
            Some(source(&[("A", 1), ("B", 2)])),
        );
        assert!(config.advisory().is_empty());
    }

    #[test]
    fn user_null_overrides_default() {
        let defaults = SettingsSource::from_entries([("cancel_hotkey", "alt+ctrl+e")]);
        let user = SettingsSource::parse("cancel_hotkey = {}").unwrap();
        let config = ResolvedConfig::merge(defaults, Some(user));

        assert_eq!(config.get("cancel_hotkey"), Some(&SettingValue::Null));
        assert_eq!(config.get_str("cancel_hotkey"), None);
    }

    #[test]
    fn private_keys_never_resolve() {
        let defaults = SettingsSource::parse("__name__ = \"defaults\"\nA = 1").unwrap();
        let user = SettingsSource::parse("__file__ = \"x\"\nB = 2").unwrap();
        let config = ResolvedConfig::merge(defaults, Some(user));

        assert!(config.keys().all(|k| !k.starts_with("__")));
        assert_eq!(config.missing_keys().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn advisory_lists_each_missing_key() {
        let config = ResolvedConfig::merge(source(&[("A", 1), ("B", 2)]), None);
        let text = config.advisory().to_string();
        assert!(text.contains("\n  - A"));
        assert!(text.contains("\n  - B"));
        assert!(text.contains("--rebuild-config"));
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempdir().expect("temp dir");
        let config = ResolvedConfig::load_from(&dir.path().join("config.toml")).expect("load");
        let defaults = SettingsSource::defaults().unwrap();

        assert_eq!(config.len(), defaults.len());
        assert_eq!(config.advisory().len(), defaults.len());
        assert_eq!(config.get_str("completions_api"), Some("ollama"));
    }

    #[test]
    fn load_from_malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "verbose = = true").unwrap();
        assert!(matches!(
            ResolvedConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rebuild_round_trips_and_clears_the_advisory() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "completion_model = \"llama3\"\nactive_prompt = {}\n\"my key\" = 1.5\n",
        )
        .unwrap();

        let before = ResolvedConfig::load_from(&path).unwrap();
        assert!(!before.advisory().is_empty());

        before.rebuild_user_file(&path).unwrap();
        let after = ResolvedConfig::load_from(&path).unwrap();

        assert!(after.advisory().is_empty());
        assert_eq!(after.get_str("completion_model"), Some("llama3"));
        assert_eq!(after.get("active_prompt"), Some(&SettingValue::Null));
        assert_eq!(after.get_f64("my key"), Some(1.5));
        assert_eq!(after.len(), before.len());
    }

    #[test]
    fn rebuild_creates_parent_dirs() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("a").join("b").join("config.toml");
        ResolvedConfig::merge(source(&[("A", 1)]), None)
            .rebuild_user_file(&path)
            .unwrap();
        assert!(path.exists());
    }
}
