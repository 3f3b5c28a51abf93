//! Scalar setting values.

use std::fmt;

use super::ConfigError;

/// A single setting's value.
///
/// Settings are flat scalars.  TOML has no null literal, so an empty inline
/// table (`key = {}`) is read as [`SettingValue::Null`]; datetimes are carried
/// as their string form.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl SettingValue {
    /// Converts a parsed TOML value, rejecting arrays and non-empty tables.
    pub fn from_toml(key: &str, value: toml::Value) -> Result<Self, ConfigError> {
        match value {
            toml::Value::Boolean(b) => Ok(Self::Bool(b)),
            toml::Value::Integer(i) => Ok(Self::Integer(i)),
            toml::Value::Float(f) => Ok(Self::Float(f)),
            toml::Value::String(s) => Ok(Self::String(s)),
            toml::Value::Datetime(dt) => Ok(Self::String(dt.to_string())),
            toml::Value::Table(t) if t.is_empty() => Ok(Self::Null),
            toml::Value::Table(_) => Err(ConfigError::UnsupportedValue {
                key: key.to_string(),
                kind: "table",
            }),
            toml::Value::Array(_) => Err(ConfigError::UnsupportedValue {
                key: key.to_string(),
                kind: "array",
            }),
        }
    }

    /// Renders the value as a TOML literal suitable for `key = <literal>`.
    pub fn to_toml_literal(&self) -> String {
        match self {
            Self::Null => "{}".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => toml::Value::Float(*f).to_string(),
            Self::String(s) => toml::Value::String(s.clone()).to_string(),
        }
    }

    /// JSON form used to deserialize the typed settings view.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64` (`base_volume = 1` is a volume
    /// just like `0.05`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("none"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for SettingValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
