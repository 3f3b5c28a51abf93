//! Configuration module for the voice assistant.
//!
//! Settings come from two flat TOML sources:
//!
//! * the built-in defaults (`default.toml`, embedded in the binary), and
//! * an optional user file (`config.toml` in the platform config directory).
//!
//! [`ResolvedConfig::merge`] combines them with user values taking
//! precedence and records which default keys the user file does not mention.
//! [`AssistantSettings`] is the typed view the rest of the crate reads.

pub mod error;
pub mod paths;
pub mod resolved;
pub mod settings;
pub mod source;
pub mod value;

pub use error::ConfigError;
pub use paths::AppPaths;
pub use resolved::{MissingKeysAdvisory, ResolvedConfig};
pub use settings::AssistantSettings;
pub use source::{is_private_key, SettingsSource, PRIVATE_PREFIX};
pub use value::SettingValue;
