use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, resolving or interpreting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The embedded default settings could not be parsed.  Fatal: the
    /// process cannot start without them.
    #[error("built-in default settings could not be loaded: {0}")]
    Defaults(String),

    /// A settings file exists but could not be read or written.
    #[error("settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings document is not valid TOML.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds a value that is not a flat scalar.
    #[error(
        "setting `{key}` has an unsupported {kind} value \
         (expected a boolean, number, string, or {{}} for none)"
    )]
    UnsupportedValue { key: String, kind: &'static str },

    /// The resolved settings do not fit the typed settings struct.
    #[error("resolved settings do not match the expected shape: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// `completions_api` names a backend this build does not know.
    #[error("unknown completions API `{0}` (expected one of: ollama, perplexity, openai)")]
    UnknownProvider(String),

    /// `active_prompt` names a prompt file that does not exist.
    #[error("system prompt `{name}` not found at {}", .path.display())]
    PromptNotFound { name: String, path: PathBuf },
}
