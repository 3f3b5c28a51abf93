//! Typed view over the resolved configuration.
//!
//! [`ResolvedConfig`] is the source of truth; [`AssistantSettings`] is what
//! components read.  Nullable settings (`{}` in TOML) are `Option`s.  Extra
//! user keys the struct does not name are ignored here but remain visible
//! through [`ResolvedConfig::get`].

use serde::{Deserialize, Serialize};

use super::{ConfigError, ResolvedConfig};

/// All settings the assistant understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Print full diagnostics on failures and log at `debug`.
    pub verbose: bool,
    pub use_gpu: bool,

    // Completions
    /// Backend name: `"ollama"`, `"perplexity"` or `"openai"`.
    pub completions_api: String,
    pub completion_model: String,
    pub completion_temperature: f64,
    pub completion_max_tokens: u32,
    pub ollama_api_base_url: String,
    /// How long Ollama keeps the model loaded (`"5m"`, `"-1"` …).
    pub ollama_keep_alive: String,

    // Transcription
    pub transcription_api: String,
    pub whisper_model: String,
    pub beam_size: u32,

    // Speech synthesis
    pub tts_engine: String,
    pub piper_voice: String,
    pub piper_voice_index: u32,
    pub piper_voice_speed: f32,
    pub openai_voice: String,

    /// System prompt name; `None` sends no system prompt.
    pub active_prompt: Option<String>,

    // Hotkeys; `None` disables the binding
    pub cancel_hotkey: Option<String>,
    pub clear_history_hotkey: Option<String>,
    pub record_hotkey: Option<String>,
    /// Double-tap window for the record hotkey, in seconds.
    pub record_hotkey_delay: f32,
    pub suppress_native_hotkeys: bool,
    pub always_include_clipboard: bool,

    pub audio_file_dir: String,
    /// Token budget for conversation memory.
    pub max_tokens: usize,
    /// Marker the model places before text meant for the clipboard.
    pub start_seq: String,
    /// Marker the model places after text meant for the clipboard.
    pub end_seq: String,

    // Audio
    pub base_volume: f32,
    pub start_sound_volume: f32,
    pub end_sound_volume: f32,
    pub cancel_sound_volume: f32,
    /// Recordings shorter than this (seconds) are discarded.
    pub min_recording_duration: f32,
    /// Recording stops automatically after this many seconds.
    pub max_recording_duration: f32,
}

impl AssistantSettings {
    /// Reads the typed view out of the resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        config.to_settings()
    }
}
