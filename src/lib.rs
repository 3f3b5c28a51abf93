//! Voice-assistant core: layered settings and pluggable completion backends.
//!
//! * [`config`]: built-in defaults merged with the user's `config.toml`.
//! * [`llm`]: completion clients, conversation memory and system prompts.
//! * [`clipboard`]: clipboard sections in replies.
//! * [`logging`]: `env_logger` setup.

pub mod clipboard;
pub mod config;
pub mod llm;
pub mod logging;
