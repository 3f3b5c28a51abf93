//! Completion backends and conversation plumbing.
//!
//! This module provides:
//! * [`CompletionClient`]: async trait implemented by every backend.
//! * [`ChatCompletionsClient`]: OpenAI-format endpoints (Perplexity AI, OpenAI).
//! * [`OllamaClient`]: local Ollama `/api/chat`.
//! * [`build_client`]: picks a backend from the `completions_api` setting.
//! * [`ConversationHistory`]: token-bounded chat memory.
//! * [`SystemPrompts`]: resolves the `active_prompt` setting.
//! * [`CompletionError`]: network / authentication / status / malformed.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use voice_assistant::config::{AppPaths, AssistantSettings, ResolvedConfig};
//! use voice_assistant::llm::{build_client, ConversationHistory, SystemPrompts};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ResolvedConfig::load()?;
//!     let settings = AssistantSettings::from_config(&config)?;
//!
//!     let prompts = SystemPrompts::from_settings(&settings, &AppPaths::new());
//!     let mut history = ConversationHistory::new(settings.max_tokens)
//!         .with_system_prompt(prompts.resolve(settings.active_prompt.as_deref())?);
//!     history.push_user("What's the tallest mountain in Europe?");
//!
//!     let client = build_client(&settings)?;
//!     let mut chunks = client.stream_completion(history.to_request(&settings));
//!     while let Some(chunk) = chunks.next().await {
//!         print!("{}", chunk?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat_completions;
pub mod client;
pub mod history;
pub mod ollama;
pub mod prompt;
pub mod provider;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat_completions::ChatCompletionsClient;
pub use client::{CompletionClient, CompletionError, CompletionRequest, Message, Role};
pub use history::{estimate_tokens, ConversationHistory};
pub use ollama::OllamaClient;
pub use prompt::SystemPrompts;
pub use provider::{build_client, CompletionsApi};
