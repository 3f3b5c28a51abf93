//! Core [`CompletionClient`] trait, request types and [`CompletionError`].

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantSettings;

// ---------------------------------------------------------------------------
// Messages and requests
// ---------------------------------------------------------------------------

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A normalized chat request, built per call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Provider-specific parameters copied verbatim into the request body.
    /// They override the normalized fields when names collide.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CompletionRequest {
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 2048;

    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: Self::DEFAULT_TEMPERATURE,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            extra: serde_json::Map::new(),
        }
    }

    /// Model and sampling parameters taken from the settings.
    pub fn from_settings(settings: &AssistantSettings, messages: Vec<Message>) -> Self {
        Self::new(settings.completion_model.clone(), messages)
            .with_temperature(settings.completion_temperature)
            .with_max_tokens(settings.completion_max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// CompletionError
// ---------------------------------------------------------------------------

/// Failures of a completion call, classified so callers can react
/// differently (e.g. retry only on [`CompletionError::Network`]).
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Connection, DNS, TLS or timeout failure before a response arrived.
    #[error("error completing with {provider}: request failed: {message}")]
    Network { provider: String, message: String },

    /// The service rejected the credential (HTTP 401 / 403).
    #[error("error completing with {provider}: authentication rejected (HTTP {status}): {body}")]
    Authentication {
        provider: String,
        status: u16,
        body: String,
    },

    /// Any other non-2xx status.
    #[error("error completing with {provider}: HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The body was not JSON or lacked the generated text.
    #[error("error completing with {provider}: malformed response: {message}")]
    MalformedResponse { provider: String, message: String },
}

impl CompletionError {
    /// Classifies a non-2xx response.
    pub fn from_status(provider: &str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                provider: provider.to_string(),
                status,
                body,
            },
            _ => Self::Status {
                provider: provider.to_string(),
                status,
                body,
            },
        }
    }

    pub fn network(provider: &str, err: &reqwest::Error) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: error_chain(err),
        }
    }

    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::Network { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::Status { provider, .. }
            | Self::MalformedResponse { provider, .. } => provider,
        }
    }

    /// Only transport failures are worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// `reqwest::Error`'s `Display` omits its causes; join them.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Text of a non-2xx body; a failed read is reported in its place.
pub(crate) fn error_body(body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {}>", error_chain(&e)))
}

/// Full debug detail when `verbose`, the one-line summary otherwise.
fn failure_report(err: &CompletionError, verbose: bool) -> String {
    if verbose {
        format!("{err}\n{err:#?}")
    } else {
        err.to_string()
    }
}

pub(crate) fn report_failure(err: &CompletionError, verbose: bool) {
    log::error!("{}", failure_report(err, verbose));
}

// ---------------------------------------------------------------------------
// CompletionClient trait
// ---------------------------------------------------------------------------

/// A chat-completion backend.
///
/// Implementors hold no per-request state and must be `Send + Sync` so they
/// can live behind `Box<dyn CompletionClient>` / `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Sends `request` and returns the full generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Lazy chunk stream over [`complete`](Self::complete).
    ///
    /// Nothing is sent until the stream is first polled.  Backends request a
    /// non-streaming response, so the stream yields exactly one item: the
    /// whole reply or the error.
    fn stream_completion<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> BoxStream<'a, Result<String, CompletionError>> {
        stream::once(async move { self.complete(&request).await }).boxed()
    }
}

// Compile-time assertion: Box<dyn CompletionClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn CompletionClient>) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "hi" }));
    }

    #[test]
    fn request_defaults() {
        let req = CompletionRequest::new("m", vec![Message::user("q")]);
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 2048);
        assert!(req.extra.is_empty());
    }

    #[test]
    fn auth_statuses_are_classified() {
        assert!(matches!(
            CompletionError::from_status("P", 401, String::new()),
            CompletionError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            CompletionError::from_status("P", 403, String::new()),
            CompletionError::Authentication { status: 403, .. }
        ));
        assert!(matches!(
            CompletionError::from_status("P", 429, String::new()),
            CompletionError::Status { status: 429, .. }
        ));
    }

    #[test]
    fn only_network_errors_are_retryable() {
        let network = CompletionError::Network {
            provider: "P".into(),
            message: "connection refused".into(),
        };
        assert!(network.is_retryable());
        assert!(!CompletionError::malformed("P", "no choices").is_retryable());
        assert!(!CompletionError::from_status("P", 500, String::new()).is_retryable());
    }

    #[test]
    fn message_keeps_original_context() {
        let err = CompletionError::from_status("Perplexity AI", 500, "upstream down".into());
        let text = err.to_string();
        assert!(text.contains("Perplexity AI"));
        assert!(text.contains("500"));
        assert!(text.contains("upstream down"));
        assert_eq!(err.provider(), "Perplexity AI");
    }

    #[test]
    fn verbose_report_adds_debug_detail() {
        let err = CompletionError::from_status("Perplexity AI", 429, "slow down".into());

        let summary = failure_report(&err, false);
        assert_eq!(summary, err.to_string());
        assert!(!summary.contains('\n'));

        let detail = failure_report(&err, true);
        assert!(detail.starts_with(&summary));
        assert!(detail.contains("Status {"));
        assert!(detail.contains("status: 429"));
    }

    #[tokio::test]
    async fn unreadable_error_body_keeps_its_cause() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .unwrap_err();
        let body = error_body(Err(err));
        assert!(body.starts_with("<unreadable body: "));
        assert!(body.len() > "<unreadable body: >".len());

        assert_eq!(error_body(Ok("rate limited".into())), "rate limited");
    }

    struct Echo;

    #[async_trait]
    impl CompletionClient for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            Ok(request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn default_stream_yields_single_chunk() {
        let client = Echo;
        let chunks: Vec<_> = client
            .stream_completion(CompletionRequest::new("m", vec![Message::user("hello")]))
            .collect()
            .await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_deref().unwrap(), "hello");
    }
}
