//! Client for OpenAI-format `chat/completions` endpoints.
//!
//! Used for Perplexity AI and OpenAI; any service speaking the same wire
//! format works through [`ChatCompletionsClient::new`].  The request is sent
//! with `stream: false` semantics (the field is simply omitted) and the reply
//! is read from `choices[0].message.content`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::llm::client::{error_body, report_failure, CompletionClient, CompletionError, CompletionRequest};

pub const PERPLEXITY_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
pub const PERPLEXITY_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Calls a fixed `chat/completions` endpoint with a bearer credential.
///
/// The credential is resolved once at construction.  A missing credential
/// does not fail construction; the remote service rejects the first call and
/// it surfaces as [`CompletionError::Authentication`].
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    provider: String,
    endpoint: String,
    api_key: Option<String>,
    verbose: bool,
}

impl ChatCompletionsClient {
    pub fn new(
        provider: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        verbose: bool,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider: provider.into(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            verbose,
        }
    }

    /// Reads the credential from the environment variable `key_env`.
    pub fn from_env(
        provider: impl Into<String>,
        endpoint: impl Into<String>,
        key_env: &str,
        verbose: bool,
    ) -> Self {
        let client = Self::new(provider, endpoint, std::env::var(key_env).ok(), verbose);
        if client.api_key.is_none() {
            log::warn!(
                "{key_env} is not set; {} will reject requests",
                client.provider
            );
        }
        client
    }

    /// Perplexity AI, credential from `PERPLEXITY_API_KEY`.
    pub fn perplexity(verbose: bool) -> Self {
        Self::from_env(
            "Perplexity AI",
            PERPLEXITY_ENDPOINT,
            PERPLEXITY_API_KEY_ENV,
            verbose,
        )
    }

    /// OpenAI, credential from `OPENAI_API_KEY`.
    pub fn openai(verbose: bool) -> Self {
        Self::from_env("OpenAI", OPENAI_ENDPOINT, OPENAI_API_KEY_ENV, verbose)
    }

    /// Points the client at another URL (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn body(request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":       request.model,
            "messages":    request.messages,
            "temperature": request.temperature,
            "max_tokens":  request.max_tokens,
        });
        if let Some(map) = body.as_object_mut() {
            map.extend(request.extra.clone());
        }
        body
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut req = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&Self::body(request));

        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "POST {} model={} messages={}",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let response = req
            .send()
            .await
            .map_err(|e| CompletionError::network(&self.provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(CompletionError::from_status(
                &self.provider,
                status.as_u16(),
                body,
            ));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::malformed(&self.provider, e.to_string()))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                CompletionError::malformed(&self.provider, "missing choices[0].message.content")
            })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.send(request)
            .await
            .inspect_err(|e| report_failure(e, self.verbose))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
