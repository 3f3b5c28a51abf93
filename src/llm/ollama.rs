//! Client for a local Ollama server's native `/api/chat` endpoint.
//!
//! No authentication.  `keep_alive` controls how long Ollama keeps the model
//! loaded after the call; sampling parameters go under `options`.

use async_trait::async_trait;

use crate::config::AssistantSettings;
use crate::llm::client::{error_body, report_failure, CompletionClient, CompletionError, CompletionRequest};

const PROVIDER: &str = "Ollama";

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    keep_alive: String,
    verbose: bool,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, keep_alive: impl Into<String>, verbose: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            keep_alive: keep_alive.into(),
            verbose,
        }
    }

    pub fn from_settings(settings: &AssistantSettings) -> Self {
        Self::new(
            settings.ollama_api_base_url.clone(),
            settings.ollama_keep_alive.clone(),
            settings.verbose,
        )
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    /// Ollama reads a bare number as seconds (negative: keep loaded) and a
    /// string as a Go duration such as `"5m"`, which needs a unit.
    fn keep_alive_value(&self) -> serde_json::Value {
        let keep_alive = self.keep_alive.trim();
        if let Ok(seconds) = keep_alive.parse::<i64>() {
            return seconds.into();
        }
        match keep_alive.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() => seconds.into(),
            _ => keep_alive.into(),
        }
    }

    fn body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":      request.model,
            "messages":   request.messages,
            "stream":     false,
            "keep_alive": self.keep_alive_value(),
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });
        if let Some(map) = body.as_object_mut() {
            map.extend(request.extra.clone());
        }
        body
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = self.chat_url();
        log::debug!("POST {url} model={}", request.model);

        let response = self
            .http
            .post(&url)
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| CompletionError::network(PROVIDER, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(CompletionError::from_status(PROVIDER, status.as_u16(), body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::malformed(PROVIDER, e.to_string()))?;

        json["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CompletionError::malformed(PROVIDER, "missing message.content"))
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.send(request)
            .await
            .inspect_err(|e| report_failure(e, self.verbose))
    }
}
