//! Selects the completion backend named by `completions_api`.

use std::fmt;
use std::str::FromStr;

use crate::config::{AssistantSettings, ConfigError};
use crate::llm::chat_completions::ChatCompletionsClient;
use crate::llm::client::CompletionClient;
use crate::llm::ollama::OllamaClient;

/// Completion backends this build can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionsApi {
    Ollama,
    Perplexity,
    OpenAi,
}

impl CompletionsApi {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionsApi::Ollama => "ollama",
            CompletionsApi::Perplexity => "perplexity",
            CompletionsApi::OpenAi => "openai",
        }
    }
}

impl FromStr for CompletionsApi {
    type Err = ConfigError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "perplexity" => Ok(Self::Perplexity),
            "openai" => Ok(Self::OpenAi),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for CompletionsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the client for `settings.completions_api`.
pub fn build_client(settings: &AssistantSettings) -> Result<Box<dyn CompletionClient>, ConfigError> {
    let api: CompletionsApi = settings.completions_api.parse()?;
    log::info!("Completions API: {api} (model {})", settings.completion_model);

    let client: Box<dyn CompletionClient> = match api {
        CompletionsApi::Ollama => Box::new(OllamaClient::from_settings(settings)),
        CompletionsApi::Perplexity => Box::new(ChatCompletionsClient::perplexity(settings.verbose)),
        CompletionsApi::OpenAi => Box::new(ChatCompletionsClient::openai(settings.verbose)),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResolvedConfig, SettingsSource};

    fn settings(user: &str) -> AssistantSettings {
        let config = ResolvedConfig::merge(
            SettingsSource::defaults().unwrap(),
            Some(SettingsSource::parse(user).unwrap()),
        );
        AssistantSettings::from_config(&config).unwrap()
    }

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("ollama".parse::<CompletionsApi>().unwrap(), CompletionsApi::Ollama);
        assert_eq!(" Perplexity ".parse::<CompletionsApi>().unwrap(), CompletionsApi::Perplexity);
        assert_eq!("OPENAI".parse::<CompletionsApi>().unwrap(), CompletionsApi::OpenAi);
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = "groq".parse::<CompletionsApi>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(ref name) if name == "groq"));
    }

    #[test]
    fn default_settings_build_ollama() {
        let client = build_client(&settings("")).unwrap();
        assert_eq!(client.name(), "Ollama");
    }

    #[test]
    fn perplexity_is_selectable() {
        let client = build_client(&settings("completions_api = \"perplexity\"")).unwrap();
        assert_eq!(client.name(), "Perplexity AI");
    }

    #[test]
    fn unknown_backend_fails_to_build() {
        assert!(build_client(&settings("completions_api = \"nope\"")).is_err());
    }
}
