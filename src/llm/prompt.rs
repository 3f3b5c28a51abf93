//! System prompt selection.
//!
//! `active_prompt` names the prompt:
//! * `default_prompt`: concise assistant that may write to the clipboard by
//!   wrapping text in the configured start/end markers.
//! * `chat_prompt`: friendly conversation, no clipboard support.
//! * anything else: `<prompts dir>/<name>.md` on disk.
//! * none (`{}`): no system prompt at all.
//!
//! `{start_seq}` and `{end_seq}` placeholders are substituted in every
//! prompt, built-in or custom.

use std::path::{Path, PathBuf};

use crate::config::{AppPaths, AssistantSettings, ConfigError};

const DEFAULT_PROMPT: &str = "\
You are a voice assistant. The user speaks to you and your reply is read \
aloud, so answer briefly and plainly, without markdown or lists unless asked.

When the user asks you to write, draft or copy something for them, put that \
text between {start_seq} and {end_seq}. Everything between the markers is \
copied to the user's clipboard and is not read aloud. Use the markers at most \
once per reply and only when asked.";

const CHAT_PROMPT: &str = "\
You are a friendly conversational partner. The user talks to you by voice \
and your replies are read aloud, so keep them short, natural and \
conversational.";

/// Resolves prompt names to prompt text.
#[derive(Debug, Clone)]
pub struct SystemPrompts {
    dir: PathBuf,
    start_seq: String,
    end_seq: String,
}

impl SystemPrompts {
    pub fn new(
        dir: impl Into<PathBuf>,
        start_seq: impl Into<String>,
        end_seq: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            start_seq: start_seq.into(),
            end_seq: end_seq.into(),
        }
    }

    pub fn from_settings(settings: &AssistantSettings, paths: &AppPaths) -> Self {
        Self::new(
            paths.prompts_dir.clone(),
            settings.start_seq.clone(),
            settings.end_seq.clone(),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Text of the prompt called `name`, or `None` when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<Option<String>, ConfigError> {
        let Some(name) = name else {
            return Ok(None);
        };

        let template = match name {
            "default_prompt" => DEFAULT_PROMPT.to_string(),
            "chat_prompt" => CHAT_PROMPT.to_string(),
            custom => {
                let path = self.dir.join(format!("{custom}.md"));
                match std::fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(ConfigError::PromptNotFound {
                            name: custom.to_string(),
                            path,
                        });
                    }
                    Err(source) => return Err(ConfigError::Io { path, source }),
                }
            }
        };

        Ok(Some(self.fill(&template)))
    }

    fn fill(&self, template: &str) -> String {
        template
            .replace("{start_seq}", &self.start_seq)
            .replace("{end_seq}", &self.end_seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn prompts(dir: &Path) -> SystemPrompts {
        SystemPrompts::new(dir, "[CLIPSTART]", "[CLIPEND]")
    }

    #[test]
    fn none_means_no_system_prompt() {
        assert_eq!(prompts(Path::new(".")).resolve(None).unwrap(), None);
    }

    #[test]
    fn default_prompt_mentions_configured_markers() {
        let text = prompts(Path::new("."))
            .resolve(Some("default_prompt"))
            .unwrap()
            .unwrap();
        assert!(text.contains("[CLIPSTART]"));
        assert!(text.contains("[CLIPEND]"));
        assert!(!text.contains("{start_seq}"));
    }

    #[test]
    fn chat_prompt_is_built_in() {
        let text = prompts(Path::new(".")).resolve(Some("chat_prompt")).unwrap();
        assert!(text.is_some_and(|t| t.contains("conversational")));
    }

    #[test]
    fn custom_prompt_is_read_from_disk() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("pirate.md"),
            "Talk like a pirate. Clip with {start_seq}…{end_seq}.",
        )
        .unwrap();

        let text = prompts(dir.path()).resolve(Some("pirate")).unwrap().unwrap();
        assert_eq!(text, "Talk like a pirate. Clip with [CLIPSTART]…[CLIPEND].");
    }

    #[test]
    fn missing_custom_prompt_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let err = prompts(dir.path()).resolve(Some("ghost")).unwrap_err();
        assert!(matches!(err, ConfigError::PromptNotFound { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn unreadable_custom_prompt_keeps_the_io_cause() {
        let dir = tempdir().expect("temp dir");
        std::fs::create_dir(dir.path().join("folder.md")).unwrap();
        std::fs::write(dir.path().join("latin1.md"), [0x63, 0x61, 0x66, 0xe9]).unwrap();

        for name in ["folder", "latin1"] {
            let err = prompts(dir.path()).resolve(Some(name)).unwrap_err();
            match err {
                ConfigError::Io { path, .. } => assert_eq!(path, dir.path().join(format!("{name}.md"))),
                other => panic!("expected Io for {name}, got {other:?}"),
            }
        }
    }
}
