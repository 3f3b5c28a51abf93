//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout of the config dir:
//!   Windows: %APPDATA%\voice-assistant\
//!   macOS:   ~/Library/Application Support/voice-assistant/
//!   Linux:   ~/.config/voice-assistant/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `config.toml` and `system_prompts/`.
    pub config_dir: PathBuf,
    /// Full path to the user's `config.toml` override file.
    pub user_config_file: PathBuf,
    /// Directory searched for custom `<name>.md` system prompts.
    pub prompts_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-assistant";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard config path.
    pub fn new() -> Self {
        Self::under(
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(Self::APP_NAME),
        )
    }

    /// Lays the files out under an explicit config directory.
    pub fn under(config_dir: PathBuf) -> Self {
        let user_config_file = config_dir.join("config.toml");
        let prompts_dir = config_dir.join("system_prompts");

        Self {
            config_dir,
            user_config_file,
            prompts_dir,
        }
    }

    /// Paths for an explicitly chosen settings file; prompts live beside it.
    pub fn for_config_file(path: impl Into<PathBuf>) -> Self {
        let user_config_file = path.into();
        let config_dir = match user_config_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            user_config_file,
            ..Self::under(config_dir)
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .user_config_file
            .file_name()
            .is_some_and(|n| n == "config.toml"));
        assert!(paths.prompts_dir.ends_with("system_prompts"));
    }

    #[test]
    fn under_nests_everything_in_the_given_dir() {
        let paths = AppPaths::under(PathBuf::from("/tmp/va"));
        assert_eq!(paths.user_config_file, PathBuf::from("/tmp/va/config.toml"));
        assert_eq!(paths.prompts_dir, PathBuf::from("/tmp/va/system_prompts"));
    }

    #[test]
    fn explicit_config_file_keeps_its_name_and_gets_sibling_prompts() {
        let paths = AppPaths::for_config_file("/srv/assistant/work.toml");
        assert_eq!(paths.user_config_file, PathBuf::from("/srv/assistant/work.toml"));
        assert_eq!(paths.config_dir, PathBuf::from("/srv/assistant"));
        assert_eq!(paths.prompts_dir, PathBuf::from("/srv/assistant/system_prompts"));

        let bare = AppPaths::for_config_file("work.toml");
        assert_eq!(bare.prompts_dir, PathBuf::from("./system_prompts"));
    }
}
