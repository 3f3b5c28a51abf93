//! Application entry point: voice assistant completion CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`ResolvedConfig`] once (defaults + optional user file) and print
//!    the missing-key advisory.
//! 3. Optionally rebuild the user file and exit; otherwise build the typed
//!    settings view.
//! 4. Resolve the system prompt and seed the conversation.
//! 5. Build the completion client from `completions_api`.
//! 6. Stream the reply to stdout and hand any clipboard section to the OS
//!    clipboard.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use voice_assistant::{
    clipboard,
    config::{AppPaths, AssistantSettings, ResolvedConfig},
    llm::{build_client, ConversationHistory, SystemPrompts},
    logging,
};

#[derive(Debug, Parser)]
#[command(name = "voice-assistant", version, about = "Send a prompt to the configured completion backend")]
struct Cli {
    /// Settings file to use instead of the platform config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a complete settings file (defaults plus your values) and exit.
    #[arg(long)]
    rebuild_config: bool,

    /// Prompt text; read from stdin when omitted.
    prompt: Vec<String>,
}

fn read_prompt(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut prompt = String::new();
    std::io::stdin()
        .read_to_string(&mut prompt)
        .context("failed to read prompt from stdin")?;
    Ok(prompt.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    logging::init_logging();
    let cli = Cli::parse();

    // 2. Configuration (the only load in the process)
    let paths = match &cli.config {
        Some(path) => AppPaths::for_config_file(path),
        None => AppPaths::new(),
    };
    let config_path = &paths.user_config_file;
    let config = ResolvedConfig::load_from(config_path).context("failed to load settings")?;

    // 3. Rebuild (untyped, ahead of the typed view)
    if cli.rebuild_config {
        config.rebuild_user_file(config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let settings = AssistantSettings::from_config(&config).context("invalid settings")?;
    logging::set_verbose(settings.verbose);

    // 4. Prompt + history
    let mut prompt = read_prompt(&cli.prompt)?;
    anyhow::ensure!(!prompt.is_empty(), "no prompt given");

    if settings.always_include_clipboard {
        match clipboard::read_clipboard() {
            Ok(Some(text)) if !text.trim().is_empty() => {
                prompt = format!("{prompt}\n\nClipboard content:\n{text}");
            }
            Ok(_) => {}
            Err(e) => log::warn!("Clipboard not included: {e}"),
        }
    }

    let prompts = SystemPrompts::from_settings(&settings, &paths);
    let system_prompt = prompts.resolve(settings.active_prompt.as_deref())?;
    let mut history = ConversationHistory::new(settings.max_tokens).with_system_prompt(system_prompt);
    history.push_user(prompt);

    // 5. Client
    let client = build_client(&settings)?;

    // 6. Reply
    let mut reply = String::new();
    let mut chunks = client.stream_completion(history.to_request(&settings));
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        reply.push_str(&chunk);
    }

    println!(
        "{}",
        clipboard::without_clip(&reply, &settings.start_seq, &settings.end_seq)
    );

    if let Some(clip) = clipboard::extract_clip(&reply, &settings.start_seq, &settings.end_seq) {
        match clipboard::set_clipboard(clip) {
            Ok(()) => log::info!("Copied {} chars to the clipboard", clip.chars().count()),
            Err(e) => {
                log::warn!("{e}");
                println!("\n{clip}");
            }
        }
    }

    Ok(())
}
