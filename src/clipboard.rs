//! Clipboard hand-off for replies, backed by the `arboard` crate.
//!
//! The model marks text meant for the clipboard with the `start_seq` /
//! `end_seq` settings.  [`extract_clip`] finds that section, [`without_clip`]
//! gives the remainder (what gets spoken), and [`set_clipboard`] /
//! [`read_clipboard`] talk to the OS clipboard.
//!
//! Every call opens a short-lived [`arboard::Clipboard`]; the handle is not
//! `Send` on all platforms.

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("cannot access clipboard: {0}")]
    Access(String),

    #[error("cannot set clipboard text: {0}")]
    Set(String),
}

/// Text between the first `start_seq` and the next `end_seq`, trimmed.
///
/// Returns `None` when either marker is missing or the section is blank.
///
/// ```
/// use voice_assistant::clipboard::extract_clip;
///
/// let reply = "Done. [CLIPSTART]Dear Sam,\nThanks![CLIPEND] Anything else?";
/// assert_eq!(extract_clip(reply, "[CLIPSTART]", "[CLIPEND]"), Some("Dear Sam,\nThanks!"));
/// assert_eq!(extract_clip("no markers", "[CLIPSTART]", "[CLIPEND]"), None);
/// ```
pub fn extract_clip<'a>(reply: &'a str, start_seq: &str, end_seq: &str) -> Option<&'a str> {
    let (start, end) = clip_span(reply, start_seq, end_seq)?;
    let clip = reply[start + start_seq.len()..end].trim();
    (!clip.is_empty()).then_some(clip)
}

/// `reply` with the marked clipboard section (markers included) removed.
pub fn without_clip(reply: &str, start_seq: &str, end_seq: &str) -> String {
    match clip_span(reply, start_seq, end_seq) {
        Some((start, end)) => {
            let before = reply[..start].trim_end();
            let after = reply[end + end_seq.len()..].trim_start();
            match (before.is_empty(), after.is_empty()) {
                (true, _) => after.to_string(),
                (_, true) => before.to_string(),
                _ => format!("{before} {after}"),
            }
        }
        None => reply.trim().to_string(),
    }
}

/// Byte offsets of `start_seq` and of the first `end_seq` after it.
fn clip_span(reply: &str, start_seq: &str, end_seq: &str) -> Option<(usize, usize)> {
    if start_seq.is_empty() || end_seq.is_empty() {
        return None;
    }
    let start = reply.find(start_seq)?;
    let body_start = start + start_seq.len();
    let end = body_start + reply[body_start..].find(end_seq)?;
    Some((start, end))
}

/// Current clipboard text; `Ok(None)` when empty or not text.
pub fn read_clipboard() -> Result<Option<String>, ClipboardError> {
    let mut clipboard = open_clipboard()?;
    Ok(clipboard.get_text().ok())
}

/// Replaces the clipboard contents with `text`.
pub fn set_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Set(e.to_string()))
}

fn open_clipboard() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))
}
