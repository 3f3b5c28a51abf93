//! Conversation memory bounded by a token budget.
//!
//! [`ConversationHistory`] keeps the system prompt plus the running
//! user/assistant exchange.  When the estimated token count exceeds the
//! budget (`max_tokens` setting) the oldest turns are dropped; the system
//! prompt and the newest turn are always kept.

use std::collections::VecDeque;

use crate::config::AssistantSettings;
use crate::llm::client::{CompletionRequest, Message};

/// Rough chars-per-token ratio used for budgeting.
const CHARS_PER_TOKEN: usize = 4;

/// Estimated token count of `text` (chars / 4, rounded up).
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Rolling chat history.
///
/// # Example
/// ```rust
/// use voice_assistant::llm::ConversationHistory;
///
/// let mut history = ConversationHistory::new(8000)
///     .with_system_prompt(Some("Be brief.".into()));
/// history.push_user("What time is it in Tokyo?");
/// assert_eq!(history.messages().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    system: Option<Message>,
    turns: VecDeque<Message>,
    max_tokens: usize,
}

impl ConversationHistory {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            system: None,
            turns: VecDeque::new(),
            max_tokens,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system = prompt.map(Message::system);
        self
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    /// Appends a turn, then drops the oldest turns while over budget.
    pub fn push(&mut self, message: Message) {
        self.turns.push_back(message);

        while self.estimated_tokens() > self.max_tokens && self.turns.len() > 1 {
            if let Some(dropped) = self.turns.pop_front() {
                log::debug!(
                    "history over budget; dropped a {:?} turn (~{} tokens)",
                    dropped.role,
                    estimate_tokens(&dropped.content)
                );
            }
        }
    }

    /// Forgets every turn; the system prompt stays.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// System prompt first, then turns oldest to newest.
    pub fn messages(&self) -> Vec<Message> {
        self.system
            .iter()
            .chain(self.turns.iter())
            .cloned()
            .collect()
    }

    pub fn estimated_tokens(&self) -> usize {
        self.system
            .iter()
            .chain(self.turns.iter())
            .map(|m| estimate_tokens(&m.content))
            .sum()
    }

    /// Request carrying the whole history with the configured model.
    pub fn to_request(&self, settings: &AssistantSettings) -> CompletionRequest {
        CompletionRequest::from_settings(settings, self.messages())
    }

    /// Number of user/assistant turns held.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::Role;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn system_prompt_comes_first() {
        let mut history = ConversationHistory::new(100).with_system_prompt(Some("sys".into()));
        history.push_user("q");
        history.push_assistant("a");

        let roles: Vec<_> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn oldest_turns_are_dropped_over_budget() {
        // Each 8-char turn is 2 tokens; budget 5 fits two turns.
        let mut history = ConversationHistory::new(5);
        for i in 0..4 {
            history.push_user(format!("turn{i:04}"));
        }

        let contents: Vec<_> = history.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["turn0002", "turn0003"]);
        assert!(history.estimated_tokens() <= 5);
    }

    #[test]
    fn newest_turn_survives_even_when_alone_over_budget() {
        let mut history = ConversationHistory::new(1).with_system_prompt(Some("system".into()));
        history.push_user("a very long question indeed");

        assert_eq!(history.len(), 1);
        assert_eq!(history.messages().len(), 2);
    }

    #[test]
    fn clear_keeps_system_prompt() {
        let mut history = ConversationHistory::new(100).with_system_prompt(Some("sys".into()));
        history.push_user("q");
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.messages(), vec![Message::system("sys")]);
    }
}
