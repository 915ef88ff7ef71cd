//! Bounded conversation history

use crate::events::{ChatMessage, Role};
use crate::prompts;
use std::collections::VecDeque;

/// Number of non-system turns kept when no limit is configured.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Owns the ordered conversation: one system message followed by at most
/// `max_turns` user/assistant turns, oldest evicted first.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    base_prompt: String,
    system: ChatMessage,
    turns: VecDeque<ChatMessage>,
    max_turns: usize,
    user_name: Option<String>,
}

impl HistoryManager {
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        let base_prompt = system_prompt.into();
        Self {
            system: ChatMessage::system(base_prompt.clone()),
            base_prompt,
            turns: VecDeque::with_capacity(max_turns.min(64) + 1),
            max_turns,
            user_name: None,
        }
    }

    pub fn with_default_limit(system_prompt: impl Into<String>) -> Self {
        Self::new(system_prompt, DEFAULT_MAX_TURNS)
    }

    /// Append a user turn
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::user(text));
    }

    /// Append an assistant turn
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::assistant(text));
    }

    fn push(&mut self, message: ChatMessage) {
        self.turns.push_back(message);

        while self.turns.len() > self.max_turns {
            if let Some(evicted) = self.turns.pop_front() {
                tracing::debug!(role = %evicted.role, "evicted oldest turn");
            }
        }
    }

    /// Store or clear the user's name and rewrite the system message to match.
    ///
    /// A blank name clears it. The system content is rebuilt from the base
    /// prompt each time.
    pub fn set_user_name(&mut self, name: &str) {
        let name = name.trim();
        self.user_name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        self.system.content = prompts::system_prompt_for(&self.base_prompt, self.user_name.as_deref());
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    pub fn system_message(&self) -> &ChatMessage {
        &self.system
    }

    /// Ordered copy of the full conversation for transmission.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(self.system.clone());
        messages.extend(self.turns.iter().cloned());
        messages
    }

    /// Retained non-system turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }

    /// Number of retained non-system turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Most recent retained turn with the given role
    pub fn last_of(&self, role: Role) -> Option<&ChatMessage> {
        self.turns.iter().rev().find(|m| m.role == role)
    }

    /// Drop every non-system turn. The system message and name are kept.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_after_first_user_turn() {
        let mut history = HistoryManager::with_default_limit("sys");
        history.append_user("hi");

        assert_eq!(
            history.snapshot(),
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")]
        );
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let max = DEFAULT_MAX_TURNS;
        let mut history = HistoryManager::new("sys", max);
        let mut appended = Vec::new();

        for i in 0..max + 5 {
            let text = format!("turn {i}");
            if i % 2 == 0 {
                history.append_user(text.clone());
                appended.push(ChatMessage::user(text));
            } else {
                history.append_assistant(text.clone());
                appended.push(ChatMessage::assistant(text));
            }

            assert!(history.len() <= max);
            let expected_start = appended.len().saturating_sub(max);
            let retained: Vec<ChatMessage> = history.turns().cloned().collect();
            assert_eq!(retained, appended[expected_start..].to_vec());

            let snapshot = history.snapshot();
            assert_eq!(snapshot[0], ChatMessage::system("sys"));
            assert_eq!(
                snapshot.iter().filter(|m| m.role == Role::System).count(),
                1
            );
        }
    }

    #[test]
    fn test_small_limit_evicts_fifo() {
        let mut history = HistoryManager::new("sys", 2);
        history.append_user("a");
        history.append_assistant("b");
        history.append_user("c");

        let contents: Vec<&str> = history.turns().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[test]
    fn test_set_then_clear_name_restores_base_prompt() {
        let mut history = HistoryManager::with_default_limit("You are helpful.");
        history.set_user_name("Ada");
        assert_eq!(
            history.system_message().content,
            "You are helpful. The user's name is Ada."
        );
        assert_eq!(history.user_name(), Some("Ada"));

        history.set_user_name("");
        assert_eq!(history.system_message().content, "You are helpful.");
        assert_eq!(history.user_name(), None);
    }

    #[test]
    fn test_repeated_names_do_not_accumulate() {
        let mut history = HistoryManager::with_default_limit("sys");
        history.set_user_name("Ada");
        history.set_user_name("Grace");
        history.set_user_name("  Grace  ");

        assert_eq!(
            history.system_message().content,
            "sys The user's name is Grace."
        );
    }

    #[test]
    fn test_name_change_keeps_system_at_front() {
        let mut history = HistoryManager::new("sys", 3);
        history.append_user("one");
        history.set_user_name("Ada");
        history.append_assistant("two");

        let snapshot = history.snapshot();
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[0].content, "sys The user's name is Ada.");
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_empty_content_is_accepted() {
        let mut history = HistoryManager::with_default_limit("sys");
        history.append_user("");
        assert_eq!(history.len(), 1);
        assert_eq!(history.last_of(Role::User), Some(&ChatMessage::user("")));
    }

    #[test]
    fn test_clear_keeps_system_and_name() {
        let mut history = HistoryManager::with_default_limit("sys");
        history.set_user_name("Ada");
        history.append_user("hello");
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.snapshot().len(), 1);
        assert_eq!(history.user_name(), Some("Ada"));
    }
}
