use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Internal application events for coordinating between the input loop and the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The user submitted a line of chat text
    UserSubmitted { text: String },

    /// The user set their display name
    NameSet { name: String },

    /// The user cleared their display name
    NameCleared,

    /// Drop all retained turns, keeping the system prompt
    ClearHistory,

    /// Print the retained turns
    ShowHistory,

    /// Print session details
    ShowInfo,

    /// Print the command list
    ShowHelp,

    /// Request to exit the application
    Exit,
}

/// Role of a message in the conversation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message, in the shape the completion endpoint expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Per-turn request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnState {
    /// Ready to accept a submission
    Idle,
    /// A request is in flight; input is suspended
    Sending,
    /// The endpoint answered (with or without a usable reply)
    Succeeded,
    /// The request failed
    Failed,
}

impl TurnState {
    /// Whether new input may be submitted in this state
    pub fn accepts_input(&self) -> bool {
        !matches!(self, TurnState::Sending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Succeeded | TurnState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hello"}));
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
    }

    #[test]
    fn test_turn_state_input_gate() {
        assert!(TurnState::Idle.accepts_input());
        assert!(!TurnState::Sending.accepts_input());
        assert!(TurnState::Failed.is_terminal());
        assert!(!TurnState::Idle.is_terminal());
    }
}
