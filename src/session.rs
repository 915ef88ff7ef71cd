use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::events::{Role, TurnState};
use crate::history::HistoryManager;
use crate::llm::{ChatError, Completion, CompletionTransport};
use crate::prompts::{ASSISTANT_LABEL, DEFAULT_USER_LABEL};

/// How a submitted line ended
#[derive(Debug)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent
    Ignored,
    /// The assistant replied and the reply was recorded
    Replied(String),
    /// The endpoint answered without content; nothing was recorded
    NoReply,
    /// The request failed; nothing was recorded beyond the user turn
    Failed(ChatError),
}

/// One chat session: the conversation, the transport it talks through,
/// and the per-turn request state.
pub struct ChatSession<T> {
    session_id: String,
    started_at: DateTime<Utc>,
    history: HistoryManager,
    transport: T,
    state: TurnState,
    last_terminal: Option<TurnState>,
}

impl<T: CompletionTransport> ChatSession<T> {
    pub fn new(history: HistoryManager, transport: T) -> Self {
        let session_id = Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, max_turns = history.max_turns(), "chat session started");

        Self {
            session_id,
            started_at: Utc::now(),
            history,
            transport,
            state: TurnState::Idle,
            last_terminal: None,
        }
    }

    /// Build a session from config: prompt, history limit and initial name
    pub fn from_config(config: &Config, transport: T) -> Self {
        let mut history = HistoryManager::new(config.system_prompt.clone(), config.max_history);
        if let Some(name) = config.user_name.as_deref() {
            history.set_user_name(name);
        }
        Self::new(history, transport)
    }

    /// Send one line of user text and record the exchange.
    ///
    /// Failures are caught here and returned as `TurnOutcome::Failed`.
    pub async fn submit(&mut self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() || !self.state.accepts_input() {
            return TurnOutcome::Ignored;
        }

        self.history.append_user(text);
        self.state = TurnState::Sending;

        let snapshot = self.history.snapshot();
        let result = self.transport.complete(&snapshot).await;

        let outcome = match result {
            Ok(Completion::Reply(reply)) => {
                self.history.append_assistant(reply.clone());
                self.finish(TurnState::Succeeded);
                TurnOutcome::Replied(reply)
            }
            Ok(Completion::NoReply) => {
                tracing::warn!(session_id = %self.session_id, "endpoint returned no reply");
                self.finish(TurnState::Succeeded);
                TurnOutcome::NoReply
            }
            Err(e) => {
                tracing::error!(session_id = %self.session_id, "completion failed: {}", e);
                self.finish(TurnState::Failed);
                TurnOutcome::Failed(e)
            }
        };

        self.state = TurnState::Idle;
        outcome
    }

    fn finish(&mut self, terminal: TurnState) {
        debug_assert!(terminal.is_terminal());
        self.state = terminal;
        self.last_terminal = Some(terminal);
    }

    /// Set the user's name; blank clears it
    pub fn set_user_name(&mut self, name: &str) {
        self.history.set_user_name(name);
        match self.history.user_name() {
            Some(name) => tracing::info!(name, "user name set"),
            None => tracing::info!("user name cleared"),
        }
    }

    /// Drop the retained turns
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Label shown on a bubble for the given role
    pub fn label_for(&self, role: Role) -> &str {
        match role {
            Role::User => self.history.user_name().unwrap_or(DEFAULT_USER_LABEL),
            Role::Assistant => ASSISTANT_LABEL,
            Role::System => "System",
        }
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Terminal state of the most recent turn, if any
    pub fn last_terminal(&self) -> Option<TurnState> {
        self.last_terminal
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}
