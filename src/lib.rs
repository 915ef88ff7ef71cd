//! Terminal chat client that relays a bounded conversation to a hosted
//! completion worker.
//!
//! [`history::HistoryManager`] owns the conversation, [`llm::LlmClient`]
//! carries it to the worker, and [`session::ChatSession`] ties the two
//! together for one run of the program.

pub mod commands;
pub mod config;
pub mod events;
pub mod history;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod session;

pub use config::Config;
pub use events::{AppEvent, ChatMessage, Role, TurnState};
pub use history::HistoryManager;
pub use llm::{ChatError, Completion, CompletionTransport, LlmClient};
pub use session::{ChatSession, TurnOutcome};
