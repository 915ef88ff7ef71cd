//! Line-oriented chat front end

pub mod commands;
pub mod transcript;

pub use commands::{ParsedCommand, SlashCommand, get_help_text, parse_input, parse_slash_command};
pub use transcript::Transcript;

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::Config;
use crate::events::{AppEvent, Role};
use crate::llm::CompletionTransport;
use crate::prompts::{ERROR_MESSAGE, NO_REPLY_MESSAGE};
use crate::session::{ChatSession, TurnOutcome};

/// Whether the loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Drive a session from `input` until EOF or `/bye`, writing the transcript to `output`.
pub async fn run_chat<T, R, W>(
    session: &mut ChatSession<T>,
    config: &Config,
    mut input: R,
    transcript: &mut Transcript<W>,
) -> Result<()>
where
    T: CompletionTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    transcript.bubble(Role::Assistant, session.label_for(Role::Assistant), &config.greeting)?;

    let mut line = String::new();
    loop {
        transcript.prompt(session.label_for(Role::User))?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .await
            .context("Failed to read user input")?;
        if read == 0 {
            break;
        }

        let Some(event) = parse_input(&line) else {
            if line.trim_start().starts_with('/') {
                transcript.notice(&format!("Unknown command: {}. Try /help.", line.trim()))?;
            }
            continue;
        };

        if handle_event(session, config, event, transcript).await? == LoopControl::Exit {
            break;
        }
    }

    transcript.notice("👋 Bye!")?;
    Ok(())
}

/// Apply one event to the session and print whatever it produces
pub async fn handle_event<T, W>(
    session: &mut ChatSession<T>,
    config: &Config,
    event: AppEvent,
    transcript: &mut Transcript<W>,
) -> Result<LoopControl>
where
    T: CompletionTransport,
    W: Write,
{
    match event {
        AppEvent::UserSubmitted { text } => {
            transcript.user_turn(session.label_for(Role::User), &text)?;
            transcript.latest_question(&text)?;
            transcript.typing()?;
            let outcome = session.submit(&text).await;
            transcript.clear_typing()?;
            render_outcome(session, outcome, transcript)?;
        }
        AppEvent::NameSet { name } => {
            session.set_user_name(&name);
            match session.history().user_name() {
                Some(name) => transcript.notice(&format!("Nice to meet you, {}!", name))?,
                None => transcript.notice("Name cleared.")?,
            }
        }
        AppEvent::NameCleared => {
            session.set_user_name("");
            transcript.notice("Name cleared.")?;
        }
        AppEvent::ClearHistory => {
            session.clear_history();
            transcript.notice("Conversation cleared.")?;
        }
        AppEvent::ShowHistory => {
            if session.history().is_empty() {
                transcript.notice("No messages yet.")?;
            }
            for message in session.history().turns() {
                transcript.bubble(message.role, session.label_for(message.role), &message.content)?;
            }
        }
        AppEvent::ShowInfo => {
            let history = session.history();
            transcript.notice(&format!(
                "Session {} started {}\nEndpoint: {}\nTurns: {}/{}\nName: {}\nLast question: {}",
                session.session_id(),
                session.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
                config.endpoint().unwrap_or("(not configured)"),
                history.len(),
                history.max_turns(),
                history.user_name().unwrap_or("(not set)"),
                history
                    .last_of(Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or("(none)"),
            ))?;
        }
        AppEvent::ShowHelp => {
            transcript.notice(&get_help_text())?;
        }
        AppEvent::Exit => return Ok(LoopControl::Exit),
    }

    Ok(LoopControl::Continue)
}

fn render_outcome<T, W>(
    session: &ChatSession<T>,
    outcome: TurnOutcome,
    transcript: &mut Transcript<W>,
) -> Result<()>
where
    T: CompletionTransport,
    W: Write,
{
    let label = session.label_for(Role::Assistant);
    match outcome {
        TurnOutcome::Ignored => Ok(()),
        TurnOutcome::Replied(reply) => transcript.bubble(Role::Assistant, label, &reply),
        TurnOutcome::NoReply => transcript.bubble(Role::Assistant, label, NO_REPLY_MESSAGE),
        TurnOutcome::Failed(_) => transcript.bubble(Role::Assistant, label, ERROR_MESSAGE),
    }
}
