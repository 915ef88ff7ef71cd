use std::str::FromStr;

use crate::events::AppEvent;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a line with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Set or clear your display name
    Name,
    /// Show the retained conversation
    History,
    /// Forget the conversation so far
    Clear,
    /// Show session details
    Info,
    /// Show help
    Help,
    /// Exit the application
    Bye,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The event this command triggers
    pub fn into_event(self) -> AppEvent {
        match self.command {
            SlashCommand::Name => match self.argument {
                Some(name) => AppEvent::NameSet { name },
                None => AppEvent::NameCleared,
            },
            SlashCommand::History => AppEvent::ShowHistory,
            SlashCommand::Clear => AppEvent::ClearHistory,
            SlashCommand::Info => AppEvent::ShowInfo,
            SlashCommand::Help => AppEvent::ShowHelp,
            SlashCommand::Bye => AppEvent::Exit,
        }
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Name => "set your name (/name Ada) or clear it (/name)",
            SlashCommand::History => "show the conversation the advisor currently sees",
            SlashCommand::Clear => "forget the conversation so far",
            SlashCommand::Info => "show session details",
            SlashCommand::Help => "show available commands",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let tail: Vec<&str> = parts.collect();

    let command = SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "n" => Some(SlashCommand::Name),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })?;

    let argument = if tail.is_empty() {
        None
    } else {
        Some(tail.join(" "))
    };

    Some(ParsedCommand { command, argument })
}

/// Turn a line of input into an event: a slash command, or chat text.
/// Returns `None` for blank lines and unknown commands.
pub fn parse_input(input: &str) -> Option<AppEvent> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        return parse_slash_command(trimmed).map(ParsedCommand::into_event);
    }
    Some(AppEvent::UserSubmitted {
        text: trimmed.to_string(),
    })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Available commands:\n\n");
    for command in SlashCommand::iter() {
        help.push_str(&format!("/{} - {}\n", command.command(), command.description()));
    }
    help.push_str("\nAliases: /q, /quit and /exit for /bye; /n for /name; /h and /? for /help.");
    help
}
