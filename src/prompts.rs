/// System prompt used when the config does not provide one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful product advisor for L'Oréal.";

/// First line printed when a chat starts.
pub const DEFAULT_GREETING: &str = "👋 Hello! How can I help you today?";

/// Shown when the endpoint answered but carried no usable reply.
pub const NO_REPLY_MESSAGE: &str = "Sorry, I didn't get a reply.";

/// Shown for every failed request, whatever the cause.
pub const ERROR_MESSAGE: &str = "There was an error getting a response. Try again later.";

/// Placeholder printed while a request is in flight.
pub const TYPING_INDICATOR: &str = "…";

/// Label for the user's own bubbles when no name is known.
pub const DEFAULT_USER_LABEL: &str = "You";

/// Label for assistant bubbles.
pub const ASSISTANT_LABEL: &str = "Advisor";

/// Build the system prompt content for an optional user name.
///
/// Always derived from `base`, so calling it again never stacks suffixes.
pub fn system_prompt_for(base: &str, user_name: Option<&str>) -> String {
    match user_name {
        Some(name) => format!("{} The user's name is {}.", base, name),
        None => base.to_string(),
    }
}
