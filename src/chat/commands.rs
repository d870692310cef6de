//! Command parsing for the chat application.
//!
//! A handful of reserved words control the session; every other line is a
//! message for the model.  Reserved words are matched case-insensitively
//! against the whole (trimmed) line, so "exit" is a command while
//! "how do I exit vim" is a message.  Messages keep their whitespace apart
//! from the line terminator.

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Save the transcript and exit.
    Exit,

    /// Save the transcript and keep chatting.
    Save,

    /// Forget the conversation and start a fresh session.
    Clear,

    /// Print the models available to this API key.
    ListModels,

    /// Anything else: text to send to the model.
    Message(String),
}

/// Parses one line of user input.
///
/// Returns `None` for blank input, which is neither a command nor worth
/// sending to the API.
///
/// # Examples
///
/// ```
/// # use gemini_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("EXIT"), Some(ChatCommand::Exit));
/// assert_eq!(parse_command("List Models"), Some(ChatCommand::ListModels));
/// assert_eq!(
///     parse_command("exit please"),
///     Some(ChatCommand::Message("exit please".to_string()))
/// );
/// assert_eq!(parse_command("   "), None);
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let command = match trimmed.to_lowercase().as_str() {
        "exit" => ChatCommand::Exit,
        "save" => ChatCommand::Save,
        "clear" => ChatCommand::Clear,
        "list models" => ChatCommand::ListModels,
        _ => ChatCommand::Message(input.trim_end_matches(['\r', '\n']).to_string()),
    };
    Some(command)
}

/// Returns the one-line reminder shown in the banner.
pub fn help_text() -> &'static str {
    "Type 'exit' to quit, 'save' to save the conversation, 'clear' to start fresh, or 'list models' to see available models"
}
