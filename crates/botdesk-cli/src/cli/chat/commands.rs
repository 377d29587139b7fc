//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the session: help, history, opening
//! stored sessions, and switching chatbots.

use console::style;

use botdesk_types::chatbot::ChatbotId;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Start a new session with the same chatbot.
    New,
    /// Show the messages of the current conversation.
    History,
    /// List stored sessions of the current chatbot.
    Sessions,
    /// Load a stored session by id.
    Open(String),
    /// Switch to another chatbot.
    Switch(ChatbotId),
    /// Known command used wrong; carries the usage line.
    Usage(&'static str),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/history" => ChatCommand::History,
        "/sessions" | "/ls" => ChatCommand::Sessions,
        "/open" | "/resume" => {
            if arg.is_empty() {
                ChatCommand::Usage("/open <session-id>")
            } else {
                ChatCommand::Open(arg.to_string())
            }
        }
        "/switch" => match arg.parse::<ChatbotId>() {
            Ok(id) => ChatCommand::Switch(id),
            Err(_) => ChatCommand::Usage("/switch <numeric-chatbot-id>"),
        },
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
        ("/new", "Start a new session with this chatbot"),
        ("/history", "Show this conversation so far"),
        ("/sessions", "List stored sessions of this chatbot"),
        ("/open <id>", "Load a stored session"),
        ("/switch <id>", "Chat with another chatbot"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, help) in rows {
        println!("  {:<14}{}", style(cmd).cyan(), help);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit, Ctrl+C clears the line").dim());
    println!();
}
