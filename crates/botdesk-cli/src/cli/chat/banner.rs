//! Welcome banner shown when a chat starts or switches chatbots.

use console::style;

use botdesk_types::chatbot::Chatbot;

/// Session ids are long; the banner shows a prefix.
fn short_session(session_id: &str) -> &str {
    match session_id.char_indices().nth(8) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}

pub fn print_welcome_banner(chatbot: &Chatbot, session_id: Option<&str>, api_root: &str) {
    println!();
    println!(
        "  {} {}",
        style("*").cyan(),
        style(&chatbot.name).cyan().bold()
    );
    println!("  {}", style(format!("chatbot {} · {}", chatbot.id, chatbot.status())).dim());
    println!();
    println!("  {}      {}", style("API:").bold(), style(api_root).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_id.map(short_session).unwrap_or("new")).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
