//! Session browsing: list sessions and print a transcript.

use std::fmt::Write as _;

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{style, Term};

use botdesk_types::chat::{HistoryEntry, MessageRole, SessionSummary};
use botdesk_types::chatbot::ChatbotId;

use crate::cli::chat::renderer::ChatRenderer;
use crate::cli::output;
use crate::state::AppState;

/// List sessions, newest activity first, optionally for one chatbot.
pub async fn list_sessions(state: &AppState, chatbot: Option<ChatbotId>, json: bool) -> Result<()> {
    let snapshot = state.chat_service.refresh_sessions().await?;
    let mut sessions: Vec<&SessionSummary> = match chatbot {
        Some(id) => snapshot.for_chatbot(id),
        None => snapshot.sessions.iter().collect(),
    };
    sessions.sort_by_key(|s| std::cmp::Reverse(s.last_activity()));

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        output::info(format!(
            "No sessions yet. Start one with: {}",
            style("bdesk chat").yellow()
        ));
        println!();
        return Ok(());
    }

    println!();
    println!("{}", session_table(&sessions));
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Build the session table. Shared with the chat loop's `/sessions`.
pub fn session_table(sessions: &[&SessionSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Chatbot").fg(Color::White),
        Cell::new("First Message").fg(Color::White),
        Cell::new("Last Active").fg(Color::White),
    ]);

    for session in sessions {
        table.add_row(vec![
            Cell::new(&session.id).fg(Color::White),
            Cell::new(format!("{} ({})", session.chatbot_name, session.chatbot_id)).fg(Color::Cyan),
            Cell::new(output::truncate(session.title(), 50)),
            Cell::new(output::format_timestamp(session.last_activity())).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Print one session's messages as Markdown (rendered on a terminal,
/// raw when piped) or JSON.
pub async fn show_transcript(
    state: &AppState,
    chatbot_id: ChatbotId,
    session_id: &str,
    json: bool,
) -> Result<()> {
    let transcript = state.chat_service.transcript(chatbot_id, session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
        return Ok(());
    }

    let markdown = transcript_markdown(chatbot_id, session_id.trim(), &transcript.messages);
    if Term::stdout().is_term() {
        println!("{}", ChatRenderer::new(None).render_final(&markdown));
    } else {
        print!("{markdown}");
    }

    Ok(())
}

pub fn transcript_markdown(chatbot_id: ChatbotId, session_id: &str, entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Session {session_id}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Chatbot {chatbot_id}, {} messages", entries.len());

    for entry in entries {
        let speaker = match entry.role {
            MessageRole::User => "You",
            MessageRole::Assistant => "Bot",
            MessageRole::System => "System",
        };
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "## {speaker} · {}",
            output::format_timestamp(entry.created_at)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", entry.message.trim_end());
    }

    out
}
