//! Main chat loop orchestration.
//!
//! Resolves the chatbot (argument or picker), optionally resumes a stored
//! session, then reads lines until EOF: slash commands are handled locally,
//! everything else is sent as a streamed turn. Turn failures are printed
//! and the loop keeps going.

use std::io::Write;

use anyhow::{Context, Result};
use console::style;
use crossterm::style::Color;
use dialoguer::Select;
use tracing::{debug, warn};

use botdesk_core::chat::conversation::Conversation;
use botdesk_types::chat::MessageRole;
use botdesk_types::chatbot::{Chatbot, ChatbotId};
use botdesk_types::error::ApiError;

use crate::cli::output;
use crate::cli::session::session_table;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    chatbot_id: Option<ChatbotId>,
    resume_session_id: Option<String>,
) -> Result<()> {
    let mut chatbot = match chatbot_id {
        Some(id) => state.chatbot_service.get(id).await?,
        None => pick_chatbot(state).await?,
    };

    let mut conversation = Conversation::for_chatbot(chatbot.id);
    if let Some(session_id) = resume_session_id.as_deref() {
        let loaded = state
            .chat_service
            .open_session(&mut conversation, chatbot.id, session_id)
            .await
            .with_context(|| format!("Could not resume session {session_id}"))?;
        debug!(session_id, loaded, "resumed session");
    }

    // Prime the feed so /sessions works before the first turn; failure is logged.
    let _ = state.chat_service.refresh_sessions().await;

    let renderer = ChatRenderer::new(Some(Color::Cyan));
    let api_root = state.config.api_root();
    print_welcome_banner(&chatbot, conversation.session_id(), &api_root);
    if resume_session_id.is_some() {
        print_history(&renderer, &conversation, &chatbot.name);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let mut chat_input = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Chat ended.").dim());
                    break;
                }
                ChatCommand::New => {
                    conversation.start_new_session();
                    println!("\n  {} Started a new session.\n", style("*").cyan().bold());
                }
                ChatCommand::History => print_history(&renderer, &conversation, &chatbot.name),
                ChatCommand::Sessions => print_sessions(state, &chatbot, conversation.session_id()),
                ChatCommand::Open(session_id) => {
                    match state
                        .chat_service
                        .open_session(&mut conversation, chatbot.id, &session_id)
                        .await
                    {
                        Ok(loaded) => {
                            println!(
                                "\n  {} Opened session {} ({loaded} messages)",
                                style("*").cyan().bold(),
                                style(&session_id).dim()
                            );
                            print_history(&renderer, &conversation, &chatbot.name);
                        }
                        Err(e) => print_turn_error(&e),
                    }
                }
                ChatCommand::Switch(id) if id == chatbot.id => {
                    println!("\n  {} Already chatting with {}.\n", style("i").blue().bold(), chatbot.name);
                }
                ChatCommand::Switch(id) => match state.chatbot_service.get(id).await {
                    Ok(next) => {
                        conversation.switch_chatbot(next.id);
                        chatbot = next;
                        print_welcome_banner(&chatbot, None, &api_root);
                    }
                    Err(e) => print_turn_error(&e),
                },
                ChatCommand::Usage(usage) => {
                    println!("\n  {} Usage: {}\n", style("?").yellow().bold(), style(usage).cyan());
                }
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                }
            }
            continue;
        }

        send_turn(state, &renderer, &mut conversation, &chatbot.name, &text).await;
    }

    chat_input.flush();
    Ok(())
}

/// Send one message and stream the reply. Errors are printed, not returned.
async fn send_turn(
    state: &AppState,
    renderer: &ChatRenderer,
    conversation: &mut Conversation,
    chatbot_name: &str,
    text: &str,
) {
    let spinner = output::spinner("thinking...", "cyan");
    let mut first_chunk = true;

    let result = state
        .chat_service
        .send(conversation, text, |chunk| {
            if chunk.content.is_empty() {
                return;
            }
            if first_chunk {
                spinner.finish_and_clear();
                first_chunk = false;
                print!("\n  {} ", style(chatbot_name).cyan().bold());
                let _ = std::io::stdout().flush();
            }
            renderer.print_streaming_token(&chunk.content);
        })
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if outcome.reply.is_empty() {
                println!("\n  {} {}", style(chatbot_name).cyan().bold(), style("(no reply)").dim());
            } else {
                println!();
            }
            renderer.print_stats_footer(outcome.chunks, outcome.elapsed, outcome.session_id.as_deref());
            println!();
        }
        Err(e) => {
            if !first_chunk {
                println!();
            }
            warn!(error = %e, "chat turn failed");
            print_turn_error(&e);
            println!("  {}", style("Your message was not kept. Type it again to retry.").dim());
            println!();
        }
    }
}

fn print_turn_error(err: &ApiError) {
    eprintln!("\n  {} {}", style("!").red().bold(), err.user_message());
}

fn print_history(renderer: &ChatRenderer, conversation: &Conversation, chatbot_name: &str) {
    let messages = conversation.messages();
    println!();
    if messages.is_empty() {
        println!("  {}", style("No messages yet.").dim());
        println!();
        return;
    }
    for message in messages {
        match message.role {
            MessageRole::User => {
                println!("  {} {}", style("You").green().bold(), message.content);
            }
            MessageRole::Assistant => {
                println!("  {}", style(chatbot_name).cyan().bold());
                println!("{}", renderer.render_final(&message.content).trim_end());
            }
            MessageRole::System => {
                println!("  {}", style(&message.content).dim());
            }
        }
    }
    println!();
}

/// Print the cached session list for this chatbot. The feed is refreshed
/// after every completed turn, so no request is made here.
fn print_sessions(state: &AppState, chatbot: &Chatbot, current: Option<&str>) {
    let snapshot = state.chat_service.feed().snapshot();
    if !snapshot.loaded {
        println!("\n  {} Session list is not available yet.\n", style("!").yellow().bold());
        return;
    }
    let sessions = snapshot.for_chatbot(chatbot.id);
    if sessions.is_empty() {
        println!("\n  {} No stored sessions for {}.\n", style("i").blue().bold(), chatbot.name);
        return;
    }
    println!();
    println!("{}", session_table(&sessions));
    if let Some(id) = current {
        println!("  {} {}", style("Current:").dim(), style(id).dim());
    }
    println!("  {}", style("Open one with /open <session-id>").dim());
    println!();
}

/// Choose a chatbot when none was given on the command line.
async fn pick_chatbot(state: &AppState) -> Result<Chatbot> {
    let mut chatbots = state.chatbot_service.list().await?;
    match chatbots.len() {
        0 => anyhow::bail!("No chatbots found. Create one with: bdesk create chatbot"),
        1 => Ok(chatbots.remove(0)),
        _ => {
            let labels: Vec<String> = chatbots
                .iter()
                .map(|c| format!("{} (id {})", c.name, c.id))
                .collect();
            let choice = Select::new()
                .with_prompt("Chat with")
                .items(&labels)
                .default(0)
                .interact()?;
            Ok(chatbots.swap_remove(choice))
        }
    }
}
