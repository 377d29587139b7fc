//! botdesk console entry point.
//!
//! Binary name: `bdesk`
//!
//! Parses CLI arguments, sets up tracing, wires services, then dispatches
//! to the command handler. A failed command prints one styled line and
//! exits with status 1.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use botdesk_types::error::ApiError;

use cli::{Cli, Commands, CreateResource, DeleteResource, ListResource, RenameResource};
use state::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = botdesk_observe::verbosity_filter(cli.quiet, cli.verbose);
    if let Err(e) = botdesk_observe::init_tracing(filter, cli.trace_export) {
        eprintln!("Warning: tracing setup failed: {e}");
    }

    let result = run(cli).await;
    botdesk_observe::shutdown_tracing();

    if let Err(err) = result {
        tracing::debug!(error = ?err, "command failed");
        cli::output::failure(error_line(&err));
        std::process::exit(1);
    }
}

/// The line shown for a failed command: the API error's user-facing
/// message when there is one, otherwise the full context chain.
fn error_line(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.user_message(),
        None => format!("{err:#}"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "bdesk", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Login { email, password } => cli::auth::login(&state, email, password, json).await?,
        Commands::Logout => cli::auth::logout(&state, json).await?,
        Commands::Whoami => cli::auth::whoami(&state, json).await?,

        Commands::Create { resource } => match resource {
            CreateResource::Chatbot { name } => cli::chatbot::create_chatbot(&state, name, json).await?,
        },

        Commands::List { resource } => match resource {
            ListResource::Chatbots { page, all } => {
                cli::chatbot::list_chatbots(&state, page, all, json).await?;
            }
        },

        Commands::Show { id } => cli::chatbot::show_chatbot(&state, id, json).await?,

        Commands::Rename { resource } => match resource {
            RenameResource::Chatbot { id, name } => {
                cli::chatbot::rename_chatbot(&state, id, &name, json).await?;
            }
        },

        Commands::Delete { resource } => match resource {
            DeleteResource::Chatbot { id, force } => {
                cli::chatbot::delete_chatbot(&state, id, force, json).await?;
            }
        },

        Commands::Knowledge { action } => {
            cli::knowledge::handle_knowledge_command(action, &state, json).await?;
        }

        Commands::Sessions { chatbot } => cli::session::list_sessions(&state, chatbot, json).await?,

        Commands::Transcript { chatbot_id, session_id } => {
            cli::session::show_transcript(&state, chatbot_id, &session_id, json).await?;
        }

        Commands::Embed { action } => cli::embed::handle_embed_command(action, &state, json).await?,

        Commands::Chat { id, resume } => cli::chat::loop_runner::run_chat_loop(&state, id, resume).await?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_line_prefers_api_message() {
        let err: anyhow::Result<()> = Err(ApiError::Server {
            status: 404,
            detail: Some("Chatbot not found".to_string()),
        })
        .context("Could not resume session s-1");
        assert_eq!(error_line(&err.unwrap_err()), "Chatbot not found");
    }

    #[test]
    fn test_error_line_network() {
        let err = anyhow::Error::from(ApiError::Network("connection refused".to_string()));
        assert_eq!(error_line(&err), "Network error or server not reachable");
    }

    #[test]
    fn test_error_line_plain_error_keeps_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(error_line(&err), "outer: inner");
    }
}
