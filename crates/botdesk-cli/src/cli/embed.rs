//! Embed access key subcommands.

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use console::style;

use botdesk_types::chatbot::ChatbotId;

use crate::cli::output;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum EmbedCommand {
    /// Issue an access key and print the embed snippet.
    Issue {
        /// Chatbot id.
        id: ChatbotId,

        /// Days until the key expires (platform default if omitted).
        #[arg(long)]
        expires_in_days: Option<u32>,
    },

    /// Deactivate an access key.
    Revoke {
        /// The access key to deactivate.
        key: String,
    },
}

pub async fn handle_embed_command(cmd: EmbedCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        EmbedCommand::Issue { id, expires_in_days } => issue(state, id, expires_in_days, json).await,
        EmbedCommand::Revoke { key } => revoke(state, &key, json).await,
    }
}

async fn issue(state: &AppState, id: ChatbotId, expires_in_days: Option<u32>, json: bool) -> Result<()> {
    let key = state.embed_service.issue(id, expires_in_days).await?;
    let snippet = state.embed_service.snippet(&key);

    if json {
        let mut out = serde_json::to_value(&key)?;
        out["snippet"] = serde_json::Value::String(snippet);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    output::success(format!("Access key issued for chatbot {}", style(id).cyan()));
    println!();
    println!("  {}  {}", style("Key:").bold(), style(&key.key).yellow().bold());
    println!(
        "  {}  {}",
        style("Expires:").bold(),
        key.expires_at
            .map(output::format_timestamp)
            .unwrap_or_else(|| "never".to_string())
    );
    println!();
    println!("  {}", style("── Paste into your page ──").dim());
    println!("  {snippet}");
    println!();

    Ok(())
}

async fn revoke(state: &AppState, key: &str, json: bool) -> Result<()> {
    let revoked = state.embed_service.revoke(key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&revoked)?);
        return Ok(());
    }

    if revoked.is_usable_at(Utc::now()) {
        output::warning(format!(
            "The platform still reports key {} as active.",
            style(&revoked.key).yellow()
        ));
    } else {
        output::success(format!(
            "Deactivated key for chatbot {}",
            style(revoked.chatbot_id).cyan()
        ));
    }
    println!();

    Ok(())
}
