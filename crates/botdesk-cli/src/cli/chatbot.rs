//! Chatbot lifecycle CLI commands: create, list, show, rename, delete.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::{Confirm, Input};

use botdesk_core::pagination::Paginator;
use botdesk_core::service::chatbot::Refreshed;
use botdesk_types::chatbot::{Chatbot, ChatbotId, ChatbotStatus};
use botdesk_types::error::ApiError;

use crate::cli::output;
use crate::state::AppState;

/// Create a new chatbot, prompting for the name if not given.
///
/// ```bash
/// bdesk create chatbot --name "Support"
/// ```
pub async fn create_chatbot(state: &AppState, name: Option<String>, json: bool) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Chatbot name")
            .interact_text()?,
    };

    let spinner = output::spinner("Creating chatbot...", "cyan");
    let result = state.chatbot_service.create(&name).await;
    spinner.finish_and_clear();
    let Refreshed { value: chatbot, chatbots } = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chatbot)?);
        return Ok(());
    }

    output::success(format!(
        "Created {} {}",
        style(&chatbot.name).cyan().bold(),
        style(format!("(id {})", chatbot.id)).dim()
    ));
    println!();
    println!("    Add knowledge:  {}", style(format!("bdesk knowledge upload {} <file>", chatbot.id)).yellow());
    println!("    Start chatting: {}", style(format!("bdesk chat {}", chatbot.id)).yellow());
    println!();
    report_refresh(&chatbots);

    Ok(())
}

/// List chatbots one page at a time, or all at once.
pub async fn list_chatbots(state: &AppState, page: usize, all: bool, json: bool) -> Result<()> {
    let pager = if all {
        let chatbots = state.chatbot_service.list().await?;
        let count = chatbots.len().max(1);
        Paginator::new(chatbots, count)
    } else {
        state.chatbot_service.page(page).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(pager.page_items())?);
        return Ok(());
    }

    if pager.total_items() == 0 {
        println!();
        println!(
            "  {} No chatbots found. Create one with: {}",
            style("i").blue().bold(),
            style("bdesk create chatbot").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", chatbot_table(&pager));
    println!();
    println!(
        "  {} chatbot{}  {}",
        style(pager.total_items()).bold(),
        if pager.total_items() == 1 { "" } else { "s" },
        style(format!(
            "page {} of {}",
            pager.current_page(),
            pager.total_pages()
        ))
        .dim()
    );
    if pager.has_next() {
        println!(
            "  {}",
            style(format!(
                "Next page: bdesk list chatbots --page {}",
                pager.current_page() + 1
            ))
            .dim()
        );
    }
    println!();

    Ok(())
}

fn chatbot_table(pager: &Paginator<Chatbot>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for (offset, chatbot) in pager.page_items().iter().enumerate() {
        table.add_row(vec![
            Cell::new(pager.page_offset() + offset + 1).fg(Color::DarkGrey),
            Cell::new(chatbot.id).fg(Color::White),
            Cell::new(&chatbot.name).fg(Color::Cyan),
            status_cell(&chatbot.status()),
        ]);
    }

    table
}

fn status_cell(status: &ChatbotStatus) -> Cell {
    match status {
        ChatbotStatus::Active => Cell::new("● active").fg(Color::Green),
        ChatbotStatus::Pending => Cell::new("◌ pending").fg(Color::Yellow),
        ChatbotStatus::Inactive => Cell::new("○ inactive").fg(Color::DarkGrey),
        ChatbotStatus::Error => Cell::new("✗ error").fg(Color::Red),
        ChatbotStatus::Other(label) => Cell::new(label).fg(Color::White),
    }
}

pub async fn show_chatbot(state: &AppState, id: ChatbotId, json: bool) -> Result<()> {
    let chatbot = state.chatbot_service.get(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chatbot)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&chatbot.name).cyan().bold());
    println!();
    println!("  {}", style("── Details ──").dim());
    println!("  {}      {}", style("ID:").bold(), chatbot.id);
    println!("  {}  {}", style("Status:").bold(), chatbot.status());
    println!("  {}   {}", style("Owner:").bold(), chatbot.user_id);
    println!(
        "  {}   {}",
        style("Index:").bold(),
        chatbot.index_id.as_deref().unwrap_or("(not indexed)")
    );
    println!();
    println!("  {}", style("── Quick Actions ──").dim());
    println!("  Chat:       {}", style(format!("bdesk chat {}", chatbot.id)).yellow());
    println!("  Sessions:   {}", style(format!("bdesk sessions --chatbot {}", chatbot.id)).yellow());
    println!("  Embed:      {}", style(format!("bdesk embed issue {}", chatbot.id)).yellow());
    println!();

    Ok(())
}

pub async fn rename_chatbot(state: &AppState, id: ChatbotId, name: &str, json: bool) -> Result<()> {
    let chatbot = state.chatbot_service.rename(id, name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chatbot)?);
    } else {
        output::success(format!(
            "Renamed chatbot {} to {}",
            style(id).dim(),
            style(&chatbot.name).cyan().bold()
        ));
        println!();
    }

    Ok(())
}

/// Delete a chatbot, asking for confirmation unless `force` is set.
pub async fn delete_chatbot(state: &AppState, id: ChatbotId, force: bool, json: bool) -> Result<()> {
    let chatbot = state.chatbot_service.get(id).await?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete '{}' (id {})? Its knowledge base and sessions go with it",
                chatbot.name, chatbot.id
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let spinner = output::spinner("Deleting chatbot...", "red");
    let result = state.chatbot_service.delete(id).await;
    spinner.finish_and_clear();
    let Refreshed { chatbots, .. } = result?;

    if json {
        let out = serde_json::json!({
            "deleted": id,
            "name": chatbot.name,
            "remaining": chatbots.as_ref().ok().map(Vec::len),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    output::success(format!("Deleted {}", style(&chatbot.name).cyan()));
    println!();
    report_refresh(&chatbots);

    Ok(())
}

/// After a create or delete, show how many chatbots remain, or note that
/// the list could not be refreshed.
fn report_refresh(chatbots: &Result<Vec<Chatbot>, ApiError>) {
    match chatbots {
        Ok(list) => println!(
            "  {}",
            style(format!(
                "You now have {} chatbot{}.",
                list.len(),
                if list.len() == 1 { "" } else { "s" }
            ))
            .dim()
        ),
        Err(e) => output::warning(format!("Could not refresh the chatbot list: {}", e.user_message())),
    }
    println!();
}
