//! Knowledge base CLI subcommands: upload a document, scrape a page, or
//! crawl a sitemap into a chatbot's index.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use console::style;

use botdesk_types::chatbot::ChatbotId;
use botdesk_types::knowledge::{IngestReceipt, KnowledgeSource};

use crate::cli::output;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum KnowledgeCommand {
    /// Upload a .pdf, .docx, or .txt document.
    Upload {
        /// Chatbot id.
        id: ChatbotId,

        /// Document to upload.
        file: PathBuf,
    },

    /// Scrape a single web page.
    Scrape {
        /// Chatbot id.
        id: ChatbotId,

        /// Page URL (http or https).
        url: String,
    },

    /// Crawl the pages listed in a sitemap.
    Sitemap {
        /// Chatbot id.
        id: ChatbotId,

        /// Sitemap URL (http or https).
        url: String,

        /// Maximum number of pages to process (default: all).
        #[arg(long)]
        limit: Option<u32>,
    },
}

impl KnowledgeCommand {
    fn into_parts(self) -> (ChatbotId, KnowledgeSource) {
        match self {
            KnowledgeCommand::Upload { id, file } => (id, KnowledgeSource::Document { path: file }),
            KnowledgeCommand::Scrape { id, url } => (id, KnowledgeSource::Url { url }),
            KnowledgeCommand::Sitemap { id, url, limit } => {
                (id, KnowledgeSource::Sitemap { url, limit })
            }
        }
    }
}

pub async fn handle_knowledge_command(cmd: KnowledgeCommand, state: &AppState, json: bool) -> Result<()> {
    let (id, source) = cmd.into_parts();

    let spinner = output::spinner(format!("Processing {}...", source.kind()), "cyan");
    let result = state.knowledge_service.ingest(id, &source).await;
    spinner.finish_and_clear();
    let receipt = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt.0)?);
        return Ok(());
    }

    output::success(format!(
        "{} added to chatbot {}",
        capitalize(source.kind()),
        style(id).cyan()
    ));
    print_receipt(&source, &receipt);
    println!();

    Ok(())
}

fn print_receipt(source: &KnowledgeSource, receipt: &IngestReceipt) {
    println!("    {} {}", style("Source:").dim(), source);
    if let Some(count) = receipt.processed_count() {
        println!("    {} {}", style("Processed:").dim(), count);
    }
    if let Some(message) = receipt.message() {
        println!("    {}", style(message).dim());
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
