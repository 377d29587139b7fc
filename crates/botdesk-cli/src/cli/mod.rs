//! CLI command definitions for the `bdesk` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `bdesk create chatbot`, `bdesk list chatbots`).

pub mod auth;
pub mod chat;
pub mod chatbot;
pub mod embed;
pub mod knowledge;
pub mod output;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use botdesk_types::chatbot::ChatbotId;

/// Console for your hosted chatbots.
#[derive(Parser)]
#[command(name = "bdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub trace_export: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the access token.
    Login {
        /// Account email (prompted if omitted).
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted, hidden, if omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored access token.
    Logout,

    /// Show who is signed in.
    Whoami,

    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show details of a chatbot.
    Show {
        /// Chatbot id.
        id: ChatbotId,
    },

    /// Rename a resource.
    Rename {
        #[command(subcommand)]
        resource: RenameResource,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Feed documents, pages, or sitemaps into a chatbot's knowledge base.
    Knowledge {
        #[command(subcommand)]
        action: knowledge::KnowledgeCommand,
    },

    /// List chat sessions.
    Sessions {
        /// Only sessions of this chatbot.
        #[arg(long)]
        chatbot: Option<ChatbotId>,
    },

    /// Print the transcript of one session.
    Transcript {
        /// Chatbot the session belongs to.
        chatbot_id: ChatbotId,

        /// Session id.
        session_id: String,
    },

    /// Issue or revoke embed access keys.
    Embed {
        #[command(subcommand)]
        action: embed::EmbedCommand,
    },

    /// Start an interactive chat.
    Chat {
        /// Chatbot to chat with (pick from a list if omitted).
        id: Option<ChatbotId>,

        /// Continue an existing session.
        #[arg(long)]
        resume: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a new chatbot.
    Chatbot {
        /// Chatbot name (prompted if omitted).
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List your chatbots.
    #[command(alias = "chatbot")]
    Chatbots {
        /// Page to show (1-based).
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        page: usize,

        /// Show every chatbot on one table.
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum RenameResource {
    /// Rename a chatbot.
    Chatbot {
        /// Chatbot id.
        id: ChatbotId,

        /// New name.
        name: String,
    },
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a chatbot.
    Chatbot {
        /// Chatbot id.
        id: ChatbotId,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },
}
