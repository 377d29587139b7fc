//! Shared wire and domain types for botdesk.
//!
//! This crate contains the types exchanged with the chatbot platform API:
//! chatbots, authentication tokens, chat sessions and transcripts, knowledge
//! ingestion receipts, embed access keys, client configuration, and the
//! error type every layer reports through.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod access_key;
pub mod auth;
pub mod chat;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod knowledge;
