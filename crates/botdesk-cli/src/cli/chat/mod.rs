//! Interactive chat: streamed replies, Markdown rendering of stored
//! messages, slash commands, and session switching. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
